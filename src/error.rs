/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::fmt::{Display, Formatter};

/// The error returned by the checked (`try_`) methods of
/// [`RawBuffer`](crate::impls::RawBuffer).
///
/// All these conditions denote a defect in the encoder or decoder driving
/// the buffer; the unchecked methods turn them into panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawBufferError {
    /// The size needed to hold the requested data does not fit in a `usize`.
    CapacityOverflow { len: usize, additional: usize },
    /// `stop_region` was called without a matching `start_region`.
    RegionNotStarted,
    /// The read position is beyond the end of the data.
    PositionBeyondEnd { pos: usize, len: usize },
    /// A read asked for more bits than are left.
    UnexpectedEnd { requested: usize, available: usize },
    /// No bit field has been written or read since the last reset.
    NoLastBit,
    /// The length of a direct tail write exceeds the reserved space.
    TailOverflow { requested: usize, available: usize },
}

impl Display for RawBufferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            RawBufferError::CapacityOverflow { len, additional } => write!(
                f,
                "Internal error: cannot grow a buffer of {} bytes by {} bytes: size overflow",
                len, additional
            ),
            RawBufferError::RegionNotStarted => write!(
                f,
                "Internal error: stop_region() was called without start_region()"
            ),
            RawBufferError::PositionBeyondEnd { pos, len } => write!(
                f,
                "Internal error: the read position {} is beyond the length {} of the buffer",
                pos, len
            ),
            RawBufferError::UnexpectedEnd {
                requested,
                available,
            } => write!(
                f,
                "Cannot read {} bits: only {} bits are left in the buffer",
                requested, available
            ),
            RawBufferError::NoLastBit => write!(
                f,
                "Internal error: no bit field has been written or read yet"
            ),
            RawBufferError::TailOverflow {
                requested,
                available,
            } => write!(
                f,
                "Internal error: cannot commit {} bytes to a tail of {} bytes",
                requested, available
            ),
        }
    }
}

impl core::error::Error for RawBufferError {}

/// Signal an internal error.
#[cold]
#[track_caller]
pub(crate) fn fatal(error: RawBufferError) -> ! {
    panic!("{}", error)
}
