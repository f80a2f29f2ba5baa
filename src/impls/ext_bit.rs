/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Extension-bit regions.
//!
//! A region collects the octets written between a start and a stop mark;
//! when the outermost region closes, one bit of every octet in it is
//! rewritten so that all octets but the last signal that more data follows.

use crate::error::{RawBufferError, fatal};
use crate::impls::RawBuffer;
use log::trace;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// State of the extension-bit region tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize), mem_size(flat))]
pub(crate) enum ExtBitRegion {
    #[default]
    Inactive,
    Active {
        /// The number of starts not yet matched by a stop.
        depth: usize,
        /// The length of the data when the outermost region started.
        start: usize,
        reversed: bool,
    },
}

impl RawBuffer {
    /// Open an extension-bit region.
    ///
    /// Regions nest, but only the outermost one is effective: `reversed` is
    /// ignored for inner regions, and the rewrite happens when the outermost
    /// region is closed by [`stop_region`](RawBuffer::stop_region).
    pub fn start_region(&mut self, reversed: bool) {
        self.region = match self.region {
            ExtBitRegion::Inactive => ExtBitRegion::Active {
                depth: 1,
                start: self.len,
                reversed,
            },
            ExtBitRegion::Active {
                depth,
                start,
                reversed,
            } => ExtBitRegion::Active {
                depth: depth + 1,
                start,
                reversed,
            },
        };
    }

    /// Close an extension-bit region.
    ///
    /// When the outermost region closes, the continuation bit of every octet
    /// written since it started is rewritten: it is set in all octets but the
    /// last, which gets it cleared, or the other way around if the region is
    /// reversed. The continuation bit is the most significant bit of the
    /// octet, or the least significant one if the persistent bit order is
    /// set.
    pub fn try_stop_region(&mut self) -> Result<(), RawBufferError> {
        match self.region {
            ExtBitRegion::Inactive => Err(RawBufferError::RegionNotStarted),
            ExtBitRegion::Active {
                depth,
                start,
                reversed,
            } if depth > 1 => {
                self.region = ExtBitRegion::Active {
                    depth: depth - 1,
                    start,
                    reversed,
                };
                Ok(())
            }
            ExtBitRegion::Active { start, reversed, .. } => {
                self.region = ExtBitRegion::Inactive;
                let mask = if self.current_bit_order { 0x01 } else { 0x80 };
                let Some((last, body)) = self.data[start..self.len].split_last_mut() else {
                    return Ok(());
                };
                trace!(
                    "Rewriting the extension bits of {} octets",
                    body.len() + 1
                );
                for octet in body {
                    if reversed {
                        *octet &= !mask;
                    } else {
                        *octet |= mask;
                    }
                }
                if reversed {
                    *last |= mask;
                } else {
                    *last &= !mask;
                }
                Ok(())
            }
        }
    }

    /// Like [`try_stop_region`](RawBuffer::try_stop_region), but panics if no
    /// region is open.
    #[track_caller]
    pub fn stop_region(&mut self) {
        if let Err(error) = self.try_stop_region() {
            fatal(error);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::traits::{Order, RawOrdering};

    /// Five 7-bit fields, each followed by a reserved bit.
    fn write_fields(buffer: &mut RawBuffer) {
        for value in [0x7f_u8, 0x00, 0x2a, 0x55, 0x7f] {
            buffer.put_bits(7, &[value], RawOrdering::default(), 0);
            buffer.put_zero(1, Order::Lsb);
        }
    }

    #[test]
    fn test_region() {
        let mut buffer = RawBuffer::new();
        buffer.put_c(0x01);
        buffer.start_region(false);
        write_fields(&mut buffer);
        buffer.stop_region();
        assert_eq!(buffer.get_data(), &[0x01, 0xff, 0x80, 0xaa, 0xd5, 0x7f]);

        let mut buffer = RawBuffer::new();
        buffer.put_c(0x81);
        buffer.start_region(true);
        write_fields(&mut buffer);
        buffer.set_last_bit(true);
        buffer.stop_region();
        assert_eq!(buffer.get_data(), &[0x81, 0x7f, 0x00, 0x2a, 0x55, 0xff]);
    }

    #[test]
    fn test_region_current_bit_order() {
        let mut buffer = RawBuffer::new();
        buffer.set_order(true);
        buffer.start_region(false);
        buffer.put_s(&[0x02, 0x04, 0x07]);
        buffer.stop_region();
        assert_eq!(buffer.get_data(), &[0x03, 0x05, 0x06]);
    }

    #[test]
    fn test_nested() {
        let mut buffer = RawBuffer::new();
        buffer.start_region(false);
        buffer.put_c(0x01);
        buffer.start_region(true);
        buffer.put_c(0x02);
        buffer.stop_region();
        // the inner stop does not rewrite
        assert_eq!(buffer.get_data(), &[0x01, 0x02]);
        buffer.put_c(0x83);
        buffer.stop_region();
        assert_eq!(buffer.get_data(), &[0x81, 0x82, 0x03]);
        assert_eq!(buffer.try_stop_region(), Err(RawBufferError::RegionNotStarted));
    }

    #[test]
    fn test_empty_region() {
        let mut buffer = RawBuffer::from(&[0x00_u8][..]);
        buffer.start_region(false);
        buffer.stop_region();
        assert_eq!(buffer.get_data(), &[0x00]);
    }

    #[test]
    fn test_cut_resets_region() {
        let mut buffer = RawBuffer::new();
        buffer.start_region(false);
        buffer.put_c(0x01);
        buffer.cut();
        assert_eq!(buffer.try_stop_region(), Err(RawBufferError::RegionNotStarted));
    }

    #[test]
    #[should_panic(expected = "without start_region")]
    fn test_stop_without_start() {
        RawBuffer::new().stop_region();
    }
}
