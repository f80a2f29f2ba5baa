/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The ordering model of RAW encodings.
//!
//! Each of the four axes of a RAW encoding attribute is two-valued, so all
//! of them are represented by the same enum [`Order`]; a full
//! configuration is a [`RawOrdering`], passed by value to every bit-level
//! operation of [`RawBuffer`](crate::impls::RawBuffer).

#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// One of the two values of an ordering axis.
///
/// The meaning depends on the axis:
///
/// - bit order: whether bit 0 of a field maps to the least or most
///   significant bit of its octet;
/// - byte order: whether the first octet of a multi-octet field is the least
///   or most significant one;
/// - field order: whether a short field is packed against the low or high
///   side of a partial octet;
/// - hex order: whether the nibbles of an octet are stored as is
///   ([`Order::Lsb`]) or swapped ([`Order::Msb`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize), mem_size(flat))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum Order {
    /// Least significant first.
    #[default]
    Lsb,
    /// Most significant first.
    Msb,
}

impl Order {
    /// Return the other value.
    #[must_use]
    #[inline(always)]
    pub const fn flip(self) -> Self {
        match self {
            Order::Lsb => Order::Msb,
            Order::Msb => Order::Lsb,
        }
    }

    /// Return the other value if `flip` is true, `self` otherwise.
    #[must_use]
    #[inline(always)]
    pub const fn flip_if(self, flip: bool) -> Self {
        if flip { self.flip() } else { self }
    }

    #[must_use]
    #[inline(always)]
    pub const fn is_msb(self) -> bool {
        matches!(self, Order::Msb)
    }

    #[must_use]
    #[inline(always)]
    pub const fn is_lsb(self) -> bool {
        matches!(self, Order::Lsb)
    }
}

impl core::ops::Not for Order {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        self.flip()
    }
}

impl core::fmt::Display for Order {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Order::Lsb => write!(f, "lsb"),
            Order::Msb => write!(f, "msb"),
        }
    }
}

/// The ordering parameters of a single bit-field operation.
///
/// The default value has all four axes set to [`Order::Lsb`], that is, the
/// plain little-endian, LSB-first layout.
///
/// ```
/// use raw_buffer::prelude::*;
///
/// let big_endian = RawOrdering::default()
///     .with_byte(Order::Msb)
///     .with_field(Order::Msb);
/// assert_eq!(big_endian.bit, Order::Lsb);
/// assert_eq!(big_endian.byte, Order::Msb);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize), mem_size(flat))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct RawOrdering {
    /// Order of bits within an octet.
    pub bit: Order,
    /// Order of octets within a multi-octet field.
    pub byte: Order,
    /// Side of a partial octet a short field is packed against.
    pub field: Order,
    /// Order of nibbles within an octet.
    pub hex: Order,
}

impl RawOrdering {
    #[must_use]
    pub const fn new(bit: Order, byte: Order, field: Order, hex: Order) -> Self {
        Self {
            bit,
            byte,
            field,
            hex,
        }
    }

    #[must_use]
    pub const fn with_bit(mut self, bit: Order) -> Self {
        self.bit = bit;
        self
    }

    #[must_use]
    pub const fn with_byte(mut self, byte: Order) -> Self {
        self.byte = byte;
        self
    }

    #[must_use]
    pub const fn with_field(mut self, field: Order) -> Self {
        self.field = field;
        self
    }

    #[must_use]
    pub const fn with_hex(mut self, hex: Order) -> Self {
        self.hex = hex;
        self
    }

    /// Return a copy with bit order and field order complemented if `flip`
    /// is true.
    ///
    /// This is the effect of the persistent bit-order flag of a buffer and
    /// of the `top_bit_order` argument of
    /// [`get_bits`](crate::impls::RawBuffer::get_bits).
    #[must_use]
    pub const fn flipped(self, flip: bool) -> Self {
        Self {
            bit: self.bit.flip_if(flip),
            byte: self.byte,
            field: self.field.flip_if(flip),
            hex: self.hex,
        }
    }

    /// Iterate over all sixteen combinations of the four axes.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..16_u8).map(|i| {
            let o = |b: u8| if i & b != 0 { Order::Msb } else { Order::Lsb };
            Self::new(o(1), o(2), o(4), o(8))
        })
    }
}

impl core::fmt::Display for RawOrdering {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "bit={} byte={} field={} hex={}",
            self.bit, self.byte, self.field, self.hex
        )
    }
}
