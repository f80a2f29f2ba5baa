/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Selector types for the four ways a short field can be packed into a
//! single octet.
//!
//! A field shorter than an octet is placed according to two axes: the field
//! order decides the side of the octet the field is packed against (and thus
//! the direction in which the write position moves), while the bit order
//! decides whether the bits of the field keep their orientation or are
//! mirrored. The four combinations are the selector types
//! [`LsbIntoLsb`], [`LsbIntoMsb`], [`MsbIntoLsb`] and [`MsbIntoMsb`] (bit
//! order first, field order second).
//!
//! Positions inside an octet are expressed as *slots*: slot 0 is the first
//! bit written, that is, physical bit 0 with field order LSB and physical bit
//! 7 with field order MSB. The layouts whose bit order equals their field
//! order store field bit *j* in slot *offset* + *j*; they implement the
//! additional trait [`SlotLayout`], which provides slot-addressed accesses
//! spanning two octets.
//!
//! As with the endianness markers of bit streams, the traits are sealed: all
//! the types that will ever implement them are defined in this file.

use super::Order;

/// Inner private trait used to make implementing [`OctetLayout`]
/// impossible for other structs.
mod private {
    /// This is a [SealedTrait](https://predr.ag/blog/definitive-guide-to-sealed-traits-in-rust/).
    pub trait OctetLayout {}
}

/// Return a mask with the lowest `len` bits set; `len` must be at most 8.
#[inline(always)]
#[must_use]
pub(crate) const fn low_mask(len: u32) -> u8 {
    ((1_u16 << len) - 1) as u8
}

/// A packing formula for a field of at most eight bits.
///
/// In all methods `offset + len` must not exceed 8.
pub trait OctetLayout: private::OctetLayout {
    /// The bit order of this layout.
    const BIT: Order;
    /// The field order of this layout.
    const FIELD: Order;

    /// Return `octet` with the slots `offset..offset + len` replaced by the
    /// lowest `len` bits of `value`.
    ///
    /// Bits of `value` above `len` are ignored, and the other slots of
    /// `octet` are preserved.
    fn pack(octet: u8, offset: u32, len: u32, value: u8) -> u8;

    /// Return the `len`-bit field stored in the slots `offset..offset + len`
    /// of `octet`, in the lowest bits of the result.
    fn unpack(octet: u8, offset: u32, len: u32) -> u8;
}

/// A layout storing field bit *j* in slot *offset* + *j*.
///
/// This is the case of the layouts whose bit order matches their field
/// order; the slot-addressed methods write and read a field that may
/// straddle an octet boundary.
pub trait SlotLayout: OctetLayout {
    /// Store the lowest `len` bits of `value` (at most 8) starting at the
    /// absolute slot `slot` of `data`.
    #[inline]
    fn deposit(data: &mut [u8], slot: usize, len: u32, value: u8) {
        let index = slot / 8;
        let offset = (slot % 8) as u32;
        let first = len.min(8 - offset);
        data[index] = Self::pack(data[index], offset, first, value);
        if len > first {
            data[index + 1] = Self::pack(data[index + 1], 0, len - first, value >> first);
        }
    }

    /// Load `len` bits (at most 8) starting at the absolute slot `slot` of
    /// `data`.
    #[inline]
    fn extract(data: &[u8], slot: usize, len: u32) -> u8 {
        let index = slot / 8;
        let offset = (slot % 8) as u32;
        let first = len.min(8 - offset);
        let mut value = Self::unpack(data[index], offset, first);
        if len > first {
            value |= Self::unpack(data[index + 1], 0, len - first) << first;
        }
        value
    }
}

/// Selector type for LSB bit order packed against the LSB side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsbIntoLsb;
/// Selector type for LSB bit order packed against the MSB side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsbIntoMsb;
/// Selector type for MSB bit order packed against the LSB side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsbIntoLsb;
/// Selector type for MSB bit order packed against the MSB side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsbIntoMsb;

impl private::OctetLayout for LsbIntoLsb {}
impl private::OctetLayout for LsbIntoMsb {}
impl private::OctetLayout for MsbIntoLsb {}
impl private::OctetLayout for MsbIntoMsb {}

impl OctetLayout for LsbIntoLsb {
    const BIT: Order = Order::Lsb;
    const FIELD: Order = Order::Lsb;

    #[inline(always)]
    fn pack(octet: u8, offset: u32, len: u32, value: u8) -> u8 {
        let mask = low_mask(len);
        (octet & !(mask << offset)) | ((value & mask) << offset)
    }

    #[inline(always)]
    fn unpack(octet: u8, offset: u32, len: u32) -> u8 {
        (octet >> offset) & low_mask(len)
    }
}

impl OctetLayout for LsbIntoMsb {
    const BIT: Order = Order::Lsb;
    const FIELD: Order = Order::Msb;

    #[inline(always)]
    fn pack(octet: u8, offset: u32, len: u32, value: u8) -> u8 {
        if len == 0 {
            return octet;
        }
        let mask = low_mask(len);
        let shift = 8 - offset - len;
        (octet & !(mask << shift)) | ((value & mask) << shift)
    }

    #[inline(always)]
    fn unpack(octet: u8, offset: u32, len: u32) -> u8 {
        if len == 0 {
            return 0;
        }
        (octet >> (8 - offset - len)) & low_mask(len)
    }
}

impl OctetLayout for MsbIntoLsb {
    const BIT: Order = Order::Msb;
    const FIELD: Order = Order::Lsb;

    #[inline(always)]
    fn pack(octet: u8, offset: u32, len: u32, value: u8) -> u8 {
        if len == 0 {
            return octet;
        }
        let mask = low_mask(len);
        let field = (value & mask).reverse_bits() >> (8 - offset - len);
        (octet & !(mask << offset)) | field
    }

    #[inline(always)]
    fn unpack(octet: u8, offset: u32, len: u32) -> u8 {
        if len == 0 {
            return 0;
        }
        // move the field to the top, then mirror it into the low bits
        let top = ((octet as u16) << (8 - offset - len)) as u8;
        top.reverse_bits() & low_mask(len)
    }
}

impl OctetLayout for MsbIntoMsb {
    const BIT: Order = Order::Msb;
    const FIELD: Order = Order::Msb;

    #[inline(always)]
    fn pack(octet: u8, offset: u32, len: u32, value: u8) -> u8 {
        if len == 0 {
            return octet;
        }
        let mask = low_mask(len);
        let field = (value & mask).reverse_bits() >> offset;
        (octet & !(mask << (8 - offset - len))) | field
    }

    #[inline(always)]
    fn unpack(octet: u8, offset: u32, len: u32) -> u8 {
        (octet.reverse_bits() >> offset) & low_mask(len)
    }
}

impl SlotLayout for LsbIntoLsb {}
impl SlotLayout for MsbIntoMsb {}

/// Pack with the layout selected at run time by `bit` and `field`.
#[inline]
pub(crate) fn pack(bit: Order, field: Order, octet: u8, offset: u32, len: u32, value: u8) -> u8 {
    match (bit, field) {
        (Order::Lsb, Order::Lsb) => LsbIntoLsb::pack(octet, offset, len, value),
        (Order::Lsb, Order::Msb) => LsbIntoMsb::pack(octet, offset, len, value),
        (Order::Msb, Order::Lsb) => MsbIntoLsb::pack(octet, offset, len, value),
        (Order::Msb, Order::Msb) => MsbIntoMsb::pack(octet, offset, len, value),
    }
}

/// Unpack with the layout selected at run time by `bit` and `field`.
#[inline]
pub(crate) fn unpack(bit: Order, field: Order, octet: u8, offset: u32, len: u32) -> u8 {
    match (bit, field) {
        (Order::Lsb, Order::Lsb) => LsbIntoLsb::unpack(octet, offset, len),
        (Order::Lsb, Order::Msb) => LsbIntoMsb::unpack(octet, offset, len),
        (Order::Msb, Order::Lsb) => MsbIntoLsb::unpack(octet, offset, len),
        (Order::Msb, Order::Msb) => MsbIntoMsb::unpack(octet, offset, len),
    }
}

/// Return the physical bit index (0 = least significant) of `slot` in an
/// octet filled with field order `field`.
#[inline(always)]
#[must_use]
pub(crate) const fn physical_bit(slot: u32, field: Order) -> u32 {
    match field {
        Order::Lsb => slot,
        Order::Msb => 7 - slot,
    }
}
