/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! A bit-by-bit model of RAW bit-field layout.
//!
//! [`ReferenceBuffer`] writes and reads fields one bit at a time, following
//! directly the definition of the four ordering axes. It is slow, and it
//! does not support alignment padding, extension bits or the persistent bit
//! order of [`RawBuffer`](crate::impls::RawBuffer), but it is simple enough
//! to be obviously correct: tests and fuzz harnesses compare the fast paths
//! of [`RawBuffer`](crate::impls::RawBuffer) against it.
//!
//! A field of *n* bits is cut into chunks of eight bits, the last one
//! holding the remaining *n* mod 8 bits. Byte order LSB emits the chunks
//! starting from the one containing bit 0, byte order MSB starting from the
//! last one. Within a chunk bits are emitted in ascending order if bit
//! order and field order agree, in descending order otherwise. Emitted bits
//! fill consecutive slots; slot *u* of an octet is physical bit *u* with
//! field order LSB and physical bit 7 − *u* with field order MSB.

use super::bits::{get_bit, set_bit};
use crate::traits::{Order, RawOrdering, physical_bit};
use alloc::vec::Vec;

/// Return the indices of the field bits in the order in which they are
/// emitted into slots.
#[must_use]
pub fn emission_order(num_bits: usize, ordering: RawOrdering) -> Vec<usize> {
    let chunks = num_bits.div_ceil(8);
    let mut order = Vec::with_capacity(num_bits);
    for c in 0..chunks {
        let c = match ordering.byte {
            Order::Lsb => c,
            Order::Msb => chunks - 1 - c,
        };
        let bits = 8 * c..(8 * c + 8).min(num_bits);
        if ordering.bit == ordering.field {
            order.extend(bits);
        } else {
            order.extend(bits.rev());
        }
    }
    order
}

/// Return the permutation applied to the bits of a `num_bits`-bit field by
/// hex order MSB when the field starts at in-octet offset `offset`: bit
/// *i* of the result is bit `perm[i]` of the field.
#[must_use]
pub fn hex_permutation(num_bits: usize, offset: usize) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..num_bits).collect();
    let mut nibble = if offset % 8 == 4 { 1 } else { 0 };
    while 4 * (nibble + 2) <= num_bits {
        for j in 0..4 {
            perm.swap(4 * nibble + j, 4 * (nibble + 1) + j);
        }
        nibble += 2;
    }
    perm
}

/// A bit-by-bit implementation of RAW bit-field writes and reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceBuffer {
    bytes: Vec<u8>,
    /// The number of slots written.
    write_pos: usize,
    /// The number of slots read.
    read_pos: usize,
}

impl ReferenceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the written octets, the last one possibly partial.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.write_pos.div_ceil(8)]
    }

    /// Return the number of bits written.
    pub fn bit_len(&self) -> usize {
        self.write_pos
    }

    /// Return the number of bits read.
    pub fn read_pos(&self) -> usize {
        self.read_pos
    }

    /// Set the read position, in bits.
    pub fn set_read_pos(&mut self, bit_pos: usize) {
        self.read_pos = bit_pos;
    }

    fn set_slot(&mut self, slot: usize, field: Order, value: bool) {
        if self.bytes.len() <= slot / 8 {
            self.bytes.resize(slot / 8 + 1, 0);
        }
        let index = 8 * (slot / 8) + physical_bit((slot % 8) as u32, field) as usize;
        set_bit(&mut self.bytes, index, value);
    }

    fn get_slot(&self, slot: usize, field: Order) -> bool {
        let index = 8 * (slot / 8) + physical_bit((slot % 8) as u32, field) as usize;
        get_bit(&self.bytes, index)
    }

    /// Write the lowest `num_bits` bits of `source`.
    pub fn put_bits(&mut self, num_bits: usize, source: &[u8], ordering: RawOrdering) {
        let mut value: Vec<bool> = (0..num_bits).map(|i| get_bit(source, i)).collect();
        if ordering.hex == Order::Msb {
            let perm = hex_permutation(num_bits, self.write_pos % 8);
            value = perm.iter().map(|&p| value[p]).collect();
        }
        for (s, b) in emission_order(num_bits, ordering).into_iter().enumerate() {
            self.set_slot(self.write_pos + s, ordering.field, value[b]);
        }
        self.write_pos += num_bits;
    }

    /// Write `num_bits` zeros.
    pub fn put_zero(&mut self, num_bits: usize, field: Order) {
        for s in 0..num_bits {
            self.set_slot(self.write_pos + s, field, false);
        }
        self.write_pos += num_bits;
    }

    /// Move the write position to the next octet boundary, leaving the
    /// skipped slots untouched.
    pub fn close_octet(&mut self) {
        self.write_pos = self.write_pos.next_multiple_of(8);
    }

    /// Read `num_bits` bits, returned LSB-first.
    pub fn get_bits(&mut self, num_bits: usize, ordering: RawOrdering) -> Vec<u8> {
        let mut value = alloc::vec![false; num_bits];
        for (s, b) in emission_order(num_bits, ordering).into_iter().enumerate() {
            value[b] = self.get_slot(self.read_pos + s, ordering.field);
        }
        if ordering.hex == Order::Msb {
            let perm = hex_permutation(num_bits, self.read_pos % 8);
            value = perm.iter().map(|&p| value[p]).collect();
        }
        self.read_pos += num_bits;

        let mut result = alloc::vec![0; num_bits.div_ceil(8)];
        for (i, &b) in value.iter().enumerate() {
            set_bit(&mut result, i, b);
        }
        result
    }
}
