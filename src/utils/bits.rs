/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Helpers on bit-packed byte sequences.
//!
//! All the functions in this module address bits LSB-first: bit *i* of a
//! sequence is bit *i* mod 8 of byte ⌊*i* / 8⌋.

use crate::traits::low_mask;
use alloc::vec::Vec;

/// Return the bit at position `index`.
#[inline(always)]
#[must_use]
pub fn get_bit(bytes: &[u8], index: usize) -> bool {
    (bytes[index / 8] >> (index % 8)) & 1 != 0
}

/// Set the bit at position `index` to `value`.
#[inline(always)]
pub fn set_bit(bytes: &mut [u8], index: usize, value: bool) {
    let mask = 1 << (index % 8);
    if value {
        bytes[index / 8] |= mask;
    } else {
        bytes[index / 8] &= !mask;
    }
}

/// Reverse the lowest `len` bits of `value` (at most 8), discarding the
/// others.
#[inline(always)]
#[must_use]
pub const fn reverse_low(value: u8, len: u32) -> u8 {
    if len == 0 {
        0
    } else {
        (value & low_mask(len)).reverse_bits() >> (8 - len)
    }
}

/// Read `len` bits (at most 8) starting at bit `index`.
#[inline]
#[must_use]
pub fn extract(bytes: &[u8], index: usize, len: u32) -> u8 {
    let i = index / 8;
    let offset = (index % 8) as u32;
    let mut window = bytes[i] as u16;
    if offset + len > 8 {
        window |= (bytes[i + 1] as u16) << 8;
    }
    (window >> offset) as u8 & low_mask(len)
}

/// Write the lowest `len` bits (at most 8) of `value` starting at bit
/// `index`, preserving the other bits.
#[inline]
pub fn deposit(bytes: &mut [u8], index: usize, len: u32, value: u8) {
    let i = index / 8;
    let offset = (index % 8) as u32;
    let mask = (low_mask(len) as u16) << offset;
    let field = ((value & low_mask(len)) as u16) << offset;
    bytes[i] = (bytes[i] & !(mask as u8)) | field as u8;
    if offset + len > 8 {
        bytes[i + 1] = (bytes[i + 1] & !((mask >> 8) as u8)) | (field >> 8) as u8;
    }
}

/// Return the lowest `num_bits` bits of `source` followed by `pad` zero
/// bits, that is, the value zero-extended to `num_bits + pad` bits.
#[must_use]
pub fn zero_extend(source: &[u8], num_bits: usize, pad: usize) -> Vec<u8> {
    let mut result = alloc::vec![0; (num_bits + pad).div_ceil(8)];
    let full = num_bits / 8;
    result[..full].copy_from_slice(&source[..full]);
    if num_bits % 8 != 0 {
        result[full] = source[full] & low_mask((num_bits % 8) as u32);
    }
    result
}

/// Return `pad` zero bits followed by the lowest `num_bits` bits of
/// `source`, that is, the value shifted up by `pad`.
#[must_use]
pub fn shift_up(source: &[u8], num_bits: usize, pad: usize) -> Vec<u8> {
    let mut result = alloc::vec![0; (num_bits + pad).div_ceil(8)];
    let mut done = 0;
    while done < num_bits {
        let len = (num_bits - done).min(8) as u32;
        deposit(&mut result, pad + done, len, source[done / 8]);
        done += len as usize;
    }
    result
}

/// Swap the nibbles of a `num_bits`-bit field written or read starting at
/// in-octet offset `offset`.
///
/// The nibbles of the field are paired so that each pair falls into one
/// octet of the stream: if `offset` is 4 the first nibble stands alone and
/// the pairs are (1, 2), (3, 4), …, mixing nibbles of adjacent bytes of
/// `bytes`; otherwise the pairs are (0, 1), (2, 3), …, that is, the two
/// halves of each byte. Only pairs of complete nibbles are swapped, so the
/// transformation is an involution on `num_bits`-bit fields.
pub fn hex_swap(bytes: &mut [u8], num_bits: usize, offset: usize) {
    if offset % 8 == 4 {
        let mut t = 0;
        while 8 * t + 12 <= num_bits {
            let high = bytes[t] >> 4;
            let low = bytes[t + 1] & 0x0f;
            bytes[t] = (bytes[t] & 0x0f) | (low << 4);
            bytes[t + 1] = (bytes[t + 1] & 0xf0) | high;
            t += 1;
        }
    } else {
        for byte in bytes.iter_mut().take(num_bits / 8) {
            *byte = byte.rotate_left(4);
        }
    }
}
