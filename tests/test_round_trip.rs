/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use raw_buffer::prelude::*;

const LENGTHS: [usize; 16] = [0, 1, 7, 8, 9, 15, 16, 17, 23, 24, 25, 63, 64, 65, 129, 300];

fn masked(source: &[u8], num_bits: usize) -> Vec<u8> {
    let mut result = source[..num_bits.div_ceil(8)].to_vec();
    if num_bits % 8 != 0 {
        if let Some(last) = result.last_mut() {
            *last &= (1 << (num_bits % 8)) - 1;
        }
    }
    result
}

#[test]
fn test_fresh_buffer() {
    let mut r = SmallRng::seed_from_u64(0);
    for ordering in RawOrdering::all() {
        for num_bits in LENGTHS {
            let mut source = vec![0_u8; num_bits.div_ceil(8) + 1];
            r.fill(&mut source[..]);
            let mut buffer = RawBuffer::new();
            buffer.put_bits(num_bits, &source, ordering, 0);
            assert_eq!(buffer.bit_len(), num_bits);
            assert_eq!(buffer.unread_len_bit(), num_bits);
            assert_eq!(
                buffer.get_bits(num_bits, ordering, false),
                masked(&source, num_bits),
                "{ordering} num_bits={num_bits}"
            );
            assert_eq!(buffer.unread_len_bit(), 0);
        }
    }
}

#[test]
fn test_persistent_order() {
    let mut r = SmallRng::seed_from_u64(1);
    for ordering in RawOrdering::all() {
        for num_bits in LENGTHS {
            let mut source = vec![0_u8; num_bits.div_ceil(8)];
            r.fill(&mut source[..]);
            let mut flipped = RawBuffer::new();
            flipped.set_order(true);
            flipped.put_bits(num_bits, &source, ordering, 0);

            let mut plain = RawBuffer::new();
            plain.put_bits(num_bits, &source, ordering.flipped(true), 0);
            assert_eq!(flipped.get_data(), plain.get_data(), "{ordering}");
            assert_eq!(
                flipped.get_bits(num_bits, ordering, true),
                masked(&source, num_bits)
            );
        }
    }
}

/// Random fields with random orderings, written back to back and compared
/// with the bit-by-bit model.
#[test]
fn test_mixed_fields() {
    let mut r = SmallRng::seed_from_u64(2);
    let orderings: Vec<RawOrdering> = RawOrdering::all().collect();
    for _ in 0..200 {
        let mut buffer = RawBuffer::new();
        let mut reference = ReferenceBuffer::new();
        let mut fields = vec![];
        for _ in 0..r.random_range(1..40) {
            let ordering = orderings[r.random_range(0..orderings.len())];
            let num_bits = r.random_range(0..70_usize);
            let mut source = vec![0_u8; num_bits.div_ceil(8)];
            r.fill(&mut source[..]);
            buffer.put_bits(num_bits, &source, ordering, 0);
            reference.put_bits(num_bits, &source, ordering);
            fields.push((num_bits, ordering));
        }
        assert_eq!(buffer.get_data(), reference.bytes());

        for (num_bits, ordering) in fields {
            assert_eq!(
                buffer.get_bits(num_bits, ordering, false),
                reference.get_bits(num_bits, ordering)
            );
        }
        assert_eq!(buffer.unread_len_bit(), 0);
    }
}

#[test]
fn test_same_field_order() {
    let mut r = SmallRng::seed_from_u64(3);
    for field in [Order::Lsb, Order::Msb] {
        let orderings: Vec<RawOrdering> = RawOrdering::all().filter(|o| o.field == field).collect();
        for _ in 0..200 {
            let mut buffer = RawBuffer::new();
            let mut fields = vec![];
            for _ in 0..r.random_range(1..40) {
                let ordering = orderings[r.random_range(0..orderings.len())];
                let num_bits = r.random_range(0..70_usize);
                let mut source = vec![0_u8; num_bits.div_ceil(8)];
                r.fill(&mut source[..]);
                buffer.put_bits(num_bits, &source, ordering, 0);
                fields.push((num_bits, source, ordering));
            }
            for (num_bits, source, ordering) in fields {
                assert_eq!(
                    buffer.get_bits(num_bits, ordering, false),
                    masked(&source, num_bits),
                    "{ordering} num_bits={num_bits}"
                );
            }
        }
    }
}

#[test]
fn test_uint() {
    let mut r = SmallRng::seed_from_u64(4);
    let orderings: Vec<RawOrdering> = RawOrdering::all().collect();
    let mut buffer = RawBuffer::new();
    let mut fields = vec![];
    for _ in 0..1000 {
        let ordering = orderings[r.random_range(0..orderings.len())].with_field(Order::Lsb);
        let num_bits = r.random_range(1..=64_usize);
        let value = r.random::<u64>() & (u64::MAX >> (64 - num_bits));
        buffer.put_uint(value, num_bits, ordering, 0);
        fields.push((value, num_bits, ordering));
    }
    for (value, num_bits, ordering) in fields {
        assert_eq!(buffer.get_uint::<u64>(num_bits, ordering, false), value);
    }
}
