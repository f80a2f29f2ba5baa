/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use raw_buffer::prelude::*;
use std::hint::black_box;

const FIELDS: usize = 10_000;

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut r = SmallRng::seed_from_u64(0);
    let lengths: Vec<usize> = (0..FIELDS).map(|_| r.random_range(1..=32)).collect();
    let values: Vec<[u8; 4]> = (0..FIELDS).map(|_| r.random::<u32>().to_le_bytes()).collect();

    for (name, ordering) in [
        ("lsb", RawOrdering::default()),
        (
            "big-endian",
            RawOrdering::default()
                .with_byte(Order::Msb)
                .with_field(Order::Msb),
        ),
        ("msb-bits", RawOrdering::default().with_bit(Order::Msb)),
    ] {
        c.bench_function(&format!("put_bits<{name}>"), |b| {
            b.iter(|| {
                let mut buffer = RawBuffer::new();
                for (len, value) in lengths.iter().zip(&values) {
                    buffer.put_bits(*len, value, ordering, 0);
                }
                black_box(buffer.get_len())
            })
        });

        let mut buffer = RawBuffer::new();
        for (len, value) in lengths.iter().zip(&values) {
            buffer.put_bits(*len, value, ordering, 0);
        }
        let mut dst = [0_u8; 4];
        c.bench_function(&format!("get_bits<{name}>"), |b| {
            b.iter(|| {
                buffer.rewind();
                for len in &lengths {
                    buffer.get_bits_into(*len, &mut dst, ordering, false);
                    black_box(dst);
                }
            })
        });
    }

    let bytes: Vec<u8> = (0..4 * FIELDS).map(|_| r.random()).collect();
    c.bench_function("put_s", |b| {
        b.iter(|| {
            let mut buffer = RawBuffer::new();
            for chunk in bytes.chunks(7) {
                buffer.put_s(chunk);
            }
            black_box(buffer.get_len())
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
