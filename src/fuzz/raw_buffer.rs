/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Differential harness: every command is applied both to a [`RawBuffer`]
//! and to a [`ReferenceBuffer`], and the results must agree.

use crate::prelude::*;
use alloc::vec::Vec;
use arbitrary::Arbitrary;

#[derive(Arbitrary, Debug)]
pub struct FuzzCase {
    init: Vec<u8>,
    commands: Vec<RandomCommand>,
}

#[derive(Arbitrary, Debug)]
pub enum RandomCommand {
    PutBits(Vec<u8>, u16, RawOrdering),
    PutZero(u8, Order),
    PutPattern(u16, u8, u8, Order),
    PutBytes(Vec<u8>),
    GetBits(u16, RawOrdering),
    SetPosBit(usize),
    IncreasePosPadd(u8),
    Rewind,
}

pub fn harness(data: FuzzCase) {
    let mut buffer = RawBuffer::from(data.init.as_slice());
    let mut reference = ReferenceBuffer::new();
    reference.put_bits(8 * data.init.len(), &data.init, RawOrdering::default());

    for command in data.commands {
        match command {
            RandomCommand::PutBits(source, num_bits, ordering) => {
                let num_bits = (num_bits as usize).min(8 * source.len());
                buffer.put_bits(num_bits, &source, ordering, 0);
                reference.put_bits(num_bits, &source, ordering);
                if num_bits > 0 {
                    let last = reference.bit_len() - 1;
                    let field = ordering.field;
                    let byte = reference.bytes()[last / 8];
                    let bit = match field {
                        Order::Lsb => last % 8,
                        Order::Msb => 7 - last % 8,
                    };
                    assert_eq!(buffer.get_last_bit(), (byte >> bit) & 1 != 0);
                }
            }
            RandomCommand::PutZero(num_bits, field) => {
                buffer.put_zero(num_bits as usize, field);
                reference.put_zero(num_bits as usize, field);
            }
            RandomCommand::PutPattern(total_bits, pattern, pattern_len, field) => {
                let total_bits = total_bits as usize % 512;
                let pattern_len = pattern_len as usize % 9;
                buffer.put_pattern(total_bits, &[pattern], pattern_len, field);
                if pattern_len == 0 {
                    reference.put_zero(total_bits, field);
                } else {
                    let ordering = RawOrdering::new(field, Order::Lsb, field, Order::Lsb);
                    let mut remaining = total_bits;
                    while remaining > 0 {
                        let len = remaining.min(pattern_len);
                        reference.put_bits(len, &[pattern], ordering);
                        remaining -= len;
                    }
                }
            }
            RandomCommand::PutBytes(bytes) => {
                buffer.put_s(&bytes);
                // byte writes close the pending octet
                reference.close_octet();
                reference.put_bits(8 * bytes.len(), &bytes, RawOrdering::default());
                assert_eq!(buffer.bit_len(), reference.bit_len());
            }
            RandomCommand::GetBits(num_bits, ordering) => {
                let num_bits = (num_bits as usize).min(buffer.unread_len_bit());
                reference.set_read_pos(buffer.get_pos_bit());
                assert_eq!(
                    buffer.get_bits(num_bits, ordering, false),
                    reference.get_bits(num_bits, ordering)
                );
                assert_eq!(buffer.get_pos_bit(), reference.read_pos());
            }
            RandomCommand::SetPosBit(pos) => {
                buffer.set_pos_bit(pos);
                assert!(buffer.get_pos_bit() <= 8 * buffer.get_len());
            }
            RandomCommand::IncreasePosPadd(padding) => {
                let pos = buffer.get_pos_bit();
                let skipped = buffer.increase_pos_padd(padding as usize);
                assert_eq!(buffer.get_pos_bit(), pos + skipped);
                if padding != 0 && buffer.get_pos() < buffer.get_len() {
                    assert_eq!(buffer.get_pos_bit() % padding as usize, 0);
                }
            }
            RandomCommand::Rewind => {
                buffer.rewind();
            }
        }
        assert_eq!(buffer.get_data(), reference.bytes());
        assert_eq!(buffer.bit_len(), reference.bit_len());
    }
}
