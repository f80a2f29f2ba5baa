/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Bit-field writes and reads.
//!
//! Every transfer is dispatched on three cases: a field fitting in the
//! current octet uses one of the four [`OctetLayout`](crate::traits::OctetLayout)
//! formulas; a byte-aligned field made of whole octets is a bulk copy; every
//! other field is first turned into a *slot stream* (the bits of the field
//! in the order in which they fill slots) and then merged octet by octet
//! through a [`SlotLayout`].

use super::raw_buffer::LastBit;
use crate::error::RawBufferError;
use crate::impls::RawBuffer;
use crate::traits::{
    LsbIntoLsb, MsbIntoMsb, Order, RawOrdering, SlotLayout, low_mask, pack, unpack,
};
use crate::utils::bits::{deposit, extract, hex_swap, reverse_low, shift_up, zero_extend};
use alloc::borrow::Cow;
use alloc::vec::Vec;
use num_traits::ops::bytes::ToBytes;
use num_traits::{PrimInt, Unsigned};

/// Length of chunk `c` of a `num_bits`-bit field.
#[inline(always)]
fn chunk_len(num_bits: usize, c: usize) -> u32 {
    (num_bits - 8 * c).min(8) as u32
}

/// Return the bits of the `num_bits`-bit field `source` in emission order,
/// packed LSB-first.
fn slot_stream(source: &[u8], num_bits: usize, ascending: bool, byte: Order) -> Vec<u8> {
    let chunks = num_bits.div_ceil(8);
    let mut stream = alloc::vec![0; chunks];
    let mut pos = 0;
    for i in 0..chunks {
        let c = if byte.is_msb() { chunks - 1 - i } else { i };
        let len = chunk_len(num_bits, c);
        let piece = if ascending {
            source[c] & low_mask(len)
        } else {
            reverse_low(source[c], len)
        };
        deposit(&mut stream, pos, len, piece);
        pos += len as usize;
    }
    stream
}

/// Inverse of [`slot_stream`]: rebuild the field from its slot stream into
/// `dst`.
fn from_slot_stream(stream: &[u8], dst: &mut [u8], num_bits: usize, ascending: bool, byte: Order) {
    let chunks = num_bits.div_ceil(8);
    let mut pos = 0;
    for i in 0..chunks {
        let c = if byte.is_msb() { chunks - 1 - i } else { i };
        let len = chunk_len(num_bits, c);
        let piece = extract(stream, pos, len);
        dst[c] = if ascending {
            piece
        } else {
            reverse_low(piece, len)
        };
        pos += len as usize;
    }
}

/// Whether the alignment pad of a field is folded into its value instead of
/// being written as literal zeros.
#[inline(always)]
fn folds_alignment(ordering: RawOrdering) -> bool {
    ordering.field.is_msb() ^ ordering.bit.is_msb() ^ ordering.byte.is_msb()
}

impl RawBuffer {
    /// Append the lowest `num_bits` bits of `source`, addressed LSB-first.
    ///
    /// If the persistent bit order is set (see
    /// [`set_order`](RawBuffer::set_order)), bit order and field order of
    /// `ordering` are complemented first.
    ///
    /// A nonzero `align` adds |`align`| zero bits, on the low side of the
    /// value if negative, on the high side if positive. Depending on the
    /// ordering, the pad is either folded into the value, making the field
    /// |`align`| bits longer, or written as separate zero bits with
    /// [`put_zero`](RawBuffer::put_zero).
    ///
    /// Bits of `source` beyond `num_bits` are ignored.
    ///
    /// # Panics
    ///
    /// If `source` holds fewer than `num_bits` bits.
    pub fn put_bits(&mut self, num_bits: usize, source: &[u8], ordering: RawOrdering, align: isize) {
        let ordering = ordering.flipped(self.current_bit_order);
        let mut num_bits = num_bits;
        let mut source = Cow::Borrowed(source);
        let mut trailing = 0;

        if align != 0 {
            let pad = align.unsigned_abs();
            if folds_alignment(ordering) {
                source = Cow::Owned(if align > 0 {
                    zero_extend(&source, num_bits, pad)
                } else {
                    shift_up(&source, num_bits, pad)
                });
                num_bits += pad;
            } else if (align < 0) != ordering.byte.is_msb() {
                self.put_zero(pad, ordering.field);
            } else {
                trailing = pad;
            }
        }

        if num_bits > 0 {
            #[cfg(feature = "checks")]
            assert!(
                source.len() * 8 >= num_bits,
                "a source of {} bytes cannot contain {} bits",
                source.len(),
                num_bits
            );
            let start = self.bit_len();
            if ordering.hex.is_msb() {
                let mut swapped = source[..num_bits.div_ceil(8)].to_vec();
                hex_swap(&mut swapped, num_bits, start % 8);
                source = Cow::Owned(swapped);
            }
            self.store(start, num_bits, &source, ordering);
        }

        if trailing > 0 {
            self.put_zero(trailing, ordering.field);
        }
    }

    /// Write `num_bits` bits of `source` at slot `start`, the current end
    /// of the data.
    fn store(&mut self, start: usize, num_bits: usize, source: &[u8], ordering: RawOrdering) {
        let end = start + num_bits;
        let offset = start % 8;
        self.extend_to(end.div_ceil(8));

        if offset + num_bits <= 8 {
            let i = start / 8;
            self.data[i] = pack(
                ordering.bit,
                ordering.field,
                self.data[i],
                offset as u32,
                num_bits as u32,
                source[0],
            );
        } else if offset == 0 && num_bits % 8 == 0 {
            let dst = &mut self.data[start / 8..end / 8];
            dst.copy_from_slice(&source[..num_bits / 8]);
            if ordering.byte.is_msb() {
                dst.reverse();
            }
            if ordering.bit.is_msb() {
                dst.iter_mut().for_each(|b| *b = b.reverse_bits());
            }
        } else {
            let stream = slot_stream(source, num_bits, ordering.bit == ordering.field, ordering.byte);
            for (t, &piece) in stream.iter().enumerate() {
                let len = chunk_len(num_bits, t);
                match ordering.field {
                    Order::Lsb => LsbIntoLsb::deposit(&mut self.data, start + 8 * t, len, piece),
                    Order::Msb => MsbIntoMsb::deposit(&mut self.data, start + 8 * t, len, piece),
                }
            }
        }

        self.write_bit_offset = (end % 8) as u8;
        self.last_bit = Some(LastBit::at_slot(end - 1, ordering.field));
    }

    /// Read `num_bits` bits at the read cursor, returning them packed
    /// LSB-first; the cursor moves past the field.
    ///
    /// If `top_bit_order` is true, bit order and field order of `ordering`
    /// are complemented first. The persistent bit order of the buffer is not
    /// used.
    ///
    /// No bounds check is performed: callers must make sure that
    /// [`unread_len_bit`](RawBuffer::unread_len_bit) is at least
    /// `num_bits`, or use [`try_get_bits`](RawBuffer::try_get_bits).
    #[must_use]
    pub fn get_bits(&mut self, num_bits: usize, ordering: RawOrdering, top_bit_order: bool) -> Vec<u8> {
        let mut result = alloc::vec![0; num_bits.div_ceil(8)];
        self.get_bits_into(num_bits, &mut result, ordering, top_bit_order);
        result
    }

    /// Like [`get_bits`](RawBuffer::get_bits), but fails if fewer than
    /// `num_bits` bits are left.
    pub fn try_get_bits(
        &mut self,
        num_bits: usize,
        ordering: RawOrdering,
        top_bit_order: bool,
    ) -> Result<Vec<u8>, RawBufferError> {
        let available = self.unread_len_bit();
        if num_bits > available {
            return Err(RawBufferError::UnexpectedEnd {
                requested: num_bits,
                available,
            });
        }
        Ok(self.get_bits(num_bits, ordering, top_bit_order))
    }

    /// Like [`get_bits`](RawBuffer::get_bits), but stores the field in the
    /// first ⌈`num_bits` / 8⌉ bytes of `dst`.
    pub fn get_bits_into(
        &mut self,
        num_bits: usize,
        dst: &mut [u8],
        ordering: RawOrdering,
        top_bit_order: bool,
    ) {
        if num_bits == 0 {
            return;
        }
        #[cfg(feature = "checks")]
        assert!(
            num_bits <= self.unread_len_bit(),
            "cannot read {} bits: only {} bits are left",
            num_bits,
            self.unread_len_bit()
        );
        let ordering = ordering.flipped(top_bit_order);
        let start = self.get_pos_bit();
        let offset = start % 8;
        let dst = &mut dst[..num_bits.div_ceil(8)];

        if offset + num_bits <= 8 {
            dst[0] = unpack(
                ordering.bit,
                ordering.field,
                self.data[start / 8],
                offset as u32,
                num_bits as u32,
            );
        } else if offset == 0 && num_bits % 8 == 0 {
            dst.copy_from_slice(&self.data[start / 8..(start + num_bits) / 8]);
            if ordering.byte.is_msb() {
                dst.reverse();
            }
            if ordering.bit.is_msb() {
                dst.iter_mut().for_each(|b| *b = b.reverse_bits());
            }
        } else {
            let mut stream = alloc::vec![0; dst.len()];
            for (t, piece) in stream.iter_mut().enumerate() {
                let len = chunk_len(num_bits, t);
                *piece = match ordering.field {
                    Order::Lsb => LsbIntoLsb::extract(&self.data, start + 8 * t, len),
                    Order::Msb => MsbIntoMsb::extract(&self.data, start + 8 * t, len),
                };
            }
            from_slot_stream(&stream, dst, num_bits, ordering.bit == ordering.field, ordering.byte);
        }

        if ordering.hex.is_msb() {
            hex_swap(dst, num_bits, offset);
        }
        self.last_bit = Some(LastBit::at_slot(start + num_bits - 1, ordering.field));
        self.set_pos_bit(start + num_bits);
    }

    /// Append `num_bits` zero bits filling slots with field order `field`.
    ///
    /// The persistent bit order is not used, and the last-bit marker is not
    /// updated.
    pub fn put_zero(&mut self, num_bits: usize, field: Order) {
        if num_bits == 0 {
            return;
        }
        let start = self.bit_len();
        let end = start + num_bits;
        let offset = start % 8;
        // the bytes added by extend_to are already zero
        if offset != 0 {
            let i = start / 8;
            let len = (8 - offset).min(num_bits);
            self.data[i] = pack(field, field, self.data[i], offset as u32, len as u32, 0);
        }
        self.extend_to(end.div_ceil(8));
        self.write_bit_offset = (end % 8) as u8;
    }

    /// Append a `total_bits`-bit field obtained by repeating the lowest
    /// `pattern_len` bits of `pattern`; the last copy is truncated if
    /// needed.
    ///
    /// Each copy is written with bit order equal to `field` and byte order
    /// LSB, so that bit 0 of the pattern comes first. An empty pattern
    /// writes zeros.
    pub fn put_pattern(&mut self, total_bits: usize, pattern: &[u8], pattern_len: usize, field: Order) {
        if pattern_len == 0 {
            self.put_zero(total_bits, field.flip_if(self.current_bit_order));
            return;
        }
        let ordering = RawOrdering::new(field, Order::Lsb, field, Order::Lsb);
        let mut remaining = total_bits;
        while remaining > 0 {
            let len = remaining.min(pattern_len);
            self.put_bits(len, pattern, ordering, 0);
            remaining -= len;
        }
    }

    /// Append the lowest `num_bits` bits of `value`.
    ///
    /// This is [`put_bits`](RawBuffer::put_bits) applied to the
    /// little-endian representation of `value`.
    pub fn put_uint<T: PrimInt + Unsigned + ToBytes>(
        &mut self,
        value: T,
        num_bits: usize,
        ordering: RawOrdering,
        align: isize,
    ) {
        let bytes = value.to_le_bytes();
        self.put_bits(num_bits, bytes.as_ref(), ordering, align);
    }

    /// Read a `num_bits`-bit field into an unsigned integer; `num_bits` must
    /// not exceed the width of `T`.
    #[must_use]
    pub fn get_uint<T: PrimInt + Unsigned + From<u8>>(
        &mut self,
        num_bits: usize,
        ordering: RawOrdering,
        top_bit_order: bool,
    ) -> T {
        let width = core::mem::size_of::<T>();
        assert!(
            num_bits <= 8 * width,
            "cannot read {} bits into a {}-bit integer",
            num_bits,
            8 * width
        );
        let mut bytes = [0_u8; 16];
        self.get_bits_into(num_bits, &mut bytes, ordering, top_bit_order);
        bytes[..width]
            .iter()
            .enumerate()
            .fold(T::zero(), |value, (i, &b)| value | (<T as From<u8>>::from(b) << (8 * i)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::reference::ReferenceBuffer;

    const SOURCE: [u8; 6] = [0x5a, 0xc3, 0x0f, 0x96, 0xe1, 0x3b];

    fn masked(source: &[u8], num_bits: usize) -> Vec<u8> {
        zero_extend(source, num_bits, 0)
    }

    #[test]
    fn test_concrete() {
        let mut buffer = RawBuffer::new();
        let ordering = RawOrdering::default();
        buffer.put_zero(5, Order::Lsb);
        buffer.put_bits(3, &[0b011], ordering, 0);
        assert_eq!(buffer.get_data(), &[0b0110_0000]);
        buffer.set_pos_bit(5);
        assert_eq!(buffer.get_bits(3, ordering, false), [0b011]);

        // the same field under the other orderings
        for (bit, field, expected) in [
            (Order::Lsb, Order::Msb, 0b0000_0011_u8),
            (Order::Msb, Order::Lsb, 0b1100_0000),
            (Order::Msb, Order::Msb, 0b0000_0110),
        ] {
            let ordering = RawOrdering::default().with_bit(bit).with_field(field);
            let mut buffer = RawBuffer::new();
            buffer.put_zero(5, field);
            buffer.put_bits(3, &[0b011], ordering, 0);
            assert_eq!(buffer.get_data(), &[expected], "{ordering}");
        }
    }

    #[test]
    fn test_aligned() {
        let source = [0x01, 0x02, 0x80];
        for ordering in RawOrdering::all().filter(|o| o.hex.is_lsb()) {
            let mut buffer = RawBuffer::new();
            buffer.put_bits(24, &source, ordering, 0);
            let mut expected = source;
            if ordering.byte.is_msb() {
                expected.reverse();
            }
            if ordering.bit.is_msb() {
                expected.iter_mut().for_each(|b| *b = b.reverse_bits());
            }
            assert_eq!(buffer.get_data(), &expected, "{ordering}");
        }
    }

    #[test]
    fn test_against_reference() {
        for ordering in RawOrdering::all() {
            for lead in [0, 1, 3, 4, 7] {
                for num_bits in 0..=8 * SOURCE.len() {
                    let mut buffer = RawBuffer::new();
                    let mut reference = ReferenceBuffer::new();
                    buffer.put_zero(lead, ordering.field);
                    reference.put_zero(lead, ordering.field);
                    buffer.put_bits(num_bits, &SOURCE, ordering, 0);
                    reference.put_bits(num_bits, &SOURCE, ordering);
                    assert_eq!(
                        buffer.get_data(),
                        reference.bytes(),
                        "{ordering} lead={lead} num_bits={num_bits}"
                    );
                    assert_eq!(buffer.bit_len(), lead + num_bits);

                    buffer.set_pos_bit(lead);
                    assert_eq!(
                        buffer.get_bits(num_bits, ordering, false),
                        masked(&SOURCE, num_bits),
                        "{ordering} lead={lead} num_bits={num_bits}"
                    );
                    assert_eq!(buffer.unread_len_bit(), 0);
                }
            }
        }
    }

    #[test]
    fn test_current_bit_order() {
        let ordering = RawOrdering::default();
        let mut buffer = RawBuffer::new();
        buffer.set_order(true);
        assert!(buffer.get_order());
        buffer.put_bits(3, &[0b011], ordering, 0);
        assert_eq!(buffer.get_data(), &[0b1100_0000]);
        buffer.rewind();
        assert_eq!(buffer.get_bits(3, ordering, true), [0b011]);
        buffer.rewind();
        assert_eq!(buffer.get_bits(3, ordering, false), [0b000]);

        // zero fill ignores the persistent order
        buffer.put_zero(3, Order::Lsb);
        assert_eq!(buffer.bit_len(), 6);
        assert_eq!(buffer.get_data(), &[0b1100_0000]);
    }

    #[test]
    fn test_alignment() {
        for ordering in RawOrdering::all() {
            for num_bits in 0..20 {
                for align in -9_isize..=9 {
                    let mut buffer = RawBuffer::new();
                    buffer.put_bits(num_bits, &SOURCE, ordering, align);
                    let total = num_bits + align.unsigned_abs();
                    assert_eq!(buffer.bit_len(), total);
                    buffer.put_bits(8 - total % 8, &[0; 1], ordering, 0);
                    assert_eq!(buffer.bit_len() % 8, 0);

                    let pad = align.unsigned_abs();
                    if folds_alignment(ordering) {
                        let expected = if align > 0 {
                            zero_extend(&SOURCE, num_bits, pad)
                        } else {
                            shift_up(&SOURCE, num_bits, pad)
                        };
                        assert_eq!(buffer.get_bits(total, ordering, false), expected);
                    } else {
                        let before = (align < 0) != ordering.byte.is_msb();
                        let (first, second) = if before { (pad, 0) } else { (0, pad) };
                        assert!(buffer.get_bits(first, ordering, false).iter().all(|&b| b == 0));
                        assert_eq!(
                            buffer.get_bits(num_bits, ordering, false),
                            masked(&SOURCE, num_bits),
                            "{ordering} num_bits={num_bits} align={align}"
                        );
                        assert!(buffer.get_bits(second, ordering, false).iter().all(|&b| b == 0));
                    }
                }
            }
        }
    }

    #[test]
    fn test_pattern() {
        for field in [Order::Lsb, Order::Msb] {
            let ordering = RawOrdering::new(field, Order::Lsb, field, Order::Lsb);
            let mut manual = RawBuffer::new();
            manual.put_bits(1, &[1], ordering, 0);
            for _ in 0..6 {
                manual.put_bits(3, &[0b101], ordering, 0);
            }
            manual.put_bits(2, &[0b01], ordering, 0);

            let mut buffer = RawBuffer::new();
            buffer.put_bits(1, &[1], ordering, 0);
            buffer.put_pattern(20, &[0b101], 3, field);
            assert_eq!(buffer.get_data(), manual.get_data());
            assert_eq!(buffer.bit_len(), 21);
        }

        let mut buffer = RawBuffer::from(&[0xff][..]);
        buffer.put_pattern(12, &[], 0, Order::Msb);
        assert_eq!(buffer.get_data(), &[0xff, 0, 0]);
        assert_eq!(buffer.bit_len(), 20);
    }

    #[test]
    fn test_put_zero_preserves() {
        let mut buffer = RawBuffer::new();
        let ordering = RawOrdering::default().with_field(Order::Msb);
        buffer.put_bits(3, &[0b111], ordering, 0);
        buffer.set_last_bit(false);
        buffer.set_last_bit(true);
        buffer.put_zero(2, Order::Msb);
        buffer.put_bits(3, &[0b111], ordering, 0);
        assert_eq!(buffer.get_data(), &[0b1110_0111]);
        assert_eq!(buffer.get_pos(), 0);
    }

    #[test]
    fn test_last_bit() {
        let mut buffer = RawBuffer::new();
        let lsb = RawOrdering::default();
        buffer.put_bits(7, &[0b101_0101], lsb, 0);
        assert!(buffer.get_last_bit());
        buffer.set_last_bit(false);
        assert_eq!(buffer.get_data(), &[0b001_0101]);
        buffer.put_bits(9, &[0xff, 0x00], lsb, 0);
        assert_eq!(buffer.get_data(), &[0b1001_0101, 0b0111_1111]);
        assert!(!buffer.get_last_bit());
        buffer.set_last_bit(true);
        assert_eq!(buffer.get_data(), &[0b1001_0101, 0b1111_1111]);

        // reads move the marker too
        buffer.rewind();
        let _ = buffer.get_bits(4, lsb, false);
        assert!(!buffer.get_last_bit());
        let _ = buffer.get_bits(4, lsb, false);
        assert!(buffer.get_last_bit());
        buffer.set_last_bit(false);
        assert_eq!(buffer.get_data()[0], 0b0001_0101);

        // with field order MSB the last slot is counted from the top
        let mut buffer = RawBuffer::new();
        buffer.put_bits(2, &[0b11], lsb.with_field(Order::Msb), 0);
        buffer.set_last_bit(false);
        assert_eq!(buffer.get_data(), &[0b1000_0000]);
    }

    #[test]
    fn test_try_get_bits() {
        let mut buffer = RawBuffer::new();
        buffer.put_bits(10, &[0xff, 0x03], RawOrdering::default(), 0);
        assert_eq!(
            buffer.try_get_bits(11, RawOrdering::default(), false),
            Err(RawBufferError::UnexpectedEnd {
                requested: 11,
                available: 10
            })
        );
        assert_eq!(
            buffer.try_get_bits(10, RawOrdering::default(), false),
            Ok(alloc::vec![0xff, 0x03])
        );
        assert!(buffer.get_bits(0, RawOrdering::default(), false).is_empty());
    }

    #[test]
    fn test_uint() {
        let big_endian = RawOrdering::default()
            .with_byte(Order::Msb)
            .with_field(Order::Msb);
        let mut buffer = RawBuffer::new();
        buffer.put_uint(0x1234_u16, 16, big_endian, 0);
        buffer.put_uint(0xdead_beef_u32, 32, big_endian, 0);
        buffer.put_uint(5_u8, 3, RawOrdering::default(), 0);
        assert_eq!(buffer.get_data(), &[0x12, 0x34, 0xde, 0xad, 0xbe, 0xef, 0x05]);
        assert_eq!(buffer.get_uint::<u64>(16, big_endian, false), 0x1234);
        assert_eq!(buffer.get_uint::<u32>(32, big_endian, false), 0xdead_beef);
        assert_eq!(buffer.get_uint::<u8>(3, RawOrdering::default(), false), 5);
    }

    #[test]
    fn test_hex_order() {
        let hex = RawOrdering::default().with_hex(Order::Msb);
        let mut buffer = RawBuffer::new();
        buffer.put_bits(16, &[0x12, 0x34], hex, 0);
        assert_eq!(buffer.get_data(), &[0x21, 0x43]);

        let mut buffer = RawBuffer::new();
        buffer.put_zero(4, Order::Lsb);
        buffer.put_bits(24, &[0x12, 0x34, 0x56], hex, 0);
        assert_eq!(buffer.get_data(), &[0x20, 0x14, 0x36, 0x05]);
        buffer.set_pos_bit(4);
        assert_eq!(buffer.get_bits(24, hex, false), [0x12, 0x34, 0x56]);
    }
}
