/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::ext_bit::ExtBitRegion;
use crate::error::{RawBufferError, fatal};
use crate::traits::{Order, physical_bit};
use alloc::string::String;
use alloc::vec::Vec;
use log::{debug, trace};
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// The initial capacity of a [`RawBuffer`], in bytes. Capacities are always
/// this value multiplied by a power of two.
pub const INITIAL_SIZE: usize = 1024;

/// Return the smallest capacity bucket holding `required` bytes, or `None`
/// if doubling overflows.
#[must_use]
fn bucket_size(required: usize) -> Option<usize> {
    let mut size = INITIAL_SIZE;
    while size < required {
        size = size.checked_mul(2)?;
    }
    Some(size)
}

/// Position of the last bit written or read by a bit-field operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize), mem_size(flat))]
pub(crate) struct LastBit {
    /// Index of the octet.
    pub(crate) byte: usize,
    /// Physical index of the bit in the octet (0 = least significant).
    pub(crate) bit: u8,
}

impl LastBit {
    /// The last bit is in absolute slot `slot` of a field laid out with
    /// field order `field`.
    pub(crate) fn at_slot(slot: usize, field: Order) -> Self {
        Self {
            byte: slot / 8,
            bit: physical_bit((slot % 8) as u32, field) as u8,
        }
    }
}

/// A growable byte store that can be written and read at bit granularity.
///
/// Data is appended at the end of the buffer: whole bytes with
/// [`put_s`](RawBuffer::put_s) and friends, bit fields with
/// [`put_bits`](RawBuffer::put_bits). A pending partial octet is tracked by
/// a write bit offset, so that the next bit field continues in it. Reads
/// start from an independent read cursor, made of a byte offset and a bit
/// offset, that can be moved freely within the data.
///
/// Storage grows by doubling, starting from [`INITIAL_SIZE`] bytes; copies
/// (via [`Clone`]) are deep.
///
/// # Example
/// ```
/// use raw_buffer::prelude::*;
///
/// let mut buffer = RawBuffer::new();
/// let ordering = RawOrdering::default();
/// buffer.put_zero(5, Order::Lsb);
/// buffer.put_bits(3, &[0b011], ordering, 0);
/// assert_eq!(buffer.get_data(), &[0b0110_0000]);
///
/// buffer.set_pos_bit(5);
/// assert_eq!(buffer.get_bits(3, ordering, false), [0b011]);
/// assert_eq!(buffer.unread_len_bit(), 0);
/// ```
#[derive(Clone)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct RawBuffer {
    /// The storage; its length is the capacity of the buffer.
    pub(super) data: Vec<u8>,
    /// The number of bytes in use.
    pub(super) len: usize,
    /// The number of slots used in the last octet, or zero if the data ends
    /// on an octet boundary.
    pub(super) write_bit_offset: u8,
    /// The byte offset of the read cursor.
    pub(super) read_pos: usize,
    /// The bit offset of the read cursor within its octet.
    pub(super) read_bit_offset: u8,
    /// Whether bit order and field order are complemented on writes.
    pub(super) current_bit_order: bool,
    pub(super) last_bit: Option<LastBit>,
    pub(super) region: ExtBitRegion,
}

impl RawBuffer {
    /// Create an empty buffer; no storage is allocated until the first
    /// write.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            len: 0,
            write_bit_offset: 0,
            read_pos: 0,
            read_bit_offset: 0,
            current_bit_order: false,
            last_bit: None,
            region: ExtBitRegion::Inactive,
        }
    }

    /// Create a buffer containing one byte per character of `s`.
    ///
    /// Characters beyond U+00FF are truncated to their lowest octet.
    #[must_use]
    pub fn from_chars(s: &str) -> Self {
        let mut buffer = Self::new();
        buffer.put_string(s);
        buffer
    }

    /// Replace the content of the buffer with `bytes`, resetting the
    /// cursors and all bit bookkeeping.
    pub fn assign(&mut self, bytes: &[u8]) {
        self.clear();
        self.put_s(bytes);
    }

    /// Remove all data, resetting the cursors and all bit bookkeeping.
    ///
    /// The storage is kept.
    pub fn clear(&mut self) {
        self.len = 0;
        self.write_bit_offset = 0;
        self.rewind();
        self.reset_bookkeeping();
    }

    pub(super) fn reset_bookkeeping(&mut self) {
        self.last_bit = None;
        self.region = ExtBitRegion::Inactive;
    }

    /// Return the size of the storage in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Return the length of the data in bytes, including a trailing
    /// partial octet.
    #[must_use]
    pub fn get_len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return the length of the data in bits, excluding the unused slots of
    /// a trailing partial octet.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        if self.write_bit_offset == 0 {
            self.len * 8
        } else {
            (self.len - 1) * 8 + self.write_bit_offset as usize
        }
    }

    /// Return the number of bytes from the read cursor to the end.
    #[must_use]
    pub fn get_read_len(&self) -> usize {
        self.len - self.read_pos
    }

    /// Return the number of bits from the read cursor to the end.
    #[must_use]
    pub fn unread_len_bit(&self) -> usize {
        self.bit_len().saturating_sub(self.get_pos_bit())
    }

    /// Return the byte offset of the read cursor.
    #[must_use]
    pub fn get_pos(&self) -> usize {
        self.read_pos
    }

    /// Return the position of the read cursor in bits.
    #[must_use]
    pub fn get_pos_bit(&self) -> usize {
        self.read_pos * 8 + self.read_bit_offset as usize
    }

    /// Make sure that `additional` more bytes fit in the storage.
    ///
    /// The new capacity is the smallest multiple of [`INITIAL_SIZE`] by a
    /// power of two holding the data; the data is preserved.
    pub fn try_ensure_capacity(&mut self, additional: usize) -> Result<(), RawBufferError> {
        let overflow = RawBufferError::CapacityOverflow {
            len: self.len,
            additional,
        };
        let required = self.len.checked_add(additional).ok_or(overflow)?;
        if required <= self.data.len() {
            return Ok(());
        }
        let capacity = bucket_size(required).ok_or(overflow)?;
        debug!(
            "Growing RawBuffer storage from {} to {} bytes",
            self.data.len(),
            capacity
        );
        self.data.resize(capacity, 0);
        Ok(())
    }

    /// Like [`try_ensure_capacity`](RawBuffer::try_ensure_capacity), but
    /// panics if the size computation overflows.
    #[track_caller]
    pub fn ensure_capacity(&mut self, additional: usize) {
        if let Err(error) = self.try_ensure_capacity(additional) {
            fatal(error);
        }
    }

    /// Extend the data to `new_len` bytes, zeroing the new bytes.
    #[track_caller]
    pub(super) fn extend_to(&mut self, new_len: usize) {
        if new_len > self.len {
            self.ensure_capacity(new_len - self.len);
            self.data[self.len..new_len].fill(0);
            self.len = new_len;
        }
    }

    /// Release storage exceeding the bucket of the current length.
    pub(super) fn shrink(&mut self) {
        if self.data.is_empty() {
            return;
        }
        // the length never exceeds the current capacity, so this cannot fail
        let target = bucket_size(self.len).unwrap_or(self.data.len());
        if target < self.data.len() {
            debug!(
                "Shrinking RawBuffer storage from {} to {} bytes",
                self.data.len(),
                target
            );
            self.data.truncate(target);
            self.data.shrink_to_fit();
        }
    }

    /// Move the read cursor to byte `pos`, or to the end if `pos` is beyond
    /// it.
    pub fn set_pos(&mut self, pos: usize) {
        self.read_pos = pos.min(self.len);
        self.read_bit_offset = 0;
    }

    /// Move the read cursor to bit `pos_bit`, or to the end if `pos_bit` is
    /// beyond it.
    pub fn set_pos_bit(&mut self, pos_bit: usize) {
        let pos_bit = pos_bit.min(self.len * 8);
        self.read_pos = pos_bit / 8;
        self.read_bit_offset = (pos_bit % 8) as u8;
    }

    /// Advance the read cursor by `delta` bytes, stopping at the end.
    pub fn increase_pos(&mut self, delta: usize) {
        self.read_pos = self.read_pos.saturating_add(delta).min(self.len);
        if self.read_pos == self.len {
            self.read_bit_offset = 0;
        }
    }

    /// Advance the read cursor by `delta` bits, stopping at the end.
    pub fn increase_pos_bit(&mut self, delta: usize) {
        self.set_pos_bit(self.get_pos_bit().saturating_add(delta));
    }

    /// Advance the read cursor to the next multiple of `padding` bits and
    /// return the number of bits skipped.
    ///
    /// Nothing happens if `padding` is zero or the cursor is already on a
    /// multiple of `padding`.
    pub fn increase_pos_padd(&mut self, padding: usize) -> usize {
        if padding == 0 {
            return 0;
        }
        let pos = self.get_pos_bit();
        self.set_pos_bit(pos.next_multiple_of(padding));
        self.get_pos_bit() - pos
    }

    /// Move the read cursor to the start of the data.
    pub fn rewind(&mut self) {
        self.read_pos = 0;
        self.read_bit_offset = 0;
    }

    /// Return whether bit order and field order are complemented on
    /// writes.
    #[must_use]
    pub fn get_order(&self) -> bool {
        self.current_bit_order
    }

    /// Set whether bit order and field order are complemented on writes.
    pub fn set_order(&mut self, current_bit_order: bool) {
        self.current_bit_order = current_bit_order;
    }

    /// Append `bytes`.
    ///
    /// A pending partial octet is closed: its unused slots stay zero, and
    /// the bytes are appended after it.
    pub fn put_s(&mut self, bytes: &[u8]) {
        self.ensure_capacity(bytes.len());
        self.data[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        self.write_bit_offset = 0;
    }

    /// Append a single byte.
    pub fn put_c(&mut self, byte: u8) {
        self.put_s(&[byte]);
    }

    /// Append the data of another buffer.
    pub fn put_buf(&mut self, other: &RawBuffer) {
        self.put_s(other.get_data());
    }

    /// Append one byte per character of `s`; characters beyond U+00FF are
    /// truncated to their lowest octet.
    pub fn put_string(&mut self, s: &str) {
        self.ensure_capacity(s.len());
        for c in s.chars() {
            self.data[self.len] = c as u8;
            self.len += 1;
        }
        self.write_bit_offset = 0;
    }

    /// Return all the data.
    #[must_use]
    pub fn get_data(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Return the data from the byte offset of the read cursor to the end.
    #[must_use]
    pub fn get_read_data(&self) -> &[u8] {
        &self.data[self.read_pos..self.len]
    }

    /// Return a copy of all the data.
    #[must_use]
    pub fn to_octets(&self) -> Vec<u8> {
        self.get_data().to_vec()
    }

    /// Return all the data as characters, one per byte.
    #[must_use]
    pub fn to_chars(&self) -> String {
        self.get_data().iter().map(|&b| b as char).collect()
    }

    /// Return a copy of the unread data and move the read cursor to the end.
    pub fn take_octets(&mut self) -> Vec<u8> {
        let result = self.get_read_data().to_vec();
        self.set_pos(self.len);
        result
    }

    /// Return the unread data as characters, one per byte, and move the
    /// read cursor to the end.
    pub fn take_chars(&mut self) -> String {
        let result = self.get_read_data().iter().map(|&b| b as char).collect();
        self.set_pos(self.len);
        result
    }

    /// Return the free tail of the storage, making sure it is at least
    /// `min_len` bytes long.
    ///
    /// Bytes written into the tail become part of the data after a call to
    /// [`increase_length`](RawBuffer::increase_length).
    pub fn get_end(&mut self, min_len: usize) -> &mut [u8] {
        self.ensure_capacity(min_len);
        &mut self.data[self.len..]
    }

    /// Make the first `count` bytes of the free tail part of the data.
    pub fn try_increase_length(&mut self, count: usize) -> Result<(), RawBufferError> {
        let available = self.data.len() - self.len;
        if count > available {
            return Err(RawBufferError::TailOverflow {
                requested: count,
                available,
            });
        }
        self.len += count;
        self.write_bit_offset = 0;
        Ok(())
    }

    /// Like [`try_increase_length`](RawBuffer::try_increase_length), but
    /// panics if `count` exceeds the free tail.
    #[track_caller]
    pub fn increase_length(&mut self, count: usize) {
        if let Err(error) = self.try_increase_length(count) {
            fatal(error);
        }
    }

    /// Discard the data before the byte offset of the read cursor.
    ///
    /// The remaining data is moved to the start of the storage, which is
    /// shrunk if possible. The buffer is then back to its initial bit state:
    /// the read cursor is rewound, the next bit field starts on a fresh
    /// octet, the persistent bit order is cleared, and the last-bit and
    /// extension-bit bookkeeping is reset.
    pub fn try_cut(&mut self) -> Result<(), RawBufferError> {
        if self.read_pos > self.len {
            return Err(RawBufferError::PositionBeyondEnd {
                pos: self.read_pos,
                len: self.len,
            });
        }
        if self.read_pos > 0 {
            trace!("Cutting {} consumed bytes", self.read_pos);
            self.data.copy_within(self.read_pos..self.len, 0);
            self.len -= self.read_pos;
        }
        self.write_bit_offset = 0;
        self.current_bit_order = false;
        self.rewind();
        self.reset_bookkeeping();
        self.shrink();
        Ok(())
    }

    /// Like [`try_cut`](RawBuffer::try_cut), but panics if the read
    /// position is beyond the end.
    #[track_caller]
    pub fn cut(&mut self) {
        if let Err(error) = self.try_cut() {
            fatal(error);
        }
    }

    /// Discard the data from the byte offset of the read cursor to the end.
    ///
    /// The byte offset of the read cursor stays where it is, and is now the
    /// end; a partially read octet is discarded with the rest, so the bit
    /// offset of the cursor goes back to zero. The storage is shrunk if
    /// possible, and the last-bit and extension-bit bookkeeping is reset.
    pub fn try_cut_end(&mut self) -> Result<(), RawBufferError> {
        if self.read_pos > self.len {
            return Err(RawBufferError::PositionBeyondEnd {
                pos: self.read_pos,
                len: self.len,
            });
        }
        if self.read_pos < self.len {
            trace!("Cutting {} unread bytes", self.len - self.read_pos);
            self.len = self.read_pos;
        }
        self.read_bit_offset = 0;
        self.write_bit_offset = 0;
        self.reset_bookkeeping();
        self.shrink();
        Ok(())
    }

    /// Like [`try_cut_end`](RawBuffer::try_cut_end), but panics if the read
    /// position is beyond the end.
    #[track_caller]
    pub fn cut_end(&mut self) {
        if let Err(error) = self.try_cut_end() {
            fatal(error);
        }
    }

    /// Return the value of the last bit written or read by a bit-field
    /// operation.
    pub fn try_get_last_bit(&self) -> Result<bool, RawBufferError> {
        let last = self.last_bit.ok_or(RawBufferError::NoLastBit)?;
        Ok((self.data[last.byte] >> last.bit) & 1 != 0)
    }

    /// Like [`try_get_last_bit`](RawBuffer::try_get_last_bit), but panics if
    /// there is no last bit.
    #[track_caller]
    #[must_use]
    pub fn get_last_bit(&self) -> bool {
        self.try_get_last_bit().unwrap_or_else(|error| fatal(error))
    }

    /// Force the last bit written or read by a bit-field operation to
    /// `value`.
    pub fn try_set_last_bit(&mut self, value: bool) -> Result<(), RawBufferError> {
        let last = self.last_bit.ok_or(RawBufferError::NoLastBit)?;
        let mask = 1 << last.bit;
        if value {
            self.data[last.byte] |= mask;
        } else {
            self.data[last.byte] &= !mask;
        }
        Ok(())
    }

    /// Like [`try_set_last_bit`](RawBuffer::try_set_last_bit), but panics if
    /// there is no last bit.
    #[track_caller]
    pub fn set_last_bit(&mut self, value: bool) {
        if let Err(error) = self.try_set_last_bit(value) {
            fatal(error);
        }
    }
}

impl Default for RawBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for RawBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawBuffer")
            .field("data", &self.get_data())
            .field("capacity", &self.capacity())
            .field("write_bit_offset", &self.write_bit_offset)
            .field("read_pos", &self.read_pos)
            .field("read_bit_offset", &self.read_bit_offset)
            .field("current_bit_order", &self.current_bit_order)
            .finish()
    }
}

/// Buffers are equal if their data is equal; cursors and storage size are
/// not compared.
impl PartialEq for RawBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.get_data() == other.get_data()
    }
}

impl Eq for RawBuffer {}

impl From<&[u8]> for RawBuffer {
    fn from(bytes: &[u8]) -> Self {
        let mut buffer = Self::new();
        buffer.put_s(bytes);
        buffer
    }
}

impl From<Vec<u8>> for RawBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from(bytes.as_slice())
    }
}

impl From<&str> for RawBuffer {
    fn from(s: &str) -> Self {
        Self::from_chars(s)
    }
}
