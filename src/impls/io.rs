/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::impls::RawBuffer;
use std::io::{Read, Write};

/// Writing appends bytes, closing a pending partial octet as
/// [`put_s`](RawBuffer::put_s) does.
impl Write for RawBuffer {
    #[inline(always)]
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.put_s(buf);
        Ok(buf.len())
    }

    #[inline(always)]
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Reading consumes the bytes from the byte offset of the read cursor; the
/// bit offset of the cursor is discarded.
impl Read for RawBuffer {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let unread = self.get_read_data();
        let n = unread.len().min(buf.len());
        buf[..n].copy_from_slice(&unread[..n]);
        self.set_pos(self.get_pos() + n);
        Ok(n)
    }
}

impl RawBuffer {
    /// Append at most `max_len` bytes read from `reader` with a single call
    /// to [`Read::read`], returning the number of bytes appended.
    ///
    /// The bytes are read directly into the free tail of the storage, which
    /// is then shrunk back if the reader supplied less than `max_len` bytes.
    pub fn fill_from<R: Read>(&mut self, reader: &mut R, max_len: usize) -> std::io::Result<usize> {
        let tail = self.get_end(max_len);
        let n = reader.read(&mut tail[..max_len])?;
        self.increase_length(n);
        if n < max_len {
            self.shrink();
        }
        Ok(n)
    }
}
