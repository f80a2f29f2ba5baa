/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

The bit-addressable buffer.

[`RawBuffer`] is a growable byte store with an implicit write cursor at the
end of the data and an explicit read cursor. Whole bytes are appended with
[`put_s`](RawBuffer::put_s) and read with
[`get_read_data`](RawBuffer::get_read_data); bit fields are transferred
with [`put_bits`](RawBuffer::put_bits) and
[`get_bits`](RawBuffer::get_bits) under a
[`RawOrdering`](crate::traits::RawOrdering) passed at each call.

Extension-bit regions ([`start_region`](RawBuffer::start_region) and
[`stop_region`](RawBuffer::stop_region)) rewrite a continuation bit in
every octet written between the two calls.

With the `std` feature, [`RawBuffer`] implements [`std::io::Read`] and
[`std::io::Write`].

*/

mod raw_buffer;
pub use raw_buffer::*;

mod bit_field;
mod ext_bit;

#[cfg(feature = "std")]
mod io;
