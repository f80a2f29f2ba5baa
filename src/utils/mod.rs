/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Bit helpers and a reference model.

[`bits`] contains the helpers on LSB-first bit sequences used by the
buffer; [`reference`] contains [`ReferenceBuffer`], a bit-by-bit
implementation of bit-field layout against which the fast paths of
[`RawBuffer`](crate::impls::RawBuffer) are tested.

*/

pub mod bits;

pub mod reference;
pub use reference::ReferenceBuffer;
