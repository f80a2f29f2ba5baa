/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Ordering model and octet layouts.

[`RawOrdering`] gathers the four ordering axes of a RAW encoding; it is
passed by value to every bit-level operation. The sealed [`OctetLayout`]
trait and its four selector types contain the formulas that pack a short
field into a single octet.

*/

mod order;
pub use order::*;

mod layout;
pub use layout::{LsbIntoLsb, LsbIntoMsb, MsbIntoLsb, MsbIntoMsb, OctetLayout, SlotLayout};
pub(crate) use layout::{low_mask, pack, physical_bit, unpack};
