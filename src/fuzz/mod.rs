/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Fuzzing harnesses, to be driven by `cargo fuzz` or by tests.

pub mod raw_buffer;
