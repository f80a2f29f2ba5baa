/*
 * SPDX-FileCopyrightText: 2026 The raw-buffer authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![cfg(feature = "fuzz")]

use arbitrary::{Arbitrary, Unstructured};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use raw_buffer::fuzz::raw_buffer::*;

/// Run the differential harness on pseudorandom inputs.
#[test]
fn test_random_cases() -> arbitrary::Result<()> {
    let mut r = SmallRng::seed_from_u64(0);
    for _ in 0..500 {
        let mut bytes = vec![0_u8; r.random_range(0..4096)];
        r.fill(&mut bytes[..]);
        let mut unstructured = Unstructured::new(&bytes);
        harness(FuzzCase::arbitrary(&mut unstructured)?);
    }
    Ok(())
}
