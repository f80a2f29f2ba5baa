#![no_main]

use libfuzzer_sys::fuzz_target;
use raw_buffer::fuzz::raw_buffer::*;

fuzz_target!(|data: FuzzCase| harness(data));
