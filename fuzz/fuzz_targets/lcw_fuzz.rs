#![no_main]
use libfuzzer_sys::fuzz_target;
use wwcodec::{AddressingMode, lcw_decompress};

fuzz_target!(|data: &[u8]| {
    // First two bytes pick the capacity; the rest is the stream.
    if data.len() < 2 {
        return;
    }
    let capacity = u16::from_le_bytes([data[0], data[1]]) as usize;
    let stream = &data[2..];

    for mode in [AddressingMode::Absolute, AddressingMode::Relative] {
        if let Ok(out) = lcw_decompress(stream, capacity, mode) {
            assert!(out.len() <= capacity);
        }
    }
});
