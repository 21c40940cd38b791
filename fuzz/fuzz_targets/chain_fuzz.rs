#![no_main]
use libfuzzer_sys::fuzz_target;
use wwcodec::{FrameChainResolver, FrameDescriptor};

fuzz_target!(|data: &[u8]| {
    // Byte 0: canvas size. Then frames separated by 0xAA, the first one
    // a base frame and the rest deltas.
    let Some((&size, rest)) = data.split_first() else {
        return;
    };
    let mut resolver = FrameChainResolver::new(size as usize);
    for (i, chunk) in rest.split(|&b| b == 0xAA).take(16).enumerate() {
        let frame = if i == 0 {
            FrameDescriptor::base(chunk)
        } else {
            FrameDescriptor::delta(chunk)
        };
        let before = resolver.canvas().to_vec();
        match resolver.decode_next_frame(frame) {
            Ok(canvas) => assert_eq!(canvas.len(), size as usize),
            Err(_) => assert_eq!(resolver.canvas(), &before[..]),
        }
    }
});
