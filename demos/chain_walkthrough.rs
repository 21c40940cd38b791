// Decode a tiny hand-assembled animation: one base frame, two delta frames
// and a loop frame, printing the canvas after each step.
//
//   cargo run --example chain_walkthrough

use wwcodec::lcw::Commands;
use wwcodec::{AddressingMode, FrameChainResolver, FrameDescriptor, delta_apply, lcw_decompress};

/// Store `raw` as a single LCW transfer (at most 63 bytes).
fn lcw_wrap(raw: &[u8]) -> Vec<u8> {
    assert!(raw.len() <= 0x3F);
    let mut out = vec![0x80 | raw.len() as u8];
    out.extend_from_slice(raw);
    out.push(0x80);
    out
}

fn hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(" ")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 4x2 canvas: four literal bytes, then a medium copy of them.
    let base = [0x84, 0x01, 0x02, 0x03, 0x04, 0xC1, 0x00, 0x00, 0x80];
    println!("base stream commands:");
    for item in Commands::new(&base, AddressingMode::Absolute) {
        let (offset, command) = item?;
        println!("  {offset:04x}  {command:?}");
    }
    println!("standalone decode: {}", hex(&lcw_decompress(&base, 8, AddressingMode::Absolute)?));

    // Skip 2, xor two bytes with ff.
    let delta1 = lcw_wrap(&[0x82, 0x02, 0xFF, 0xFF, 0x80, 0x00, 0x00]);
    // Skip 4, xor-fill the last four bytes with 0x10.
    let delta2 = lcw_wrap(&[0x84, 0x00, 0x04, 0x10, 0x80, 0x00, 0x00]);
    // Undo both changes: the loop frame returns to the base image.
    let loop_delta = lcw_wrap(&[0x82, 0x02, 0xFF, 0xFF, 0x84, 0x00, 0x04, 0x10, 0x80, 0x00, 0x00]);

    let mut resolver = FrameChainResolver::with_dimensions(4, 2);
    let frames = [
        FrameDescriptor::base(&base),
        FrameDescriptor::delta(&delta1),
        FrameDescriptor::delta(&delta2),
    ];
    for (i, frame) in frames.into_iter().enumerate() {
        let canvas = resolver.decode_next_frame(frame)?;
        println!("frame {i}: {}", hex(canvas));
    }
    resolver.decode_next_frame(FrameDescriptor::delta(&loop_delta).as_loop())?;

    let finished = resolver.finish();
    if let Some(loop_frame) = &finished.loop_frame {
        println!("loop:    {}", hex(loop_frame));
    }
    println!("{} visible frames decoded", finished.frames_decoded);

    // A delta stream can also be applied directly to any buffer.
    let mut buffer = *b"ABCD";
    delta_apply(&[0x82, 0x01, 0xFF, 0x80, 0x00, 0x00], &mut buffer)?;
    println!("direct delta on ABCD: {}", hex(&buffer));

    Ok(())
}
