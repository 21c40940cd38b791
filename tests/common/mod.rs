// Test-only reference encoders and data generators.
//
// The crate only decodes, so integration tests build their compressed
// inputs here: a greedy LCW encoder and a Format40 differ. Both are
// simple and slow; they only need to produce valid streams.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wwcodec::AddressingMode;

// ---------------------------------------------------------------------------
// Data generators
// ---------------------------------------------------------------------------

pub fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill(&mut data[..]);
    data
}

/// Sprite-like data: runs of a few palette indices with repeated rows.
pub fn sprite_like(width: usize, height: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(width * height);
    for _ in 0..height {
        if !data.is_empty() && rng.random_range(0..4) == 0 {
            let start = data.len() - width;
            data.extend_from_within(start..start + width);
            continue;
        }
        let mut x = 0;
        while x < width {
            let run = rng.random_range(1..=12).min(width - x);
            let color: u8 = if rng.random_range(0..3) == 0 { 0 } else { rng.random() };
            data.extend(std::iter::repeat_n(color, run));
            x += run;
        }
    }
    data
}

/// Change roughly `changes` scattered bytes of `frame`.
pub fn mutate(frame: &[u8], changes: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut next = frame.to_vec();
    if next.is_empty() {
        return next;
    }
    for _ in 0..changes {
        let pos = rng.random_range(0..next.len());
        let len = rng.random_range(1..=8).min(next.len() - pos);
        let value: u8 = rng.random();
        next[pos..pos + len].fill(value);
    }
    next
}

// ---------------------------------------------------------------------------
// LCW reference encoder
// ---------------------------------------------------------------------------

const MAX_TRANSFER: usize = 63;
const MAX_LONG: usize = 0xFFFF;

fn flush_literals(out: &mut Vec<u8>, literals: &mut Vec<u8>) {
    for chunk in literals.chunks(MAX_TRANSFER) {
        out.push(0x80 | chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
    literals.clear();
}

fn run_length(data: &[u8], pos: usize) -> usize {
    let value = data[pos];
    data[pos..]
        .iter()
        .take(MAX_LONG)
        .take_while(|&&b| b == value)
        .count()
}

/// Longest earlier match for `data[pos..]`, as `(source, length)`.
/// Sources may overlap the bytes being produced.
fn longest_match(data: &[u8], pos: usize, mode: AddressingMode) -> (usize, usize) {
    let mut best = (0, 0);
    let lowest = match mode {
        AddressingMode::Absolute => 0,
        AddressingMode::Relative => pos.saturating_sub(MAX_LONG),
    };
    let highest = match mode {
        AddressingMode::Absolute => pos.min(MAX_LONG + 1),
        AddressingMode::Relative => pos,
    };
    for src in lowest..highest {
        let len = data[pos..]
            .iter()
            .take(MAX_LONG)
            .enumerate()
            .take_while(|&(k, &b)| data[src + k] == b)
            .count();
        if len > best.1 {
            best = (src, len);
        }
    }
    best
}

fn emit_copy(out: &mut Vec<u8>, pos: usize, src: usize, len: usize, mode: AddressingMode) {
    let distance = pos - src;
    if distance <= 0xFFF && len <= 10 {
        out.push((((len - 3) as u8) << 4) | (distance >> 8) as u8);
        out.push(distance as u8);
        return;
    }
    let operand = match mode {
        AddressingMode::Absolute => src,
        AddressingMode::Relative => distance,
    } as u16;
    if len <= 66 {
        out.push(0xC0 | (len - 3) as u8);
        out.extend_from_slice(&operand.to_le_bytes());
    } else {
        out.push(0xFF);
        out.extend_from_slice(&(len as u16).to_le_bytes());
        out.extend_from_slice(&operand.to_le_bytes());
    }
}

/// Greedy LCW encoder. Relative streams start with the mode marker.
pub fn lcw_encode(data: &[u8], mode: AddressingMode) -> Vec<u8> {
    let mut out = Vec::new();
    if mode == AddressingMode::Relative {
        out.push(0x00);
    }
    let mut literals = Vec::new();
    let mut pos = 0;
    while pos < data.len() {
        let run = run_length(data, pos);
        let (src, len) = longest_match(data, pos, mode);
        if run >= 4 && run >= len {
            flush_literals(&mut out, &mut literals);
            out.push(0xFE);
            out.extend_from_slice(&(run as u16).to_le_bytes());
            out.push(data[pos]);
            pos += run;
        } else if len >= 3 {
            flush_literals(&mut out, &mut literals);
            emit_copy(&mut out, pos, src, len, mode);
            pos += len;
        } else {
            literals.push(data[pos]);
            pos += 1;
        }
    }
    flush_literals(&mut out, &mut literals);
    out.push(0x80);
    out
}

/// LCW stream made only of transfers.
pub fn lcw_literal(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut literals = data.to_vec();
    flush_literals(&mut out, &mut literals);
    out.push(0x80);
    out
}

// ---------------------------------------------------------------------------
// Format40 reference differ
// ---------------------------------------------------------------------------

fn emit_skip(out: &mut Vec<u8>, mut count: usize) {
    while count > 0 {
        if count <= 0x7F {
            out.push(0x80 | count as u8);
            return;
        }
        let step = count.min(0x7FFF);
        out.push(0x80);
        out.extend_from_slice(&(step as u16).to_le_bytes());
        count -= step;
    }
}

fn emit_xor(out: &mut Vec<u8>, bytes: &[u8]) {
    if bytes.len() <= 0x7F {
        out.push(bytes.len() as u8);
        out.extend_from_slice(bytes);
        return;
    }
    for chunk in bytes.chunks(0x3FFF) {
        out.push(0x80);
        out.extend_from_slice(&(0x8000 | chunk.len() as u16).to_le_bytes());
        out.extend_from_slice(chunk);
    }
}

fn emit_fill_xor(out: &mut Vec<u8>, count: usize, value: u8) {
    if count <= 0xFF {
        out.extend_from_slice(&[0x00, count as u8, value]);
    } else {
        for step in (0..count).step_by(0x3FFF) {
            let n = (count - step).min(0x3FFF);
            out.push(0x80);
            out.extend_from_slice(&(0xC000 | n as u16).to_le_bytes());
            out.push(value);
        }
    }
}

/// Format40 stream turning `old` into `new`. Both must be the same length.
pub fn format40_diff(old: &[u8], new: &[u8]) -> Vec<u8> {
    assert_eq!(old.len(), new.len());
    let xor: Vec<u8> = old.iter().zip(new).map(|(a, b)| a ^ b).collect();
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < xor.len() {
        let same = xor[pos..].iter().take_while(|&&b| b == xor[pos]).count();
        if xor[pos] == 0 {
            emit_skip(&mut out, same);
            pos += same;
        } else if same >= 4 {
            emit_fill_xor(&mut out, same, xor[pos]);
            pos += same;
        } else {
            let end = (pos + 1..xor.len())
                .find(|&i| xor[i] == 0)
                .unwrap_or(xor.len())
                .min(pos + 0x3FFF);
            emit_xor(&mut out, &xor[pos..end]);
            pos = end;
        }
    }
    out.extend_from_slice(&[0x80, 0x00, 0x00]);
    out
}

/// LCW-wrapped Format40 frame, as stored in animation files.
pub fn delta_frame(old: &[u8], new: &[u8]) -> Vec<u8> {
    lcw_encode(&format40_diff(old, new), AddressingMode::Absolute)
}

pub fn hex_to_bytes(s: &str) -> Vec<u8> {
    let s: String = s.split_whitespace().collect();
    assert!(s.len().is_multiple_of(2), "hex string must have even length");
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}
