// LCW decompressor: executes decoded commands against a fixed-capacity
// output buffer.
//
// Copies run forward one byte at a time whenever source and destination
// overlap, so a distance shorter than the count replicates the trailing
// window (run-length extension). Disjoint copies take the bulk path, which
// produces identical output.

use super::command::{AddressingMode, Command, next_command};
use crate::cursor::CompressedCursor;
use crate::error::{BackReference, DecodeError, Stage};

// ---------------------------------------------------------------------------
// Output window
// ---------------------------------------------------------------------------

/// Write cursor over the caller's output buffer.
struct OutputWindow<'o> {
    buf: &'o mut [u8],
    written: usize,
}

impl OutputWindow<'_> {
    #[inline]
    fn available(&self) -> usize {
        self.buf.len() - self.written
    }

    #[inline]
    fn ensure_room(&self, offset: usize, context: &'static str, count: usize) -> Result<(), DecodeError> {
        if count > self.available() {
            return Err(DecodeError::overflow(
                Stage::Lcw,
                offset,
                context,
                count,
                self.available(),
            ));
        }
        Ok(())
    }

    fn transfer(&mut self, offset: usize, bytes: &[u8]) -> Result<(), DecodeError> {
        self.ensure_room(offset, "transfer", bytes.len())?;
        self.buf[self.written..self.written + bytes.len()].copy_from_slice(bytes);
        self.written += bytes.len();
        Ok(())
    }

    fn fill(&mut self, offset: usize, count: usize, value: u8) -> Result<(), DecodeError> {
        self.ensure_room(offset, "fill", count)?;
        self.buf[self.written..self.written + count].fill(value);
        self.written += count;
        Ok(())
    }

    /// Copy `count` bytes starting `distance` bytes behind the write cursor.
    /// The source is validated even when `count` is zero.
    fn copy_back(&mut self, offset: usize, count: usize, distance: usize) -> Result<(), DecodeError> {
        if distance == 0 || distance > self.written {
            return Err(DecodeError::InvalidBackReference {
                stage: Stage::Lcw,
                offset,
                reference: BackReference::Distance(distance),
                written: self.written,
            });
        }
        if count == 0 {
            return Ok(());
        }
        self.ensure_room(offset, "copy", count)?;
        self.copy_from(self.written - distance, count);
        Ok(())
    }

    /// Copy `count` bytes starting at absolute output `position`.
    fn copy_at(&mut self, offset: usize, count: usize, position: usize) -> Result<(), DecodeError> {
        if position >= self.written {
            return Err(DecodeError::InvalidBackReference {
                stage: Stage::Lcw,
                offset,
                reference: BackReference::Position(position),
                written: self.written,
            });
        }
        if count == 0 {
            return Ok(());
        }
        self.ensure_room(offset, "copy", count)?;
        self.copy_from(position, count);
        Ok(())
    }

    /// Forward copy from an already-written `src`; room has been checked.
    #[inline]
    fn copy_from(&mut self, src: usize, count: usize) {
        let dst = self.written;
        if src + count <= dst {
            // Fast path: disjoint ranges.
            self.buf.copy_within(src..src + count, dst);
        } else {
            // Overlap: each byte may read one written earlier in this copy.
            for i in 0..count {
                self.buf[dst + i] = self.buf[src + i];
            }
        }
        self.written += count;
    }
}

// ---------------------------------------------------------------------------
// Decompression
// ---------------------------------------------------------------------------

/// Decompress an LCW stream into `output`, returning the number of bytes
/// written.
///
/// Decoding stops at the `End` command. Bytes past the returned count are
/// left untouched. On error the contents of `output` are unspecified.
pub fn lcw_decompress_into(
    input: &[u8],
    output: &mut [u8],
    mode: AddressingMode,
) -> Result<usize, DecodeError> {
    let (mode, marker_len) = AddressingMode::detect(input, mode);
    let mut cursor = CompressedCursor::new(input, Stage::Lcw);
    for _ in 0..marker_len {
        cursor.next_u8();
    }

    let mut out = OutputWindow {
        buf: output,
        written: 0,
    };

    loop {
        let offset = cursor.position();
        match next_command(&mut cursor)? {
            Command::End => break,
            Command::Transfer { bytes } => out.transfer(offset, bytes)?,
            Command::Fill { count, value } => out.fill(offset, count, value)?,
            Command::ShortCopy { count, distance } => out.copy_back(offset, count, distance)?,
            Command::MediumCopy { count, position } | Command::LongCopy { count, position } => {
                let position = usize::from(position);
                match mode {
                    AddressingMode::Absolute => out.copy_at(offset, count, position)?,
                    AddressingMode::Relative => out.copy_back(offset, count, position)?,
                }
            }
        }
    }

    log::trace!(
        "lcw: {} input bytes -> {} output bytes ({mode:?})",
        cursor.position(),
        out.written
    );
    Ok(out.written)
}

/// Decompress an LCW stream into a new buffer of at most `output_capacity`
/// bytes.
///
/// The returned vector holds exactly the bytes the stream wrote.
pub fn lcw_decompress(
    input: &[u8],
    output_capacity: usize,
    mode: AddressingMode,
) -> Result<Vec<u8>, DecodeError> {
    let mut output = vec![0u8; output_capacity];
    let written = lcw_decompress_into(input, &mut output, mode)?;
    output.truncate(written);
    Ok(output)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
