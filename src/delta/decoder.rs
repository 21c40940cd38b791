// Applies a Format40 command stream to a caller-owned buffer in place.

use super::command::{Command, next_command};
use crate::cursor::CompressedCursor;
use crate::error::{DecodeError, Stage};

/// Apply the delta in `input` to `buffer`.
///
/// A write cursor starts at the first byte of `buffer` and advances with
/// every skip or XOR command. No command may move the cursor past the end
/// of the buffer. Because every mutation is an XOR, applying the same
/// delta twice restores the original contents.
///
/// The whole stream is validated before the first byte is touched, so on
/// error `buffer` is unchanged.
pub fn delta_apply(input: &[u8], buffer: &mut [u8]) -> Result<(), DecodeError> {
    let len = buffer.len();
    walk(input, len, |_, _| {})?;

    let mut end = 0usize;
    let consumed = walk(input, len, |pos, command| {
        let target = &mut buffer[pos..pos + command.count()];
        match command {
            Command::Xor { bytes } | Command::LongXor { bytes } => {
                for (dst, src) in target.iter_mut().zip(bytes) {
                    *dst ^= src;
                }
            }
            Command::FillXor { value, .. } | Command::LongFillXor { value, .. } => {
                for dst in target.iter_mut() {
                    *dst ^= value;
                }
            }
            Command::Skip { .. } | Command::LongSkip { .. } | Command::End => {}
        }
        end = pos + command.count();
    })?;

    log::trace!("delta: {consumed} input bytes, cursor ended at {end} of {len}");
    Ok(())
}

/// Decode every command up to `End`, checking each against a buffer of
/// `len` bytes and handing it to `visit` with its cursor position.
/// Returns the number of input bytes consumed.
fn walk<'a>(
    input: &'a [u8],
    len: usize,
    mut visit: impl FnMut(usize, Command<'a>),
) -> Result<usize, DecodeError> {
    let mut cursor = CompressedCursor::new(input, Stage::Delta);
    let mut pos = 0usize;

    loop {
        let offset = cursor.position();
        let command = next_command(&mut cursor)?;
        if command == Command::End {
            return Ok(cursor.position());
        }

        let count = command.count();
        let available = len - pos;
        if count > available {
            return Err(DecodeError::overflow(
                Stage::Delta,
                offset,
                context_of(&command),
                count,
                available,
            ));
        }
        visit(pos, command);
        pos += count;
    }
}

fn context_of(command: &Command<'_>) -> &'static str {
    match command {
        Command::Skip { .. } => "skip",
        Command::LongSkip { .. } => "long skip",
        Command::Xor { .. } => "xor",
        Command::LongXor { .. } => "long xor",
        Command::FillXor { .. } => "fill-xor",
        Command::LongFillXor { .. } => "long fill-xor",
        Command::End => "end",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fault;

    fn applied(input: &[u8], start: &[u8]) -> Vec<u8> {
        let mut buf = start.to_vec();
        delta_apply(input, &mut buf).unwrap();
        buf
    }

    #[test]
    fn xor_dump_into_zero_buffer() {
        let out = applied(&[0x04, 0x41, 0x42, 0x43, 0x44, 0x80, 0x00, 0x00], &[0; 4]);
        assert_eq!(out, b"ABCD");
    }

    #[test]
    fn skip_then_xor() {
        let out = applied(&[0x82, 0x01, 0xFF, 0x80, 0x00, 0x00], b"ABCD");
        assert_eq!(out, [0x41, 0x42, 0xBC, 0x44]);
    }

    #[test]
    fn xor_is_self_inverse() {
        let delta = [0x04, 0xFF, 0xFF, 0x00, 0x00, 0x80, 0x00, 0x00];
        let once = applied(&delta, b"ABCD");
        assert_eq!(once, [0xBE, 0xBD, 0x43, 0x44]);
        assert_eq!(applied(&delta, &once), b"ABCD");
    }

    #[test]
    fn fill_xor_run() {
        let out = applied(&[0x00, 0x03, 0xFF, 0x80, 0x00, 0x00], b"ABCD");
        assert_eq!(out, [0xBE, 0xBD, 0xBC, 0x44]);
    }

    #[test]
    fn long_skip_and_long_xor() {
        let out = applied(&[0x80, 0x02, 0x00, 0x01, 0xFF, 0x80, 0x00, 0x00], b"ABCD");
        assert_eq!(out, [0x41, 0x42, 0xBC, 0x44]);

        let out = applied(&[0x80, 0x02, 0x80, 0xFF, 0xFF, 0x80, 0x00, 0x00], b"ABCD");
        assert_eq!(out, [0xBE, 0xBD, 0x43, 0x44]);
    }

    #[test]
    fn long_fill_xor() {
        let out = applied(&[0x81, 0x80, 0x03, 0xC0, 0x01, 0x80, 0x00, 0x00], b"ABCD");
        assert_eq!(out, b"ACBE");
    }

    #[test]
    fn mixed_commands() {
        let out = applied(&[0x01, 0xFF, 0x81, 0x01, 0xFF, 0x80, 0x00, 0x00], b"ABCD");
        assert_eq!(out, [0xBE, 0x42, 0xBC, 0x44]);

        let out = applied(&[0x82, 0x02, 0xFF, 0xFF, 0x80, 0x00, 0x00], b"ABCD");
        assert_eq!(out, [0x41, 0x42, 0xBC, 0xBB]);
    }

    #[test]
    fn skip_to_exact_end_is_allowed() {
        assert_eq!(applied(&[0x84, 0x80, 0x00, 0x00], b"ABCD"), b"ABCD");
    }

    #[test]
    fn overflow_past_buffer_end() {
        let mut buf = *b"ABCD";
        let err = delta_apply(&[0x83, 0x02, 0x01, 0x01, 0x80, 0x00, 0x00], &mut buf).unwrap_err();
        assert_eq!(
            err,
            DecodeError::OutputOverflow {
                stage: Stage::Delta,
                offset: 1,
                context: "xor",
                needed: 2,
                available: 1,
                fault: Fault::Input,
            }
        );

        let err = delta_apply(&[0x85, 0x80, 0x00, 0x00], &mut buf).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::OutputOverflow {
                context: "skip",
                ..
            }
        ));
    }

    #[test]
    fn failed_stream_leaves_buffer_unchanged() {
        // XOR the first byte, then skip past the end.
        let mut buf = *b"ABCD";
        let err = delta_apply(&[0x01, 0xFF, 0x84, 0x80, 0x00, 0x00], &mut buf).unwrap_err();
        assert!(matches!(err, DecodeError::OutputOverflow { offset: 2, .. }));
        assert_eq!(&buf, b"ABCD");

        // Valid commands followed by a missing end marker.
        let err = delta_apply(&[0x02, 0xFF, 0xFF], &mut buf).unwrap_err();
        assert!(matches!(err, DecodeError::MissingEndMarker { .. }));
        assert_eq!(&buf, b"ABCD");
    }

    #[test]
    fn missing_end_marker() {
        let mut buf = [0u8; 4];
        assert_eq!(
            delta_apply(&[0x82], &mut buf).unwrap_err(),
            DecodeError::MissingEndMarker {
                stage: Stage::Delta,
                offset: 1
            }
        );
        assert!(matches!(
            delta_apply(&[], &mut buf).unwrap_err(),
            DecodeError::MissingEndMarker { offset: 0, .. }
        ));
    }

    #[test]
    fn truncated_xor_payload() {
        let mut buf = [0u8; 4];
        let err = delta_apply(&[0x04, 0x41, 0x42], &mut buf).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnexpectedEndOfInput {
                stage: Stage::Delta,
                offset: 1,
                ..
            }
        ));
    }
}
