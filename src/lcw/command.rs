// LCW command set and the single dispatch function that decodes one command
// from a cursor.
//
// Leading byte layout:
//
//   0x00-0x7F  short copy    0ccc pppp pppppppp     count = ccc + 3, 12-bit distance
//   0x80       end           1 byte
//   0x81-0xBF  transfer      10cc cccc [data]       count = 1..=63
//   0xC0-0xFD  medium copy   11cc cccc pos16        count = cccccc + 3
//   0xFE       fill          0xFE count16 value
//   0xFF       long copy     0xFF count16 pos16
//
// All multi-byte operands are little-endian.

use crate::cursor::CompressedCursor;
use crate::error::{DecodeError, Stage};

/// End-of-stream command byte.
pub const END_MARKER: u8 = 0x80;

/// A leading `0x00` selects relative addressing for the whole stream.
///
/// A short copy can never open a valid stream (nothing has been written
/// yet), so the byte is unambiguous.
pub const RELATIVE_MODE_MARKER: u8 = 0x00;

/// Smallest count encoded by short and medium copies.
const MIN_COPY_COUNT: usize = 3;

/// How the 16-bit position of medium and long copies is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressingMode {
    /// Offset from the start of the output buffer.
    #[default]
    Absolute,
    /// Backward distance from the current write cursor.
    Relative,
}

impl AddressingMode {
    /// Resolve the mode in effect for `input`, honoring the relative-mode
    /// marker. Returns the mode and the number of marker bytes to skip.
    pub fn detect(input: &[u8], requested: Self) -> (Self, usize) {
        match input.first() {
            Some(&RELATIVE_MODE_MARKER) => (Self::Relative, 1),
            _ => (requested, 0),
        }
    }
}

/// One decoded LCW command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Copy from `distance` bytes behind the write cursor (always relative).
    ShortCopy { count: usize, distance: usize },
    /// Copy addressed per the active [`AddressingMode`].
    MediumCopy { count: usize, position: u16 },
    /// Copy addressed per the active [`AddressingMode`].
    LongCopy { count: usize, position: u16 },
    /// Literal bytes copied straight to the output.
    Transfer { bytes: &'a [u8] },
    /// `count` repeats of `value`.
    Fill { count: usize, value: u8 },
    End,
}

impl Command<'_> {
    /// Number of output bytes the command produces.
    pub fn count(&self) -> usize {
        match *self {
            Self::ShortCopy { count, .. }
            | Self::MediumCopy { count, .. }
            | Self::LongCopy { count, .. }
            | Self::Fill { count, .. } => count,
            Self::Transfer { bytes } => bytes.len(),
            Self::End => 0,
        }
    }
}

/// Decode the command at the cursor.
///
/// An exhausted cursor is a [`DecodeError::MissingEndMarker`]; a command
/// whose operands are cut short is [`DecodeError::UnexpectedEndOfInput`].
pub fn next_command<'a>(cursor: &mut CompressedCursor<'a>) -> Result<Command<'a>, DecodeError> {
    let Some(cmd) = cursor.next_u8() else {
        return Err(DecodeError::MissingEndMarker {
            stage: Stage::Lcw,
            offset: cursor.position(),
        });
    };

    let command = match cmd {
        0x00..=0x7F => {
            let low = cursor.read_u8("short copy distance")?;
            Command::ShortCopy {
                count: usize::from((cmd >> 4) & 0x07) + MIN_COPY_COUNT,
                distance: (usize::from(cmd & 0x0F) << 8) | usize::from(low),
            }
        }
        0x80 => Command::End,
        0x81..=0xBF => Command::Transfer {
            bytes: cursor.read_bytes(usize::from(cmd & 0x3F), "transfer payload")?,
        },
        0xC0..=0xFD => Command::MediumCopy {
            count: usize::from(cmd & 0x3F) + MIN_COPY_COUNT,
            position: cursor.read_u16_le("medium copy position")?,
        },
        0xFE => {
            let count = cursor.read_u16_le("fill count")?;
            let value = cursor.read_u8("fill value")?;
            Command::Fill {
                count: usize::from(count),
                value,
            }
        }
        0xFF => {
            let count = cursor.read_u16_le("long copy count")?;
            let position = cursor.read_u16_le("long copy position")?;
            Command::LongCopy {
                count: usize::from(count),
                position,
            }
        }
    };

    Ok(command)
}

// ---------------------------------------------------------------------------
// Command iterator (for inspection/debugging)
// ---------------------------------------------------------------------------

/// Iterates the commands of an LCW stream as `(offset, command)` pairs.
///
/// Stops after `End` or after yielding the first error.
pub struct Commands<'a> {
    cursor: CompressedCursor<'a>,
    mode: AddressingMode,
    done: bool,
}

impl<'a> Commands<'a> {
    pub fn new(input: &'a [u8], mode: AddressingMode) -> Self {
        let (mode, skip) = AddressingMode::detect(input, mode);
        let mut cursor = CompressedCursor::new(input, Stage::Lcw);
        for _ in 0..skip {
            cursor.next_u8();
        }
        Self {
            cursor,
            mode,
            done: false,
        }
    }

    /// Addressing mode in effect after marker detection.
    pub fn mode(&self) -> AddressingMode {
        self.mode
    }
}

impl<'a> Iterator for Commands<'a> {
    type Item = Result<(usize, Command<'a>), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let offset = self.cursor.position();
        match next_command(&mut self.cursor) {
            Ok(command) => {
                self.done = command == Command::End;
                Some(Ok((offset, command)))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
