// Format40 XOR-delta command set.
//
// Leading byte layout:
//
//   0x00       fill-xor      0x00 count value          XOR `count` bytes with `value`
//   0x01-0x7F  xor dump      0ccc cccc [data]          XOR `count` bytes with data
//   0x80       extended      0x80 word16
//                              word == 0               end
//                              0xxx xxxx xxxx xxxx     long skip of `word`
//                              10cc cccc cccc cccc     long xor dump, 14-bit count
//                              11cc cccc cccc cccc     long fill-xor, 14-bit count, value
//   0x81-0xFF  skip          1ccc cccc                 advance `count` bytes
//
// The extended word is little-endian.

use crate::cursor::CompressedCursor;
use crate::error::{DecodeError, Stage};

const LONG_XOR_FLAG: u16 = 0x8000;
const LONG_FILL_FLAG: u16 = 0x4000;
const LONG_COUNT_MASK: u16 = 0x3FFF;

/// One decoded delta command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Leave `count` buffer bytes unchanged.
    Skip { count: usize },
    /// XOR buffer bytes with `bytes`, one for one.
    Xor { bytes: &'a [u8] },
    /// XOR `count` buffer bytes with `value`.
    FillXor { count: usize, value: u8 },
    LongSkip { count: usize },
    LongXor { bytes: &'a [u8] },
    LongFillXor { count: usize, value: u8 },
    End,
}

impl Command<'_> {
    /// Number of buffer bytes the command advances over.
    pub fn count(&self) -> usize {
        match *self {
            Self::Skip { count }
            | Self::LongSkip { count }
            | Self::FillXor { count, .. }
            | Self::LongFillXor { count, .. } => count,
            Self::Xor { bytes } | Self::LongXor { bytes } => bytes.len(),
            Self::End => 0,
        }
    }

    /// True for commands that leave the buffer untouched.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip { .. } | Self::LongSkip { .. })
    }
}

/// Decode the command at the cursor.
///
/// An exhausted cursor is a [`DecodeError::MissingEndMarker`]; truncated
/// operands are [`DecodeError::UnexpectedEndOfInput`].
pub fn next_command<'a>(cursor: &mut CompressedCursor<'a>) -> Result<Command<'a>, DecodeError> {
    let Some(cmd) = cursor.next_u8() else {
        return Err(DecodeError::MissingEndMarker {
            stage: Stage::Delta,
            offset: cursor.position(),
        });
    };

    let command = match cmd {
        0x00 => {
            let count = cursor.read_u8("fill-xor count")?;
            let value = cursor.read_u8("fill-xor value")?;
            Command::FillXor {
                count: usize::from(count),
                value,
            }
        }
        0x01..=0x7F => Command::Xor {
            bytes: cursor.read_bytes(usize::from(cmd), "xor payload")?,
        },
        0x80 => {
            let word = cursor.read_u16_le("extended command word")?;
            let count = usize::from(word & LONG_COUNT_MASK);
            if word == 0 {
                Command::End
            } else if word & LONG_XOR_FLAG == 0 {
                Command::LongSkip {
                    count: usize::from(word),
                }
            } else if word & LONG_FILL_FLAG == 0 {
                Command::LongXor {
                    bytes: cursor.read_bytes(count, "long xor payload")?,
                }
            } else {
                Command::LongFillXor {
                    count,
                    value: cursor.read_u8("long fill-xor value")?,
                }
            }
        }
        0x81..=0xFF => Command::Skip {
            count: usize::from(cmd & 0x7F),
        },
    };

    Ok(command)
}

// ---------------------------------------------------------------------------
// Command iterator
// ---------------------------------------------------------------------------

/// Iterates the commands of a delta stream as `(offset, command)` pairs.
///
/// Stops after `End` or after yielding the first error.
pub struct Commands<'a> {
    cursor: CompressedCursor<'a>,
    done: bool,
}

impl<'a> Commands<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            cursor: CompressedCursor::new(input, Stage::Delta),
            done: false,
        }
    }
}

impl<'a> Iterator for Commands<'a> {
    type Item = Result<(usize, Command<'a>), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let offset = self.cursor.position();
        let item = next_command(&mut self.cursor);
        self.done = !matches!(item, Ok(ref c) if *c != Command::End);
        Some(item.map(|command| (offset, command)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
