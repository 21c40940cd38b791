// Decode errors shared by the LCW decompressor, the XOR-delta codec and the
// frame-chain resolver.
//
// Every error is terminal for the call that raised it. Variants carry the
// stage and the byte offset where the violation was detected so callers can
// report which stream was bad and where.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error context
// ---------------------------------------------------------------------------

/// Component that detected an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// LCW (Format80) back-reference decompressor.
    Lcw,
    /// XOR-delta (Format40) codec.
    Delta,
    /// Frame-chain resolver (frame bookkeeping, size checks).
    Chain,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lcw => f.write_str("lcw"),
            Self::Delta => f.write_str("delta"),
            Self::Chain => f.write_str("chain"),
        }
    }
}

/// Who is to blame for a size-related error.
///
/// Truncation and overflow can mean the compressed stream is malformed, or
/// that the caller declared an output size that does not match the asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// The compressed stream is malformed or truncated.
    Input,
    /// The declared output size does not match the asset's dimensions.
    Capacity,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("malformed input"),
            Self::Capacity => f.write_str("size mismatch"),
        }
    }
}

/// Source address of a rejected copy command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackReference {
    /// Backward distance from the write cursor.
    Distance(usize),
    /// Offset from the start of the output.
    Position(usize),
}

impl fmt::Display for BackReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distance(d) => write!(f, "distance {d}"),
            Self::Position(p) => write!(f, "position {p}"),
        }
    }
}

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{stage}: unexpected end of input at offset {offset} ({context}, {fault})")]
    UnexpectedEndOfInput {
        stage: Stage,
        offset: usize,
        context: &'static str,
        fault: Fault,
    },

    #[error(
        "{stage}: invalid back-reference at offset {offset}: {reference} with {written} bytes written"
    )]
    InvalidBackReference {
        stage: Stage,
        offset: usize,
        reference: BackReference,
        written: usize,
    },

    #[error(
        "{stage}: output overflow at offset {offset}: {context} needs {needed} bytes, {available} available ({fault})"
    )]
    OutputOverflow {
        stage: Stage,
        offset: usize,
        context: &'static str,
        needed: usize,
        available: usize,
        fault: Fault,
    },

    #[error("{stage}: input exhausted at offset {offset} without an end marker")]
    MissingEndMarker { stage: Stage, offset: usize },

    #[error("{stage}: unsupported command {command:#04x} at offset {offset}")]
    UnsupportedCommand {
        stage: Stage,
        offset: usize,
        command: u8,
    },
}

impl DecodeError {
    pub(crate) fn truncated(stage: Stage, offset: usize, context: &'static str) -> Self {
        Self::UnexpectedEndOfInput {
            stage,
            offset,
            context,
            fault: Fault::Input,
        }
    }

    pub(crate) fn overflow(
        stage: Stage,
        offset: usize,
        context: &'static str,
        needed: usize,
        available: usize,
    ) -> Self {
        Self::OutputOverflow {
            stage,
            offset,
            context,
            needed,
            available,
            fault: Fault::Input,
        }
    }

    /// Component that raised the error.
    pub fn stage(&self) -> Stage {
        match self {
            Self::UnexpectedEndOfInput { stage, .. }
            | Self::InvalidBackReference { stage, .. }
            | Self::OutputOverflow { stage, .. }
            | Self::MissingEndMarker { stage, .. }
            | Self::UnsupportedCommand { stage, .. } => *stage,
        }
    }

    /// Byte offset in the offending stream.
    pub fn offset(&self) -> usize {
        match self {
            Self::UnexpectedEndOfInput { offset, .. }
            | Self::InvalidBackReference { offset, .. }
            | Self::OutputOverflow { offset, .. }
            | Self::MissingEndMarker { offset, .. }
            | Self::UnsupportedCommand { offset, .. } => *offset,
        }
    }

    /// Whether the stream or the declared output size is at fault.
    pub fn fault(&self) -> Fault {
        match self {
            Self::UnexpectedEndOfInput { fault, .. } | Self::OutputOverflow { fault, .. } => *fault,
            _ => Fault::Input,
        }
    }

    /// True when the compressed stream itself is malformed.
    pub fn is_malformed_input(&self) -> bool {
        self.fault() == Fault::Input
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
