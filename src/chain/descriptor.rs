// Per-frame metadata handed to the resolver by format parsers.

use std::ops::Range;

use crate::error::{DecodeError, Fault, Stage};

/// SHP per-frame format flag: LCW-compressed base frame.
pub const SHP_FORMAT_LCW: u8 = 0x80;
/// SHP per-frame format flag: XOR delta against the previous frame.
pub const SHP_FORMAT_XOR_PREVIOUS: u8 = 0x40;
/// SHP per-frame format flag: XOR delta against a reference frame.
pub const SHP_FORMAT_XOR_BASE: u8 = 0x20;

/// How a frame's bytes relate to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameEncoding {
    /// LCW stream that fully replaces the canvas.
    BaseFrame,
    /// LCW-compressed delta anchored on frame `base`.
    DeltaVsBase { base: usize },
    /// LCW-compressed delta against whatever the canvas holds now.
    DeltaVsPrevious,
}

impl FrameEncoding {
    /// Map an SHP frame format byte to an encoding.
    ///
    /// `base` is the reference frame index recorded alongside `0x20` frames.
    pub fn from_shp_format(flags: u8, base: usize) -> Result<Self, DecodeError> {
        match flags {
            SHP_FORMAT_LCW => Ok(Self::BaseFrame),
            SHP_FORMAT_XOR_PREVIOUS => Ok(Self::DeltaVsPrevious),
            SHP_FORMAT_XOR_BASE => Ok(Self::DeltaVsBase { base }),
            command => Err(DecodeError::UnsupportedCommand {
                stage: Stage::Chain,
                offset: 0,
                command,
            }),
        }
    }

    pub fn is_delta(&self) -> bool {
        !matches!(self, Self::BaseFrame)
    }
}

/// Whether a frame is part of the visible sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameRole {
    #[default]
    Visible,
    /// Terminal frame used as a seek target when looping back to frame 0.
    Loop,
}

/// One frame's compressed bytes plus how to interpret them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDescriptor<'a> {
    pub data: &'a [u8],
    pub encoding: FrameEncoding,
    pub role: FrameRole,
}

impl<'a> FrameDescriptor<'a> {
    pub fn new(data: &'a [u8], encoding: FrameEncoding) -> Self {
        Self {
            data,
            encoding,
            role: FrameRole::Visible,
        }
    }

    pub fn base(data: &'a [u8]) -> Self {
        Self::new(data, FrameEncoding::BaseFrame)
    }

    pub fn delta(data: &'a [u8]) -> Self {
        Self::new(data, FrameEncoding::DeltaVsPrevious)
    }

    pub fn delta_vs_base(data: &'a [u8], base: usize) -> Self {
        Self::new(data, FrameEncoding::DeltaVsBase { base })
    }

    /// Mark this descriptor as the asset's loop frame.
    pub fn as_loop(mut self) -> Self {
        self.role = FrameRole::Loop;
        self
    }

    /// Describe the frame stored at `range` within `source`.
    ///
    /// Offset tables in asset headers are untrusted, so an out-of-bounds or
    /// inverted range is reported rather than panicking.
    pub fn from_range(
        source: &'a [u8],
        range: Range<usize>,
        encoding: FrameEncoding,
    ) -> Result<Self, DecodeError> {
        match source.get(range.clone()) {
            Some(data) => Ok(Self::new(data, encoding)),
            None => Err(DecodeError::UnexpectedEndOfInput {
                stage: Stage::Chain,
                offset: range.start,
                context: "frame range outside source",
                fault: Fault::Input,
            }),
        }
    }

    /// An empty frame leaves the canvas unchanged.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
