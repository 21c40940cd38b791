// Sequential frame-chain resolver.
//
// One resolver owns the canvas for one asset. Base frames are LCW streams
// that overwrite the canvas; delta frames are LCW-compressed Format40
// streams XORed into it. Every frame decodes into scratch storage that is
// swapped in only on success, so a failed frame leaves the canvas as it was.

use crate::delta::delta_apply;
use crate::error::{DecodeError, Fault, Stage};
use crate::lcw::{AddressingMode, lcw_decompress_into};

use super::descriptor::{FrameDescriptor, FrameEncoding, FrameRole};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for a [`FrameChainResolver`].
#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    /// Addressing mode for medium and long LCW copies.
    pub mode: AddressingMode,
    /// Capacity of the buffer holding a decompressed delta stream.
    /// `None` derives it from the canvas size.
    pub delta_capacity: Option<usize>,
}

impl ResolverOptions {
    /// Delta buffer size used for a canvas of `canvas_len` bytes.
    ///
    /// The default covers the worst case of one command byte per canvas
    /// byte plus its operand, and the end command.
    pub fn delta_capacity_for(&self, canvas_len: usize) -> usize {
        self.delta_capacity
            .unwrap_or_else(|| canvas_len.saturating_mul(2).saturating_add(3))
    }
}

/// Lifecycle of a resolver. `finish` consumes it, so there is no `Done`
/// value to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    /// No frame has been decoded; the canvas is all zeros.
    Uninitialized,
    /// At least one frame has been decoded.
    Ready,
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Threads one persistent canvas through a sequence of base and delta
/// frames.
#[derive(Debug)]
pub struct FrameChainResolver {
    canvas: Vec<u8>,
    scratch: Vec<u8>,
    delta_buf: Vec<u8>,
    mode: AddressingMode,
    state: ResolverState,
    frames_decoded: usize,
    loop_frame: Option<Vec<u8>>,
}

impl FrameChainResolver {
    /// Resolver with a zeroed canvas of `canvas_len` bytes and default options.
    pub fn new(canvas_len: usize) -> Self {
        Self::with_options(canvas_len, ResolverOptions::default())
    }

    /// Resolver for a `width` x `height` canvas of one byte per pixel.
    pub fn with_dimensions(width: u16, height: u16) -> Self {
        Self::new(usize::from(width) * usize::from(height))
    }

    pub fn with_options(canvas_len: usize, options: ResolverOptions) -> Self {
        Self {
            canvas: vec![0; canvas_len],
            scratch: vec![0; canvas_len],
            delta_buf: vec![0; options.delta_capacity_for(canvas_len)],
            mode: options.mode,
            state: ResolverState::Uninitialized,
            frames_decoded: 0,
            loop_frame: None,
        }
    }

    pub fn canvas_len(&self) -> usize {
        self.canvas.len()
    }

    /// Current canvas contents.
    pub fn canvas(&self) -> &[u8] {
        &self.canvas
    }

    pub fn state(&self) -> ResolverState {
        self.state
    }

    /// Number of visible frames decoded so far. The loop frame is not counted.
    pub fn frames_decoded(&self) -> usize {
        self.frames_decoded
    }

    /// Canvas captured after the loop frame, once it has been decoded.
    pub fn loop_frame(&self) -> Option<&[u8]> {
        self.loop_frame.as_deref()
    }

    /// Decode the next frame in file order and return the updated canvas.
    ///
    /// On error the canvas is unchanged and the frame is not counted.
    pub fn decode_next_frame(&mut self, frame: FrameDescriptor<'_>) -> Result<&[u8], DecodeError> {
        let index = self.frames_decoded;

        if frame.is_empty() {
            log::debug!("frame {index}: empty {:?}, canvas unchanged", frame.encoding);
        } else {
            match frame.encoding {
                FrameEncoding::BaseFrame => self.decode_base(frame.data)?,
                FrameEncoding::DeltaVsBase { .. } | FrameEncoding::DeltaVsPrevious => {
                    self.decode_delta(frame.data)?
                }
            }
            std::mem::swap(&mut self.canvas, &mut self.scratch);
            log::debug!(
                "frame {index}: {:?} ({:?}), {} compressed bytes",
                frame.encoding,
                frame.role,
                frame.data.len()
            );
        }

        self.state = ResolverState::Ready;
        match frame.role {
            FrameRole::Visible => self.frames_decoded += 1,
            FrameRole::Loop => self.loop_frame = Some(self.canvas.clone()),
        }
        Ok(&self.canvas)
    }

    /// Release the resolver, returning the last canvas and the loop frame.
    pub fn finish(self) -> FinishedChain {
        FinishedChain {
            last_frame: self.canvas,
            loop_frame: self.loop_frame,
            frames_decoded: self.frames_decoded,
        }
    }

    /// Decompress a base frame into scratch. It must fill the canvas exactly.
    fn decode_base(&mut self, data: &[u8]) -> Result<(), DecodeError> {
        let written = lcw_decompress_into(data, &mut self.scratch, self.mode).map_err(as_capacity)?;
        if written != self.scratch.len() {
            return Err(DecodeError::UnexpectedEndOfInput {
                stage: Stage::Chain,
                offset: data.len(),
                context: "base frame shorter than canvas",
                fault: Fault::Capacity,
            });
        }
        Ok(())
    }

    /// Decompress a delta stream and apply it to a copy of the canvas.
    fn decode_delta(&mut self, data: &[u8]) -> Result<(), DecodeError> {
        let len = lcw_decompress_into(data, &mut self.delta_buf, self.mode)?;
        self.scratch.copy_from_slice(&self.canvas);
        delta_apply(&self.delta_buf[..len], &mut self.scratch)
    }
}

/// A base frame writing past the canvas means the declared dimensions are
/// wrong for the asset.
fn as_capacity(err: DecodeError) -> DecodeError {
    match err {
        DecodeError::OutputOverflow {
            stage,
            offset,
            context,
            needed,
            available,
            ..
        } => DecodeError::OutputOverflow {
            stage,
            offset,
            context,
            needed,
            available,
            fault: Fault::Capacity,
        },
        other => other,
    }
}

/// State left behind by a consumed resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedChain {
    pub last_frame: Vec<u8>,
    pub loop_frame: Option<Vec<u8>>,
    pub frames_decoded: usize,
}

// ---------------------------------------------------------------------------
// Whole-chain helpers
// ---------------------------------------------------------------------------

/// Owned copies of every visible frame of one asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedChain {
    pub frames: Vec<Vec<u8>>,
    pub loop_frame: Option<Vec<u8>>,
}

/// Decode a whole descriptor sequence with a fresh resolver.
pub fn decode_chain<'a, I>(
    canvas_len: usize,
    options: ResolverOptions,
    frames: I,
) -> Result<DecodedChain, DecodeError>
where
    I: IntoIterator<Item = FrameDescriptor<'a>>,
{
    let mut resolver = FrameChainResolver::with_options(canvas_len, options);
    let mut decoded = Vec::new();
    for frame in frames {
        let role = frame.role;
        let canvas = resolver.decode_next_frame(frame)?;
        if role == FrameRole::Visible {
            decoded.push(canvas.to_vec());
        }
    }
    let finished = resolver.finish();
    Ok(DecodedChain {
        frames: decoded,
        loop_frame: finished.loop_frame,
    })
}

/// One independent asset for [`decode_chains_parallel`].
#[derive(Debug, Clone)]
pub struct ChainJob<'a> {
    pub canvas_len: usize,
    pub options: ResolverOptions,
    pub frames: Vec<FrameDescriptor<'a>>,
}

/// Decode independent chains on the rayon pool, one resolver per chain.
/// Results are returned in input order.
#[cfg(feature = "parallel")]
pub fn decode_chains_parallel(jobs: &[ChainJob<'_>]) -> Vec<Result<DecodedChain, DecodeError>> {
    jobs.par_iter()
        .map(|job| decode_chain(job.canvas_len, job.options.clone(), job.frames.iter().copied()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
