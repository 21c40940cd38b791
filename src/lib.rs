//! wwcodec: decoders for the LCW (Format80) and XOR-delta (Format40)
//! compression primitives used by Westwood-era game assets.
//!
//! The crate provides:
//! - The LCW back-reference decompressor (`lcw`)
//! - The Format40 XOR-delta codec (`delta`)
//! - A frame-chain resolver that threads one canvas through base and delta
//!   frames (`chain`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! Every decoder treats its input as untrusted: malformed streams produce a
//! [`DecodeError`], never a panic or an out-of-bounds access.
//!
//! # Quick Start
//!
//! ```
//! use wwcodec::{AddressingMode, FrameChainResolver, FrameDescriptor, delta_apply, lcw_decompress};
//!
//! // Transfer "ABC", then copy three bytes from three back.
//! let frame = lcw_decompress(&[0x83, 0x41, 0x42, 0x43, 0x00, 0x03, 0x80], 6, AddressingMode::Absolute)?;
//! assert_eq!(frame, b"ABCABC");
//!
//! // Skip two bytes, XOR the next one with 0xFF.
//! let mut canvas = *b"ABCD";
//! delta_apply(&[0x82, 0x01, 0xFF, 0x80, 0x00, 0x00], &mut canvas)?;
//! assert_eq!(canvas, [0x41, 0x42, 0xBC, 0x44]);
//!
//! // Base frame followed by an LCW-wrapped delta frame.
//! let mut resolver = FrameChainResolver::new(4);
//! resolver.decode_next_frame(FrameDescriptor::base(&[0x84, 0x41, 0x42, 0x43, 0x44, 0x80]))?;
//! let delta = [0x86, 0x82, 0x01, 0xFF, 0x80, 0x00, 0x00, 0x80];
//! assert_eq!(resolver.decode_next_frame(FrameDescriptor::delta(&delta))?, [0x41, 0x42, 0xBC, 0x44]);
//! # Ok::<(), wwcodec::DecodeError>(())
//! ```

pub mod chain;
pub mod cursor;
pub mod delta;
pub mod error;
pub mod io;
pub mod lcw;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "parallel")]
pub use chain::decode_chains_parallel;
pub use chain::{
    DecodedChain, FrameChainResolver, FrameDescriptor, FrameEncoding, FrameRole, ResolverOptions,
    decode_chain,
};
pub use delta::delta_apply;
pub use error::{DecodeError, Fault, Stage};
pub use lcw::{AddressingMode, lcw_decompress, lcw_decompress_into};
