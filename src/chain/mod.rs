// Frame-chain resolution: composes the LCW and delta codecs across a
// sequence of dependent frames.
//
// # Modules
//
// - `descriptor` — Per-frame metadata (bytes, encoding tag, role)
// - `resolver`   — The stateful resolver and whole-chain helpers

pub mod descriptor;
pub mod resolver;

pub use descriptor::{
    FrameDescriptor, FrameEncoding, FrameRole, SHP_FORMAT_LCW, SHP_FORMAT_XOR_BASE,
    SHP_FORMAT_XOR_PREVIOUS,
};
#[cfg(feature = "parallel")]
pub use resolver::decode_chains_parallel;
pub use resolver::{
    ChainJob, DecodedChain, FinishedChain, FrameChainResolver, ResolverOptions, ResolverState,
    decode_chain,
};
