// Format40 XOR-delta codec.
//
// # Modules
//
// - `command` — Command set and the single-command decoder
// - `decoder` — In-place application of a command stream to a buffer

pub mod command;
pub mod decoder;

pub use command::{Command, Commands, next_command};
pub use decoder::delta_apply;
