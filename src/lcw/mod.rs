// LCW (Format80) back-reference decompressor.
//
// # Modules
//
// - `command` — Command set, addressing modes and the single-command decoder
// - `decoder` — Stream execution against a fixed-capacity output buffer

pub mod command;
pub mod decoder;

pub use command::{AddressingMode, Command, Commands, END_MARKER, RELATIVE_MODE_MARKER, next_command};
pub use decoder::{lcw_decompress, lcw_decompress_into};
