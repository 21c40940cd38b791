// File-level helpers around the in-memory codecs.
//
// Compressed assets are small enough to read whole, so inputs are loaded
// into memory and outputs go through a `BufWriter`. With the `file-io`
// feature a SHA-256 of every written output is recorded in the stats.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[cfg(feature = "file-io")]
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::delta::delta_apply;
use crate::error::DecodeError;
use crate::lcw::{AddressingMode, lcw_decompress};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by the file helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    /// Compressed input size in bytes.
    pub input_size: u64,
    /// Bytes written to the output file.
    pub output_size: u64,
    /// SHA-256 of the output (if `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

impl FileStats {
    /// Lowercase hex form of `output_sha256`.
    pub fn sha256_hex(&self) -> Option<String> {
        self.output_sha256
            .map(|digest| digest.iter().map(|b| format!("{b:02x}")).collect())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file I/O operations.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// LCW-decompress `input_path` into `output_path`.
///
/// `capacity` is the declared decompressed size; the output file holds the
/// bytes the stream actually wrote.
pub fn decompress_file(
    input_path: &Path,
    output_path: &Path,
    capacity: usize,
    mode: AddressingMode,
) -> Result<FileStats, IoError> {
    let input = std::fs::read(input_path)?;
    let output = lcw_decompress(&input, capacity, mode)?;
    let output_sha256 = write_output(output_path, &output)?;

    Ok(FileStats {
        input_size: input.len() as u64,
        output_size: output.len() as u64,
        output_sha256,
    })
}

/// Apply the Format40 delta in `delta_path` to the contents of
/// `buffer_path`, writing the result to `output_path`.
pub fn apply_delta_file(
    delta_path: &Path,
    buffer_path: &Path,
    output_path: &Path,
) -> Result<FileStats, IoError> {
    let delta = std::fs::read(delta_path)?;
    let mut buffer = std::fs::read(buffer_path)?;
    delta_apply(&delta, &mut buffer)?;
    let output_sha256 = write_output(output_path, &buffer)?;

    Ok(FileStats {
        input_size: delta.len() as u64,
        output_size: buffer.len() as u64,
        output_sha256,
    })
}

/// Write `data` to `path` through a buffered writer, returning its digest
/// when the `file-io` feature is enabled.
pub fn write_output(path: &Path, data: &[u8]) -> Result<Option<[u8; 32]>, IoError> {
    let mut writer = BufWriter::with_capacity(BUF_SIZE, File::create(path)?);
    writer.write_all(data)?;
    writer.flush()?;
    Ok(digest(data))
}

#[cfg(feature = "file-io")]
fn digest(data: &[u8]) -> Option<[u8; 32]> {
    Some(Sha256::digest(data).into())
}

#[cfg(not(feature = "file-io"))]
fn digest(_data: &[u8]) -> Option<[u8; 32]> {
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
