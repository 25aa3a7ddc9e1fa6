// File-level helpers for delta encoding/decoding.
//
// Provides `encode_file()` and `decode_file()` convenience functions around
// the in-memory engine. Inputs are read fully into memory; output is written
// through a `BufWriter` only after encoding/decoding has succeeded, so a
// failed decode never leaves a partial target behind. Optionally computes
// SHA-256 digests (feature-gated behind `file-io`).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[cfg(feature = "file-io")]
use sha2::Digest;

use crate::engine::{self, DecodeOptions, EncodeOptions};
use crate::format::command::DeltaStats;
use crate::format::decoder::DecodeError;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `encode_file()`.
#[derive(Debug, Clone)]
pub struct EncodeStats {
    /// Source file size in bytes.
    pub source_size: u64,
    /// Target file size in bytes.
    pub target_size: u64,
    /// Delta output size in bytes.
    pub delta_size: u64,
    /// Number of insert commands in the delta.
    pub inserts: u64,
    /// Number of copy commands in the delta.
    pub copies: u64,
    /// SHA-256 of the source file (if `file-io` feature is enabled).
    pub source_sha256: Option<[u8; 32]>,
    /// SHA-256 of the target file (if `file-io` feature is enabled).
    pub target_sha256: Option<[u8; 32]>,
}

/// Statistics returned by `decode_file()`.
#[derive(Debug, Clone)]
pub struct DecodeStats {
    /// Source file size in bytes.
    pub source_size: u64,
    /// Delta file size in bytes.
    pub delta_size: u64,
    /// Reconstructed output size in bytes.
    pub output_size: u64,
    /// SHA-256 of the reconstructed output (if `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Delta decoding error.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

// ---------------------------------------------------------------------------
// Default buffer size
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// encode_file
// ---------------------------------------------------------------------------

/// Encode a delta between a source file and target file, writing to `delta_path`.
pub fn encode_file(
    source_path: &Path,
    target_path: &Path,
    delta_path: &Path,
    opts: &EncodeOptions,
) -> Result<EncodeStats, IoError> {
    let source = std::fs::read(source_path)?;
    let target = std::fs::read(target_path)?;

    let delta = engine::create_delta_with_options(&source, &target, opts);
    let summary = DeltaStats::from_delta(&delta)?;
    write_file(delta_path, &delta)?;

    Ok(EncodeStats {
        source_size: source.len() as u64,
        target_size: target.len() as u64,
        delta_size: delta.len() as u64,
        inserts: summary.inserts,
        copies: summary.copies,
        source_sha256: sha256(&source),
        target_sha256: sha256(&target),
    })
}

// ---------------------------------------------------------------------------
// decode_file
// ---------------------------------------------------------------------------

/// Apply a delta file to a source file, writing the target to `output_path`.
pub fn decode_file(
    source_path: &Path,
    delta_path: &Path,
    output_path: &Path,
    opts: &DecodeOptions,
) -> Result<DecodeStats, IoError> {
    let source = std::fs::read(source_path)?;
    let delta = std::fs::read(delta_path)?;

    let output = engine::apply_delta_with_options(&source, &delta, opts)?;
    write_file(output_path, &output)?;

    Ok(DecodeStats {
        source_size: source.len() as u64,
        delta_size: delta.len() as u64,
        output_size: output.len() as u64,
        output_sha256: sha256(&output),
    })
}

fn write_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut writer = BufWriter::with_capacity(BUF_SIZE, File::create(path)?);
    writer.write_all(data)?;
    writer.flush()
}

// ---------------------------------------------------------------------------
// Digests (file-io feature)
// ---------------------------------------------------------------------------

#[cfg(feature = "file-io")]
fn sha256(data: &[u8]) -> Option<[u8; 32]> {
    Some(sha2::Sha256::digest(data).into())
}

#[cfg(not(feature = "file-io"))]
fn sha256(_data: &[u8]) -> Option<[u8; 32]> {
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
