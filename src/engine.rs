// Delta engine: ties source matching to the delta format.
//
// Provides the high-level byte API:
//   - `create_delta`: index the source, match the target, serialise commands
//   - `apply_delta`: interpret a delta against the source
//   - `delta_target_size`: read the declared target length from the header

use crate::format::decoder::{self, DecodeError};
use crate::format::encoder;
use crate::hash::config::{DEFAULT_CHAIN_LIMIT, MatcherConfig};
use crate::hash::matching::MatchEngine;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for delta encoding.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Maximum source candidates examined per target position. The default
    /// produces output identical to other Fossil delta encoders.
    pub chain_limit: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            chain_limit: DEFAULT_CHAIN_LIMIT,
        }
    }
}

/// Configuration for delta decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Compare the trailer checksum with the reconstructed target.
    pub verify_checksum: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            verify_checksum: true,
        }
    }
}

// ---------------------------------------------------------------------------
// High-level encode
// ---------------------------------------------------------------------------

/// Create a delta that rebuilds `target` from `source`.
pub fn create_delta(source: &[u8], target: &[u8]) -> Vec<u8> {
    create_delta_with_options(source, target, &EncodeOptions::default())
}

/// Encode with custom options.
pub fn create_delta_with_options(source: &[u8], target: &[u8], opts: &EncodeOptions) -> Vec<u8> {
    let config = MatcherConfig {
        chain_limit: opts.chain_limit,
    };
    let engine = MatchEngine::new(config, source);
    let instructions = engine.find_matches(target);
    let delta = encoder::write_instructions(target, &instructions);

    log::debug!(
        "encoded {}-byte target against {}-byte source: {} commands, {}-byte delta",
        target.len(),
        source.len(),
        instructions.len(),
        delta.len()
    );
    delta
}

// ---------------------------------------------------------------------------
// High-level decode
// ---------------------------------------------------------------------------

/// Apply `delta` to `source`, returning the reconstructed target.
pub fn apply_delta(source: &[u8], delta: &[u8]) -> Result<Vec<u8>, DecodeError> {
    apply_delta_with_options(source, delta, &DecodeOptions::default())
}

/// Decode with custom options.
pub fn apply_delta_with_options(
    source: &[u8],
    delta: &[u8],
    opts: &DecodeOptions,
) -> Result<Vec<u8>, DecodeError> {
    decoder::decode_memory(delta, source, opts.verify_checksum)
}

/// Size in bytes of the target `delta` produces. Only the header is read.
pub fn delta_target_size(delta: &[u8]) -> Result<usize, DecodeError> {
    let size = decoder::target_size(delta)?;
    // A length that does not fit in memory can never be produced.
    usize::try_from(size).map_err(|_| DecodeError::TargetSizeUnrepresentable { declared: size })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
