// Delta decoder: command interpretation and target reconstruction.
//
// Single pass over the delta. The header declares the target length; every
// Insert/Copy is checked against that budget before it is applied, Copy
// ranges are checked against the source, and the trailer checksum is compared
// with the reconstructed output. Any violation aborts the decode and the
// partial output is dropped.

use super::checksum::checksum;
use super::reader::{Reader, read_header};

// ---------------------------------------------------------------------------
// Decoder error
// ---------------------------------------------------------------------------

/// Broad classification of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The delta does not follow the grammar.
    Format,
    /// A command references bytes that do not exist.
    Bounds,
    /// The reconstructed length disagrees with the header.
    SizeMismatch,
    /// The trailer checksum disagrees with the reconstructed output.
    Integrity,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("size integer not terminated by '\\n'")]
    HeaderNotTerminated,
    #[error("integer overflow at delta offset {pos}")]
    VarIntOverflow { pos: usize },
    #[error("unknown delta operator {op:#04x} at offset {pos}")]
    UnknownOperator { op: u8, pos: usize },
    #[error("copy command not terminated by ','")]
    CopyNotTerminated,
    #[error("unterminated delta")]
    Unterminated,
    #[error("copy of {len} bytes at offset {offset} extends past end of source ({source_len} bytes)")]
    CopyOutOfBounds {
        offset: u64,
        len: u64,
        source_len: usize,
    },
    #[error("insert of {len} bytes exceeds remaining delta ({remaining} bytes)")]
    InsertOutOfBounds { len: u64, remaining: usize },
    #[error("output of {actual} bytes exceeds declared target size {declared}")]
    OutputTooLarge { declared: u64, actual: u64 },
    #[error("declared target size {declared} does not fit in memory")]
    TargetSizeUnrepresentable { declared: u64 },
    #[error("generated size {actual} does not match declared size {declared}")]
    SizeMismatch { declared: u64, actual: u64 },
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u64, actual: u32 },
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HeaderNotTerminated
            | Self::VarIntOverflow { .. }
            | Self::UnknownOperator { .. }
            | Self::CopyNotTerminated
            | Self::Unterminated => ErrorKind::Format,
            Self::CopyOutOfBounds { .. } | Self::InsertOutOfBounds { .. } => ErrorKind::Bounds,
            Self::OutputTooLarge { .. }
            | Self::TargetSizeUnrepresentable { .. }
            | Self::SizeMismatch { .. } => ErrorKind::SizeMismatch,
            Self::ChecksumMismatch { .. } => ErrorKind::Integrity,
        }
    }
}

// ---------------------------------------------------------------------------
// Header-only query
// ---------------------------------------------------------------------------

/// Return the declared target length without decoding any commands.
pub fn target_size(delta: &[u8]) -> Result<u64, DecodeError> {
    read_header(&mut Reader::new(delta))
}

/// Parse the header line, returning the declared target length and the
/// number of bytes the header occupies (including the `\n`).
pub fn parse_header(delta: &[u8]) -> Result<(u64, usize), DecodeError> {
    let mut reader = Reader::new(delta);
    let size = read_header(&mut reader)?;
    Ok((size, reader.pos()))
}

// ---------------------------------------------------------------------------
// Full decode
// ---------------------------------------------------------------------------

/// Reconstruct the target from `source` and `delta`.
///
/// With `verify_checksum` disabled the trailer value is ignored, but the
/// declared size is still enforced.
pub fn decode_memory(
    delta: &[u8],
    source: &[u8],
    verify_checksum: bool,
) -> Result<Vec<u8>, DecodeError> {
    let mut reader = Reader::new(delta);
    let limit = read_header(&mut reader)?;

    // The header is untrusted; never reserve more than the inputs could produce.
    let cap = limit.min((source.len() as u64).saturating_add(delta.len() as u64));
    let mut output = Vec::with_capacity(cap as usize);
    let mut total: u64 = 0;

    while reader.has_bytes() {
        let cnt = reader.read_int()?;
        let op_pos = reader.pos();
        match reader.read_byte() {
            Some(b'@') => {
                let ofst = reader.read_int()?;
                if reader.has_bytes() && reader.read_byte() != Some(b',') {
                    return Err(DecodeError::CopyNotTerminated);
                }
                total = grow(total, cnt, limit)?;
                let range = ofst
                    .checked_add(cnt)
                    .filter(|&end| end <= source.len() as u64)
                    .map(|end| ofst as usize..end as usize)
                    .ok_or(DecodeError::CopyOutOfBounds {
                        offset: ofst,
                        len: cnt,
                        source_len: source.len(),
                    })?;
                log::trace!("copy {cnt} bytes from source offset {ofst}");
                output.extend_from_slice(&source[range]);
            }
            Some(b':') => {
                total = grow(total, cnt, limit)?;
                let remaining = reader.remaining();
                let data = reader.take(cnt).ok_or(DecodeError::InsertOutOfBounds {
                    len: cnt,
                    remaining,
                })?;
                log::trace!("insert {cnt} literal bytes");
                output.extend_from_slice(data);
            }
            Some(b';') => {
                if verify_checksum {
                    let actual = checksum(&output);
                    if cnt != u64::from(actual) {
                        return Err(DecodeError::ChecksumMismatch {
                            expected: cnt,
                            actual,
                        });
                    }
                }
                if total != limit {
                    return Err(DecodeError::SizeMismatch {
                        declared: limit,
                        actual: total,
                    });
                }
                log::debug!(
                    "decoded {} bytes from {}-byte delta ({}-byte source)",
                    output.len(),
                    delta.len(),
                    source.len()
                );
                return Ok(output);
            }
            Some(op) => return Err(DecodeError::UnknownOperator { op, pos: op_pos }),
            None => return Err(DecodeError::Unterminated),
        }
    }

    Err(DecodeError::Unterminated)
}

/// Add `cnt` to the running total, failing once it passes the declared size.
#[inline]
fn grow(total: u64, cnt: u64, limit: u64) -> Result<u64, DecodeError> {
    total
        .checked_add(cnt)
        .filter(|&t| t <= limit)
        .ok_or(DecodeError::OutputTooLarge {
            declared: limit,
            actual: total.saturating_add(cnt),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
