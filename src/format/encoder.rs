// Delta serialisation.
//
// `DeltaWriter` appends the header, Insert/Copy commands and the checksum
// trailer to an in-memory buffer. It does not validate the command stream;
// `write_instructions` is the checked entry point used by the engine.

use super::checksum::checksum;
use super::command::Instruction;
use super::varint;

/// Fixed punctuation bytes in an `Insert` + `Copy` pair (`:`, `@`, `,`).
pub const COPY_OVERHEAD: usize = 3;

/// Builds a delta byte stream.
#[derive(Debug, Default)]
pub struct DeltaWriter {
    out: Vec<u8>,
}

impl DeltaWriter {
    /// Start a delta declaring a `target_len`-byte target.
    pub fn new(target_len: usize) -> Self {
        Self::with_capacity(target_len, 16)
    }

    /// Start a delta with room for `capacity` bytes.
    pub fn with_capacity(target_len: usize, capacity: usize) -> Self {
        let mut out = Vec::with_capacity(capacity);
        varint::put_usize(&mut out, target_len);
        out.push(b'\n');
        Self { out }
    }

    /// Append `<len>:<data>`.
    pub fn insert(&mut self, data: &[u8]) {
        varint::put_usize(&mut self.out, data.len());
        self.out.push(b':');
        self.out.extend_from_slice(data);
    }

    /// Append `<len>@<offset>,`.
    pub fn copy(&mut self, len: usize, offset: usize) {
        varint::put_usize(&mut self.out, len);
        self.out.push(b'@');
        varint::put_usize(&mut self.out, offset);
        self.out.push(b',');
    }

    /// Append the `<checksum>;` trailer and return the finished delta.
    pub fn finish(mut self, checksum: u32) -> Vec<u8> {
        varint::put_u64(&mut self.out, u64::from(checksum));
        self.out.push(b';');
        self.out
    }

    /// Bytes written so far. Never zero: the header is written up front.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.out.len()
    }
}

/// Serialise `instructions` against `target` into a complete delta.
///
/// Instructions are consumed in order; their lengths must sum to
/// `target.len()`.
pub fn write_instructions(target: &[u8], instructions: &[Instruction]) -> Vec<u8> {
    // Literal bytes plus a little slack for command headers.
    let literal: usize = instructions
        .iter()
        .filter_map(|inst| match *inst {
            Instruction::Insert { len } => Some(len),
            Instruction::Copy { .. } => None,
        })
        .sum();
    let capacity = literal + instructions.len() * 2 * varint::MAX_VARINT_LEN + 32;

    let mut writer = DeltaWriter::with_capacity(target.len(), capacity);
    let mut target_pos = 0usize;

    for inst in instructions {
        match *inst {
            Instruction::Insert { len } => {
                writer.insert(&target[target_pos..target_pos + len]);
                target_pos += len;
            }
            Instruction::Copy { len, offset } => {
                writer.copy(len, offset);
                target_pos += len;
            }
        }
    }
    debug_assert_eq!(target_pos, target.len(), "instructions do not cover target");

    writer.finish(checksum(target))
}
