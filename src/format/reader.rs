// Cursor over a delta byte stream.
//
// Shared by the decoder and the command iterator. Integers are read with the
// base-64 varint codec; a digit run stops in front of the first non-digit,
// which is left for the next `read_byte`.

use super::decoder::DecodeError;
use super::varint;

#[derive(Debug, Clone)]
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn has_bytes(&self) -> bool {
        self.pos < self.data.len()
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub(crate) fn read_byte(&mut self) -> Option<u8> {
        let b = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    pub(crate) fn read_int(&mut self) -> Result<u64, DecodeError> {
        let (val, len) = varint::read_u64(&self.data[self.pos..])
            .map_err(|_| DecodeError::VarIntOverflow { pos: self.pos })?;
        self.pos += len;
        Ok(val)
    }

    /// Borrow the next `len` raw bytes, or `None` if fewer remain.
    pub(crate) fn take(&mut self, len: u64) -> Option<&'a [u8]> {
        let len = usize::try_from(len).ok()?;
        if len > self.remaining() {
            return None;
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Some(out)
    }
}

/// Read the `<target-length> "\n"` header, returning the declared length.
pub(crate) fn read_header(reader: &mut Reader<'_>) -> Result<u64, DecodeError> {
    let size = reader.read_int()?;
    match reader.read_byte() {
        Some(b'\n') => Ok(size),
        _ => Err(DecodeError::HeaderNotTerminated),
    }
}
