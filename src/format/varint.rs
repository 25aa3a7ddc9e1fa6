// Base-64 variable-length integer encoding.
//
// Every numeric field of the delta format (target length, command counts,
// copy offsets, checksum) is written as a run of digits drawn from a fixed
// 64-symbol alphabet, most-significant digit first. The run ends at the first
// byte that is not a digit; that byte belongs to the next token.

/// Digit symbols in value order: `0-9`, `A-Z`, `_`, `a-z`, `~`.
pub const DIGITS: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz~";

/// Maximum encoded length for a 64-bit value (ceil(64/6) = 11).
pub const MAX_VARINT_LEN: usize = 11;

/// Reverse lookup: byte -> digit value, or -1 if the byte is not a digit.
const VALUES: [i8; 256] = build_values();

const fn build_values() -> [i8; 256] {
    let mut table = [-1i8; 256];
    let mut i = 0;
    while i < DIGITS.len() {
        table[DIGITS[i] as usize] = i as i8;
        i += 1;
    }
    table
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode `num` into the tail of `buf`.
/// Returns the number of bytes written (1..=11); the digits occupy
/// `buf[MAX_VARINT_LEN - len..]`.
#[inline]
pub fn encode_u64(mut num: u64, buf: &mut [u8; MAX_VARINT_LEN]) -> usize {
    let mut i = MAX_VARINT_LEN;
    loop {
        i -= 1;
        buf[i] = DIGITS[(num & 0x3F) as usize];
        num >>= 6;
        if num == 0 {
            break;
        }
    }
    MAX_VARINT_LEN - i
}

/// Append the encoding of `num` to `out`.
pub fn put_u64(out: &mut Vec<u8>, num: u64) {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let len = encode_u64(num, &mut buf);
    out.extend_from_slice(&buf[MAX_VARINT_LEN - len..]);
}

/// Append the encoding of `num` to `out`.
#[inline]
pub fn put_usize(out: &mut Vec<u8>, num: usize) {
    put_u64(out, num as u64);
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Digit value of `byte`, or `None` if it is not part of the alphabet.
#[inline(always)]
pub fn digit_value(byte: u8) -> Option<u8> {
    let v = VALUES[byte as usize];
    (v >= 0).then_some(v as u8)
}

/// Decode the digit run at the start of `data`.
///
/// Returns `(value, bytes_consumed)`. The first non-digit byte is not
/// consumed. An empty run decodes as zero with nothing consumed.
///
/// Bytes `>= 0x80` are never digits and end the run. Some Fossil decoders
/// mask the high bit first and would read `0xB4` as `'4'`; no encoder emits
/// such bytes, so only corrupt deltas see the difference.
pub fn read_u64(data: &[u8]) -> Result<(u64, usize), VarIntError> {
    let mut val: u64 = 0;
    for (i, &byte) in data.iter().enumerate() {
        let Some(d) = digit_value(byte) else {
            return Ok((val, i));
        };
        val = val
            .checked_mul(64)
            .and_then(|v| v.checked_add(u64::from(d)))
            .ok_or(VarIntError::Overflow)?;
    }
    Ok((val, data.len()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Return the encoded length of `num` in digits.
#[inline]
pub fn digit_count(num: u64) -> usize {
    let bits = 64 - num.leading_zeros();
    bits.max(1).div_ceil(6) as usize
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VarIntError {
    /// Value does not fit in 64 bits.
    #[error("varint overflow")]
    Overflow,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
