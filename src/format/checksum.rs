// 32-bit order-sensitive checksum carried in the delta trailer.
//
// Four wrapping lanes each receive every fourth byte; the lanes are then
// folded into the last one at descending byte positions and the 1..=3 tail
// bytes are added big-endian into the high-order end. Detects accidental
// corruption only.

/// Compute the trailer checksum of `data`.
pub fn checksum(data: &[u8]) -> u32 {
    let mut sum0: u32 = 0;
    let mut sum1: u32 = 0;
    let mut sum2: u32 = 0;
    let mut sum3: u32 = 0;

    let mut chunks = data.chunks_exact(16);
    for c in &mut chunks {
        for lane in c.chunks_exact(4) {
            sum0 = sum0.wrapping_add(u32::from(lane[0]));
            sum1 = sum1.wrapping_add(u32::from(lane[1]));
            sum2 = sum2.wrapping_add(u32::from(lane[2]));
            sum3 = sum3.wrapping_add(u32::from(lane[3]));
        }
    }

    let mut words = chunks.remainder().chunks_exact(4);
    for lane in &mut words {
        sum0 = sum0.wrapping_add(u32::from(lane[0]));
        sum1 = sum1.wrapping_add(u32::from(lane[1]));
        sum2 = sum2.wrapping_add(u32::from(lane[2]));
        sum3 = sum3.wrapping_add(u32::from(lane[3]));
    }

    sum3 = sum3
        .wrapping_add(sum2 << 8)
        .wrapping_add(sum1 << 16)
        .wrapping_add(sum0 << 24);

    let tail = words.remainder();
    if let Some(&b) = tail.get(2) {
        sum3 = sum3.wrapping_add(u32::from(b) << 8);
    }
    if let Some(&b) = tail.get(1) {
        sum3 = sum3.wrapping_add(u32::from(b) << 16);
    }
    if let Some(&b) = tail.first() {
        sum3 = sum3.wrapping_add(u32::from(b) << 24);
    }
    sum3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_zero() {
        assert_eq!(checksum(b""), 0);
    }

    #[test]
    fn short_inputs_fill_high_bytes() {
        assert_eq!(checksum(b"a"), 0x6100_0000);
        assert_eq!(checksum(b"abcd"), 0x6162_6364);
    }

    #[test]
    fn known_values() {
        assert_eq!(checksum(b"hello world"), 0x49f2_47db);
        assert_eq!(
            checksum(b"The quick brown fox jumps over the lazy dog."),
            0x783c_1549
        );

        let mut zeros_a = [0u8; 17];
        zeros_a[16] = 0x41;
        assert_eq!(checksum(&zeros_a), 0x4100_0000);

        let seq: Vec<u8> = (0..1000u32).map(|i| ((i * 7 + 3) & 0xFF) as u8).collect();
        assert_eq!(checksum(&seq), 0xb68b_5fbc);
    }

    #[test]
    fn order_sensitive() {
        assert_ne!(checksum(b"ab"), checksum(b"ba"));
        assert_ne!(checksum(b"abcde"), checksum(b"bacde"));
    }
}
