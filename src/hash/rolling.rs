// Rolling hash over a 16-byte window.
//
// Adler-style pair of 16-bit sums:
//   a = sum of the window bytes
//   b = sum of each byte weighted by its distance from the window end
//       (16 for the oldest byte down to 1 for the newest)
// Sliding the window by one byte is O(1). The value is `a | b << 16`.

use super::config::NHASH;

#[derive(Debug, Clone)]
pub struct RollingHash {
    a: u16,
    b: u16,
    /// Index of the oldest byte in `window`.
    cursor: usize,
    window: [u8; NHASH],
}

impl RollingHash {
    /// Hash the `NHASH` bytes of `data` starting at `pos`.
    ///
    /// # Panics
    /// If `data` has fewer than `pos + NHASH` bytes.
    pub fn new(data: &[u8], pos: usize) -> Self {
        let mut h = Self {
            a: 0,
            b: 0,
            cursor: 0,
            window: [0; NHASH],
        };
        h.init(data, pos);
        h
    }

    /// Reload the window from `data[pos..pos + NHASH]`.
    pub fn init(&mut self, data: &[u8], pos: usize) {
        let mut a: u16 = 0;
        let mut b: u16 = 0;
        self.window.copy_from_slice(&data[pos..pos + NHASH]);
        for (i, &x) in self.window.iter().enumerate() {
            a = a.wrapping_add(u16::from(x));
            b = b.wrapping_add(((NHASH - i) as u16).wrapping_mul(u16::from(x)));
        }
        self.a = a;
        self.b = b;
        self.cursor = 0;
    }

    /// Slide the window forward, dropping the oldest byte and appending `c`.
    #[inline(always)]
    pub fn advance(&mut self, c: u8) {
        let old = u16::from(self.window[self.cursor]);
        self.window[self.cursor] = c;
        self.cursor = (self.cursor + 1) & (NHASH - 1);
        self.a = self.a.wrapping_sub(old).wrapping_add(u16::from(c));
        self.b = self
            .b
            .wrapping_sub((NHASH as u16).wrapping_mul(old))
            .wrapping_add(self.a);
    }

    /// Current 32-bit hash value.
    #[inline(always)]
    pub fn value(&self) -> u32 {
        u32::from(self.a) | (u32::from(self.b) << 16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: usize) -> Vec<u8> {
        let mut s: u32 = 0x1234_5678;
        (0..n)
            .map(|_| {
                s = s.wrapping_mul(1_103_515_245).wrapping_add(12345);
                (s >> 16) as u8
            })
            .collect()
    }

    #[test]
    fn rolling_matches_fresh_hash() {
        let data = sample(512);
        let mut h = RollingHash::new(&data, 0);
        for pos in 1..=data.len() - NHASH {
            h.advance(data[pos + NHASH - 1]);
            assert_eq!(
                h.value(),
                RollingHash::new(&data, pos).value(),
                "mismatch at {pos}"
            );
        }
    }

    #[test]
    fn known_value() {
        // All-zero window hashes to zero; a single trailing 1 contributes
        // a=1, b=1 (weight of the newest byte).
        let mut data = [0u8; NHASH];
        assert_eq!(RollingHash::new(&data, 0).value(), 0);
        data[NHASH - 1] = 1;
        assert_eq!(RollingHash::new(&data, 0).value(), 0x0001_0001);
        data[0] = 1;
        data[NHASH - 1] = 0;
        assert_eq!(RollingHash::new(&data, 0).value(), (16 << 16) | 1);
    }

    #[test]
    fn sums_wrap_at_16_bits() {
        let data = [0xFFu8; NHASH];
        let h = RollingHash::new(&data, 0);
        let a = (0xFFu32 * 16) & 0xFFFF;
        let b = (0xFFu32 * (1..=16).sum::<u32>()) & 0xFFFF;
        assert_eq!(h.value(), a | (b << 16));
    }

    #[test]
    fn equal_windows_hash_equal() {
        let data = b"xxxxabcdefghijklmnopyyyyabcdefghijklmnop";
        assert_eq!(
            RollingHash::new(data, 4).value(),
            RollingHash::new(data, 24).value()
        );
    }
}
