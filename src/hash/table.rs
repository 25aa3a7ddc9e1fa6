// Source block index.
//
// The source is cut into consecutive NHASH-byte blocks. Each block's rolling
// hash selects a bucket; `landmark[bucket]` holds the most recently indexed
// block and `collide[block]` links to the block that held the bucket before
// it. A lookup walks that chain newest-first.
//
// Blocks are indexed while `offset + NHASH < source.len()`, so the final
// block is skipped whenever it ends exactly at the end of the source. Bucket
// count is `ceil(source.len() / NHASH)`.
//
// Stored values use HASH_CKOFFSET=1 so that 0 means "none".

use super::config::NHASH;
use super::rolling::RollingHash;

/// Offset added to stored block indices so 0 means "empty".
pub const HASH_CKOFFSET: usize = 1;

#[derive(Debug, Clone)]
pub struct SourceIndex {
    landmark: Vec<usize>,
    collide: Vec<usize>,
}

impl SourceIndex {
    /// Index every full block of `source`.
    pub fn build(source: &[u8]) -> Self {
        let buckets = source.len().div_ceil(NHASH);
        let mut landmark = vec![0usize; buckets];
        let mut collide = vec![0usize; buckets];

        let mut pos = 0;
        while pos + NHASH < source.len() {
            let block = pos / NHASH;
            let bucket = RollingHash::new(source, pos).value() as usize % buckets;
            collide[block] = landmark[bucket];
            landmark[bucket] = block + HASH_CKOFFSET;
            pos += NHASH;
        }

        Self { landmark, collide }
    }

    /// Number of hash buckets.
    pub fn buckets(&self) -> usize {
        self.landmark.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmark.is_empty()
    }

    /// Candidate blocks for `hash`, newest first.
    #[inline]
    pub fn chain(&self, hash: u32) -> Chain<'_> {
        let next = if self.landmark.is_empty() {
            0
        } else {
            self.landmark[hash as usize % self.landmark.len()]
        };
        Chain {
            collide: &self.collide,
            next,
        }
    }
}

/// Walks one collision chain, yielding block indices.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    collide: &'a [usize],
    next: usize,
}

impl Iterator for Chain<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.next == 0 {
            return None;
        }
        let block = self.next - HASH_CKOFFSET;
        self.next = self.collide[block];
        Some(block)
    }
}
