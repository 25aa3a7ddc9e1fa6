// Greedy source matching.
//
// Scans the target one byte at a time with a rolling hash. At each probe
// position the candidate source blocks from the index are extended forward
// and backward; the longest extension that is cheaper to encode as a copy
// than as literal text wins. After a copy the scan restarts right behind it.
// If no copy is found before the final window, the rest of the target
// becomes a single literal.

use super::config::{MatcherConfig, NHASH};
use super::rolling::RollingHash;
use super::table::SourceIndex;
use crate::format::command::Instruction;
use crate::format::encoder::COPY_OVERHEAD;
use crate::format::varint::digit_count;

/// A copy candidate anchored at one probe position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Literal bytes between the scan base and the start of the copy.
    pub literal_len: usize,
    /// Length of the copy.
    pub len: usize,
    /// Source offset of the first copied byte.
    pub offset: usize,
}

/// Source-side matcher: the source plus its block index.
pub struct MatchEngine<'s> {
    config: MatcherConfig,
    source: &'s [u8],
    index: Option<SourceIndex>,
}

impl<'s> MatchEngine<'s> {
    /// Index `source`. Sources of NHASH bytes or fewer are never indexed.
    pub fn new(config: MatcherConfig, source: &'s [u8]) -> Self {
        let index = (source.len() > NHASH).then(|| SourceIndex::build(source));
        Self {
            config,
            source,
            index,
        }
    }

    /// Produce the instruction stream that rebuilds `target`.
    pub fn find_matches(&self, target: &[u8]) -> Vec<Instruction> {
        let Some(index) = &self.index else {
            return vec![Instruction::Insert { len: target.len() }];
        };

        let mut out = Vec::new();
        let len_out = target.len();
        let mut base = 0usize;

        while base + NHASH < len_out {
            let mut hash = RollingHash::new(target, base);
            let mut i = 0usize;
            loop {
                if let Some(m) = self.best_match(index, target, base, i, hash.value()) {
                    if m.literal_len > 0 {
                        out.push(Instruction::Insert { len: m.literal_len });
                    }
                    out.push(Instruction::Copy {
                        len: m.len,
                        offset: m.offset,
                    });
                    base += m.literal_len + m.len;
                    break;
                }
                if base + i + NHASH >= len_out {
                    out.push(Instruction::Insert { len: len_out - base });
                    base = len_out;
                    break;
                }
                hash.advance(target[base + i + NHASH]);
                i += 1;
            }
        }

        if base < len_out {
            out.push(Instruction::Insert { len: len_out - base });
        }
        out
    }

    /// Best acceptable copy for the window at `target[base + i..]`.
    ///
    /// Ties keep the first candidate in chain order.
    fn best_match(
        &self,
        index: &SourceIndex,
        target: &[u8],
        base: usize,
        i: usize,
        hash: u32,
    ) -> Option<Match> {
        let src = self.source;
        let anchor = base + i;
        let mut best: Option<Match> = None;

        for block in index.chain(hash).take(self.config.chain_limit) {
            let src_pos = block * NHASH;

            let fwd = src[src_pos..]
                .iter()
                .zip(&target[anchor..])
                .take_while(|(s, t)| s == t)
                .count();

            // Never extend back past the scan base or to source offset 0.
            let back = (1..src_pos.min(i + 1))
                .take_while(|&k| src[src_pos - k] == target[anchor - k])
                .count();

            let len = fwd + back;
            let offset = src_pos - back;
            let literal_len = i - back;

            let cost = digit_count(literal_len as u64)
                + digit_count(len as u64)
                + digit_count(offset as u64)
                + COPY_OVERHEAD;
            if len >= cost && best.is_none_or(|b| len > b.len) {
                best = Some(Match {
                    literal_len,
                    len,
                    offset,
                });
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(source: &[u8], target: &[u8]) -> Vec<Instruction> {
        MatchEngine::new(MatcherConfig::default(), source).find_matches(target)
    }

    #[test]
    fn tiny_source_is_one_literal() {
        let target = b"anything at all, of any length whatsoever";
        assert_eq!(
            matches(&[0u8; NHASH], target),
            vec![Instruction::Insert { len: target.len() }]
        );
        assert_eq!(matches(b"", b""), vec![Instruction::Insert { len: 0 }]);
    }

    #[test]
    fn empty_target_with_indexed_source() {
        assert_eq!(matches(&[7u8; 100], b""), vec![]);
    }

    #[test]
    fn single_byte_insertion() {
        let source = [b'a'; 64];
        let mut target = source.to_vec();
        target.insert(32, b'b');
        assert_eq!(
            matches(&source, &target),
            vec![
                Instruction::Copy { len: 32, offset: 32 },
                Instruction::Insert { len: 1 },
                Instruction::Copy { len: 32, offset: 32 },
            ]
        );
    }

    #[test]
    fn identical_input_is_one_copy() {
        let source: Vec<u8> = (0u8..200).collect();
        let out = matches(&source, &source);
        assert_eq!(out, vec![Instruction::Copy { len: 200, offset: 0 }]);
    }

    #[test]
    fn short_target_is_literal() {
        // A target no longer than the window is never probed.
        let source: Vec<u8> = (0u8..64).collect();
        assert_eq!(
            matches(&source, &source[..NHASH]),
            vec![Instruction::Insert { len: NHASH }]
        );
    }

    #[test]
    fn backward_extension_absorbs_literal() {
        let source: Vec<u8> = (0u8..128).collect();
        // Target starts mid-block: the probe at i=8 hits block 1 (offset 16)
        // after sliding; backward extension reaches offset 8 and base.
        let target = source[8..100].to_vec();
        assert_eq!(
            matches(&source, &target),
            vec![Instruction::Copy { len: 92, offset: 8 }]
        );
    }

    #[test]
    fn unrelated_data_is_literal() {
        let source = [0x11u8; 64];
        let target = [0x22u8; 64];
        assert_eq!(
            matches(&source, &target),
            vec![Instruction::Insert { len: 64 }]
        );
    }

    #[test]
    fn chain_limit_zero_disables_copies() {
        let source: Vec<u8> = (0u8..200).collect();
        let engine = MatchEngine::new(MatcherConfig { chain_limit: 0 }, &source);
        assert_eq!(
            engine.find_matches(&source),
            vec![Instruction::Insert { len: 200 }]
        );
    }

    #[test]
    fn instructions_cover_target() {
        let source: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();
        let mut target = source.clone();
        target[1000] ^= 0xFF;
        let tail = target.split_off(2000);
        target.extend_from_slice(b"inserted text");
        target.extend_from_slice(&tail);
        target.truncate(3500);
        let out = matches(&source, &target);
        let total: usize = out.iter().map(Instruction::len).sum();
        assert_eq!(total, target.len());
        for inst in &out {
            if let Instruction::Copy { len, offset } = *inst {
                assert!(offset + len <= source.len());
            }
        }
    }
}
