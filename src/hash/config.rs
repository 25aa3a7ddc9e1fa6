// Matcher parameters.

/// Rolling-hash window width and source block size. Must be a power of two.
pub const NHASH: usize = 16;

/// Collision-chain hops examined per probe position.
pub const DEFAULT_CHAIN_LIMIT: usize = 250;

const _: () = assert!(NHASH.is_power_of_two());

/// Match engine tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Maximum candidate blocks examined per target position. Lower values
    /// bound encode time on pathological inputs at the cost of missed matches.
    pub chain_limit: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            chain_limit: DEFAULT_CHAIN_LIMIT,
        }
    }
}
