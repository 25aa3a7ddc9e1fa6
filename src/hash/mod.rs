// Hashing and matching for the delta encoder.
//
// This module provides:
// - A 16-byte rolling hash (Adler-style 16-bit sum pair)
// - The source block index with bounded collision chains
// - Greedy forward/backward match extension against the source
// - Matcher constants and tuning

pub mod config;
pub mod matching;
pub mod rolling;
pub mod table;
