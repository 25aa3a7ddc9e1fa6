//! fossil-delta: Fossil-compatible delta encoding/decoding in Rust.
//!
//! The crate provides:
//! - The delta wire format: varints, checksum, commands (`format`)
//! - Source indexing and greedy matching (`hash`)
//! - The byte and text APIs (`engine`, `text`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use fossil_delta::{apply_delta, create_delta, delta_target_size};
//!
//! let source = b"hello old world, hello old world";
//! let target = b"hello new world, hello old world";
//!
//! let delta = create_delta(source, target);
//! assert_eq!(delta_target_size(&delta).unwrap(), target.len());
//! let decoded = apply_delta(source, &delta).unwrap();
//! assert_eq!(decoded, target);
//! ```

pub mod engine;
pub mod format;
pub mod hash;
pub mod io;
pub mod text;

#[cfg(feature = "cli")]
pub mod cli;

pub use engine::{
    DecodeOptions, EncodeOptions, apply_delta, apply_delta_with_options, create_delta,
    create_delta_with_options, delta_target_size,
};
pub use format::{Command, Commands, DecodeError, DeltaStats, ErrorKind};
pub use text::{
    TextError, apply_text_delta, apply_text_delta_with_options, create_text_delta,
    text_delta_target_size,
};
