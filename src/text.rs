// Text adapter over the byte engine.
//
// Strings are transcoded to UTF-8, handed to the byte API, and the result is
// transcoded back. Sizes are reported in UTF-8 bytes, not characters.
//
// Literal runs in a delta can start or end inside a multi-byte character, so
// a text delta is not always valid UTF-8. That case is reported as an error;
// callers that need every delta use the byte API.

use crate::engine::{self, DecodeOptions};
use crate::format::decoder::DecodeError;

#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("{what} is not valid UTF-8: {source}")]
    NotUtf8 {
        what: &'static str,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl TextError {
    /// The underlying delta error, if this is one.
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            Self::Decode(e) => Some(e),
            Self::NotUtf8 { .. } => None,
        }
    }
}

/// Create a text delta from `source` to `target`.
///
/// Fails with [`TextError::NotUtf8`] when a literal run starts or ends inside
/// a multi-byte character, which can happen for valid inputs such as `é`
/// (`C3 A9`) against `ĩ` (`C4 A9`). Use [`engine::create_delta`] for those.
pub fn create_text_delta(source: &str, target: &str) -> Result<String, TextError> {
    let delta = engine::create_delta(source.as_bytes(), target.as_bytes());
    String::from_utf8(delta).map_err(|e| TextError::NotUtf8 {
        what: "delta",
        source: e,
    })
}

/// Apply a text delta to `source`.
pub fn apply_text_delta(source: &str, delta: &str) -> Result<String, TextError> {
    apply_text_delta_with_options(source, delta, &DecodeOptions::default())
}

/// Apply a text delta with custom options.
pub fn apply_text_delta_with_options(
    source: &str,
    delta: &str,
    opts: &DecodeOptions,
) -> Result<String, TextError> {
    let target = engine::apply_delta_with_options(source.as_bytes(), delta.as_bytes(), opts)?;
    String::from_utf8(target).map_err(|e| TextError::NotUtf8 {
        what: "target",
        source: e,
    })
}

/// Target size in UTF-8 bytes. Only the header line is decoded.
pub fn text_delta_target_size(delta: &str) -> Result<usize, TextError> {
    let line = match delta.find('\n') {
        Some(end) => &delta[..=end],
        None => return Err(DecodeError::HeaderNotTerminated.into()),
    };
    Ok(engine::delta_target_size(line.as_bytes())?)
}
