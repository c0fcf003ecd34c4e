//! Error type for contract violations on the public [`Searcher`] API.
//!
//! Codec-level input errors (malformed escapes, truncated streams, ragged
//! base64) are never surfaced here: transformers swallow them and simply
//! yield nothing for the affected branch. This enum only covers misuse of
//! the API itself; the searcher remains usable after any of these.
//!
//! [`Searcher`]: crate::Searcher

use thiserror::Error;

/// Programmer-error conditions detected by [`Searcher`](crate::Searcher).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// An empty byte string was passed to `add_value`.
    #[error("value must not be empty")]
    EmptyValue,

    /// `find_value_in` was called before any value was added.
    #[error("no value has been added to the searcher")]
    NoValues,

    /// A transformer without decode capability was supplied as a decoder.
    #[error("transformer `{0}` does not support extract-decode")]
    NotADecoder(String),
}
