//! The transformer abstraction and the codec library built on it.
//!
//! Submodules, one per codec:
//! - [`hash`]        — md5 / sha1 / sha256 / sha512 digests (encode-only)
//! - [`base64`]      — dialect-aware base64 with tail-bit repair
//! - [`hex`]         — lower/upper hexadecimal
//! - [`uri`]         — URI percent-encoding incl. the `+`-for-space form
//! - [`json_string`] — JSON string literal extraction (decode-only)
//! - [`html`]        — HTML entity encoding
//! - [`form_data`]   — multipart/form-data part extraction (decode-only)
//! - [`lz_string`]   — the five LZ-String wire variants
//! - [`compress`]    — gzip / zlib / raw-deflate / brotli
//!
//! Each codec implements [`Transformer`] and is re-exported here.

pub mod base64;
pub mod compress;
pub mod form_data;
pub mod hash;
pub mod hex;
pub mod html;
pub mod json_string;
pub mod lz_string;
pub mod uri;

use std::iter;
use std::sync::Arc;

pub use self::base64::{Base64Dialect, Base64Transform};
pub use self::compress::{CompressFormat, CompressTransform};
pub use self::form_data::FormDataTransform;
pub use self::hash::{HashAlgorithm, HashTransform};
pub use self::hex::{HexCase, HexTransform};
pub use self::html::HtmlEntitiesTransform;
pub use self::json_string::JsonStringTransform;
pub use self::lz_string::{LzStringTransform, LzVariant};
pub use self::uri::UriTransform;

/// Lazy, finite, non-restartable sequence of candidate byte buffers.
///
/// Implementations may do real work (compression, regex scans) between
/// yields; consumers are free to drop the iterator at any point and must not
/// be relied upon to drain it.
pub type ByteSeq<'a> = Box<dyn Iterator<Item = Vec<u8>> + 'a>;

/// An empty [`ByteSeq`], for codecs asked about a capability they lack.
pub(crate) fn empty_seq<'a>() -> ByteSeq<'a> {
    Box::new(iter::empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Transformer contract
// ─────────────────────────────────────────────────────────────────────────────

/// A named codec exposing a subset of `{encodings, extract_decode,
/// compressed_length}`.
///
/// A transformer is *reversible* iff [`decodes`](Transformer::decodes)
/// returns `true`; non-reversible transformers (hashes) are encoders only.
/// Identities returned by [`id`](Transformer::id) are stable strings used in
/// result chains and test assertions.
pub trait Transformer: Send + Sync {
    /// Stable identity string, e.g. `"base64"` or `"sha256"`.
    fn id(&self) -> &str;

    /// Whether [`encodings`](Transformer::encodings) produces candidates.
    fn encodes(&self) -> bool {
        false
    }

    /// Whether [`extract_decode`](Transformer::extract_decode) produces
    /// candidates. Equivalent to reversibility.
    fn decodes(&self) -> bool {
        false
    }

    /// Candidate encoded forms of `value`. Yield order is
    /// implementation-defined but stable for identical input and
    /// configuration. Empty when the codec cannot represent `value`.
    fn encodings<'a>(&'a self, _value: &'a [u8]) -> ByteSeq<'a> {
        empty_seq()
    }

    /// Candidate decoded buffers extracted from substrings of `haystack`.
    ///
    /// `min_len` is a heuristic lower bound on the *encoded* length of
    /// interesting matches; codecs may skip shorter matches but must not use
    /// it to reject matches that could decode to something longer. `0` means
    /// no bound. Malformed input yields nothing rather than erroring.
    fn extract_decode<'a>(&'a self, _haystack: &'a [u8], _min_len: usize) -> ByteSeq<'a> {
        empty_seq()
    }

    /// Length of the shortest encoded rendering of `value`, for codecs whose
    /// output can be *shorter* than their input (compressors). `None`
    /// otherwise.
    fn compressed_length(&self, _value: &[u8]) -> Option<usize> {
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Default transformer stack
// ─────────────────────────────────────────────────────────────────────────────

/// The default transformer list, in race order: hashes first, then textual
/// codecs, then the expensive compressors. Order affects which of several
/// sound chains wins a race, never correctness.
pub fn default_transformers() -> Vec<Arc<dyn Transformer>> {
    vec![
        Arc::new(HashTransform::new(HashAlgorithm::Md5)),
        Arc::new(HashTransform::new(HashAlgorithm::Sha1)),
        Arc::new(HashTransform::new(HashAlgorithm::Sha256)),
        Arc::new(HashTransform::new(HashAlgorithm::Sha512)),
        Arc::new(Base64Transform::default()),
        Arc::new(HexTransform::default()),
        Arc::new(UriTransform::default()),
        Arc::new(JsonStringTransform::default()),
        Arc::new(HtmlEntitiesTransform::default()),
        Arc::new(FormDataTransform::default()),
        Arc::new(LzStringTransform::default()),
        Arc::new(CompressTransform::default()),
    ]
}
