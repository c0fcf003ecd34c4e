//! leakseek — find a secret byte value inside an opaque buffer even when it
//! has been pushed through layers of reversible encodings (base64, hex,
//! percent-encoding, JSON string escapes, HTML entities, multipart bodies,
//! LZ-String, zlib/gzip/Brotli) and/or non-reversible hashes.
//!
//! Built for forensic inspection of captured web traffic: given a known
//! identifier, decide whether a request body actually leaks it and report
//! one chain of transformations that exposes it.
//!
//! ```
//! use leakseek::Searcher;
//!
//! let mut searcher = Searcher::new();
//! searcher.add_value(b"first")?;
//! // "Zmlyc3Q=" is base64("first")
//! let chain = searcher.find_value_in(b"token=Zmlyc3Q=&x=1")?;
//! assert_eq!(chain, Some(vec!["base64".to_string()]));
//! # Ok::<(), leakseek::SearchError>(())
//! ```
//!
//! The searcher is a syntactic detector: it reports *some* chain that
//! produces a literal match, makes no claim the match is meaningful, and
//! never attempts to invert a hash. Hashed forms are found because they
//! are precomputed on the needle side.

pub mod error;
pub mod fingerprint;
pub mod needle;
pub mod searcher;
pub mod transform;

// ─────────────────────────────────────────────────────────────────────────────
// Primary API re-exports
// ─────────────────────────────────────────────────────────────────────────────

/// Contract-violation errors raised by [`Searcher`].
pub use error::SearchError;
/// Transformer chain, outermost first; empty means a direct literal match.
pub use needle::{Chain, Needle};
/// The searcher and its per-call options.
pub use searcher::{AddOptions, FindOptions, Searcher};
/// The codec abstraction and the default stack.
pub use transform::{default_transformers, ByteSeq, Transformer};

// Codec types, for callers assembling custom stacks.
pub use transform::{
    Base64Dialect, Base64Transform, CompressFormat, CompressTransform, FormDataTransform,
    HashAlgorithm, HashTransform, HexCase, HexTransform, HtmlEntitiesTransform,
    JsonStringTransform, LzStringTransform, LzVariant, UriTransform,
};
