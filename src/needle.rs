//! Needles: concrete byte strings the search engine scans for literally,
//! together with the transformer chain that produced them.

use crate::fingerprint::fingerprint;

/// Ordered list of transformer identities, outermost first.
///
/// Applying the chain's decoders in reverse order to the matched region of a
/// haystack recovers the original value. The empty chain denotes the raw
/// value itself.
pub type Chain = Vec<String>;

/// An encoded form of some original value, searched for literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Needle {
    /// The encoded byte string.
    pub bytes: Vec<u8>,
    /// Transformers applied to reach `bytes`, outermost first.
    pub chain: Chain,
}

impl Needle {
    /// A needle for the raw, untransformed value.
    pub fn raw(bytes: Vec<u8>) -> Self {
        Needle { bytes, chain: Chain::new() }
    }

    /// A needle produced by the given transformer chain.
    pub fn layered(bytes: Vec<u8>, chain: Chain) -> Self {
        Needle { bytes, chain }
    }

    /// CRC32 identity used for deduplication.
    #[inline]
    pub fn fingerprint(&self) -> u32 {
        fingerprint(&self.bytes)
    }

    /// `true` when this needle is an original value (empty chain).
    pub fn is_raw(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
