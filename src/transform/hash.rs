//! Cryptographic hash transformers (encode-only).
//!
//! Hashes are non-reversible: they expose `encodings` and nothing else. The
//! search engine can still find hashed values because the needle engine
//! precomputes the digests up front.

use sha2::{Digest, Sha256, Sha512};

use super::{ByteSeq, Transformer};

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Digest of `prefix ++ value ++ suffix`.
    fn digest(self, prefix: &[u8], value: &[u8], suffix: &[u8]) -> Vec<u8> {
        fn run<D: Digest>(parts: [&[u8]; 3]) -> Vec<u8> {
            let mut hasher = D::new();
            for part in parts {
                hasher.update(part);
            }
            hasher.finalize().to_vec()
        }
        let parts = [prefix, value, suffix];
        match self {
            HashAlgorithm::Md5 => run::<md5::Md5>(parts),
            HashAlgorithm::Sha1 => run::<sha1::Sha1>(parts),
            HashAlgorithm::Sha256 => run::<Sha256>(parts),
            HashAlgorithm::Sha512 => run::<Sha512>(parts),
        }
    }
}

/// A hash layer: yields exactly one buffer, the raw digest of the value with
/// optional prefix/suffix bytes concatenated around it first.
#[derive(Debug, Clone)]
pub struct HashTransform {
    algorithm: HashAlgorithm,
    prefix: Vec<u8>,
    suffix: Vec<u8>,
    /// Keep only the first `n` digest bytes; identity becomes `"<alg>/<n>"`.
    truncate: Option<usize>,
    id: String,
}

impl HashTransform {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        HashTransform {
            algorithm,
            prefix: Vec::new(),
            suffix: Vec::new(),
            truncate: None,
            id: algorithm.name().to_owned(),
        }
    }

    /// Hash `prefix ++ value ++ suffix` instead of the bare value. Used when
    /// a tracker is known to salt identifiers before digesting them.
    pub fn with_affixes(algorithm: HashAlgorithm, prefix: Vec<u8>, suffix: Vec<u8>) -> Self {
        let mut t = Self::new(algorithm);
        t.prefix = prefix;
        t.suffix = suffix;
        t
    }

    /// Emit only the first `n` digest bytes.
    pub fn truncated(algorithm: HashAlgorithm, n: usize) -> Self {
        let mut t = Self::new(algorithm);
        t.truncate = Some(n);
        t.id = format!("{}/{}", algorithm.name(), n);
        t
    }
}

impl Transformer for HashTransform {
    fn id(&self) -> &str {
        &self.id
    }

    fn encodes(&self) -> bool {
        true
    }

    fn encodings<'a>(&'a self, value: &'a [u8]) -> ByteSeq<'a> {
        Box::new(std::iter::once_with(move || {
            let mut digest = self.algorithm.digest(&self.prefix, value, &self.suffix);
            if let Some(n) = self.truncate {
                digest.truncate(n);
            }
            digest
        }))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn single(t: &HashTransform, v: &[u8]) -> Vec<u8> {
        let mut it = t.encodings(v);
        let out = it.next().expect("one digest");
        assert!(it.next().is_none());
        out
    }

    #[test]
    fn known_digests() {
        // Reference vectors for "abc".
        assert_eq!(
            hex::encode(single(&HashTransform::new(HashAlgorithm::Md5), b"abc")),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            hex::encode(single(&HashTransform::new(HashAlgorithm::Sha1), b"abc")),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            hex::encode(single(&HashTransform::new(HashAlgorithm::Sha256), b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn digest_lengths() {
        assert_eq!(single(&HashTransform::new(HashAlgorithm::Sha512), b"x").len(), 64);
        assert_eq!(single(&HashTransform::new(HashAlgorithm::Md5), b"x").len(), 16);
    }

    #[test]
    fn affixes_change_the_digest() {
        let plain = HashTransform::new(HashAlgorithm::Sha256);
        let salted =
            HashTransform::with_affixes(HashAlgorithm::Sha256, b"salt:".to_vec(), Vec::new());
        assert_ne!(single(&plain, b"abc"), single(&salted, b"abc"));
        // Affixed digest equals digesting the concatenation directly.
        assert_eq!(single(&salted, b"abc"), single(&plain, b"salt:abc"));
    }

    #[test]
    fn truncation_and_identity() {
        let t = HashTransform::truncated(HashAlgorithm::Sha256, 16);
        assert_eq!(t.id(), "sha256/16");
        let full = single(&HashTransform::new(HashAlgorithm::Sha256), b"abc");
        assert_eq!(single(&t, b"abc"), full[..16].to_vec());
    }

    #[test]
    fn not_reversible() {
        let t = HashTransform::new(HashAlgorithm::Md5);
        assert!(!t.decodes());
        assert_eq!(t.extract_decode(b"anything", 0).count(), 0);
    }
}
