//! The searcher: needle precomputation over encoders and the recursive,
//! racing decode search over haystacks.
//!
//! `add_value` walks the encoder set up to a configurable depth and records
//! every encoded form as a literal needle, deduplicated by CRC32.
//! `find_value_in` scans a haystack for any needle, peeling decoder layers
//! recursively when the literal scan misses; decoder branches race and the
//! first branch to surface a needle wins.

use std::collections::HashSet;
use std::sync::Arc;

use memchr::memmem;
use rayon::prelude::*;

use crate::error::SearchError;
use crate::fingerprint::{fingerprint, LayerSeen, SharedLayerSeen};
use crate::needle::{Chain, Needle};
use crate::transform::{default_transformers, Transformer};

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Options for [`Searcher::add_value_with`].
#[derive(Clone)]
pub struct AddOptions {
    /// Maximum number of encoder layers applied on top of the raw value.
    pub max_encode_layers: u32,
    /// Encoders to precompute with; `None` means the searcher's default
    /// transformers (filtered to those that encode).
    pub encoders: Option<Vec<Arc<dyn Transformer>>>,
    /// When `true`, only chains whose outermost layer is non-reversible are
    /// added as needles. Reversible outer layers are redundant there: the
    /// search engine strips them by decoding.
    pub end_with_non_reversible_layer: bool,
}

impl Default for AddOptions {
    fn default() -> Self {
        AddOptions {
            max_encode_layers: 2,
            encoders: None,
            end_with_non_reversible_layer: true,
        }
    }
}

/// Options for [`Searcher::find_value_in_with`].
#[derive(Clone)]
pub struct FindOptions {
    /// Maximum number of decoder layers peeled off the haystack.
    pub max_decode_layers: u32,
    /// Decoders to search with; `None` means the searcher's default
    /// transformers (filtered to those that decode). Every entry must
    /// expose extract-decode.
    pub decoders: Option<Vec<Arc<dyn Transformer>>>,
}

impl Default for FindOptions {
    fn default() -> Self {
        FindOptions { max_decode_layers: 10, decoders: None }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Searcher
// ─────────────────────────────────────────────────────────────────────────────

/// A reusable secret-value searcher.
///
/// Values and needles are add-only. After all `add_value` calls have
/// settled, any number of `find_value_in` calls may run concurrently.
pub struct Searcher {
    transformers: Vec<Arc<dyn Transformer>>,
    values: Vec<Vec<u8>>,
    value_fingerprints: HashSet<u32>,
    needles: Vec<Needle>,
    needle_fingerprints: HashSet<u32>,
    /// Length of the shortest needle admitted so far.
    min_needle_len: usize,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Searcher {
    /// An empty searcher over the default transformer stack.
    pub fn new() -> Self {
        Self::with_transformers(default_transformers())
    }

    /// An empty searcher over a custom transformer stack.
    pub fn with_transformers(transformers: Vec<Arc<dyn Transformer>>) -> Self {
        Searcher {
            transformers,
            values: Vec::new(),
            value_fingerprints: HashSet::new(),
            needles: Vec::new(),
            needle_fingerprints: HashSet::new(),
            min_needle_len: usize::MAX,
        }
    }

    /// Convenience constructor: a default searcher with every value added
    /// under default options.
    pub fn from_values<I, V>(values: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        let mut searcher = Self::new();
        for value in values {
            searcher.add_value(value.as_ref())?;
        }
        Ok(searcher)
    }

    pub fn values(&self) -> &[Vec<u8>] {
        &self.values
    }

    pub fn needles(&self) -> &[Needle] {
        &self.needles
    }

    pub fn transformers(&self) -> &[Arc<dyn Transformer>] {
        &self.transformers
    }

    // ─────────────────────────────────────────────────────────────────────
    // Needle engine
    // ─────────────────────────────────────────────────────────────────────

    /// Add a value with default options.
    pub fn add_value(&mut self, value: &[u8]) -> Result<(), SearchError> {
        self.add_value_with(value, &AddOptions::default())
    }

    /// Add a value and precompute its encoded forms.
    pub fn add_value_with(&mut self, value: &[u8], opts: &AddOptions) -> Result<(), SearchError> {
        if value.is_empty() {
            return Err(SearchError::EmptyValue);
        }
        let encoders: Vec<Arc<dyn Transformer>> = match &opts.encoders {
            Some(list) => list.clone(),
            None => self.transformers.iter().filter(|t| t.encodes()).cloned().collect(),
        };

        if self.value_fingerprints.insert(fingerprint(value)) {
            self.values.push(value.to_vec());
        }
        let root = Needle::raw(value.to_vec());
        self.insert_needle(root.clone());

        if opts.max_encode_layers > 0 {
            let mut seen = LayerSeen::new();
            self.add_encodings(
                &encoders,
                opts.end_with_non_reversible_layer,
                &root,
                opts.max_encode_layers - 1,
                &mut seen,
            );
        }
        log::debug!(
            "added value of {} bytes; {} needles total, shortest {}",
            value.len(),
            self.needles.len(),
            self.min_needle_len
        );
        Ok(())
    }

    /// Recursive encoder walk below one needle.
    ///
    /// `layers_left` counts the *extra* layers still allowed below the
    /// children generated here. Children are admitted through a
    /// layer-parameterized seen-map: a buffer revisited with more remaining
    /// depth is explored again, since the shallower visit could not reach
    /// the full depth.
    fn add_encodings(
        &mut self,
        encoders: &[Arc<dyn Transformer>],
        end_with_non_reversible: bool,
        needle: &Needle,
        layers_left: u32,
        seen: &mut LayerSeen,
    ) {
        let mut admitted: Vec<Needle> = Vec::new();
        for encoder in encoders.iter().filter(|e| e.encodes()) {
            // A reversible terminator would be redundant under the policy;
            // skip the whole branch.
            if layers_left == 0 && end_with_non_reversible && encoder.decodes() {
                continue;
            }
            for bytes in encoder.encodings(&needle.bytes) {
                let mut chain = Chain::with_capacity(needle.chain.len() + 1);
                chain.push(encoder.id().to_owned());
                chain.extend(needle.chain.iter().cloned());
                let child = Needle::layered(bytes, chain);
                if !seen.admit(child.fingerprint(), layers_left) {
                    continue;
                }
                let eligible = !end_with_non_reversible || !encoder.decodes();
                if eligible {
                    self.insert_needle(child.clone());
                }
                admitted.push(child);
            }
        }
        if layers_left > 0 {
            for child in &admitted {
                self.add_encodings(encoders, end_with_non_reversible, child, layers_left - 1, seen);
            }
        }
    }

    /// Fingerprint-deduplicated needle insertion; tracks the minimum length.
    fn insert_needle(&mut self, needle: Needle) -> bool {
        if !self.needle_fingerprints.insert(needle.fingerprint()) {
            return false;
        }
        self.min_needle_len = self.min_needle_len.min(needle.len());
        self.needles.push(needle);
        true
    }

    // ─────────────────────────────────────────────────────────────────────
    // Search engine
    // ─────────────────────────────────────────────────────────────────────

    /// Search a haystack with default options.
    pub fn find_value_in(&self, haystack: &[u8]) -> Result<Option<Chain>, SearchError> {
        self.find_value_in_with(haystack, &FindOptions::default())
    }

    /// Search a haystack for any needle, peeling up to
    /// `opts.max_decode_layers` decoder layers.
    ///
    /// Returns the decoder chain (outermost first) that exposed a needle,
    /// concatenated with that needle's own encoder chain; the empty chain
    /// means the haystack contains a value literally. `None` means nothing
    /// was found within the recursion bound. When several chains would
    /// match, whichever race resolves first is returned.
    pub fn find_value_in_with(
        &self,
        haystack: &[u8],
        opts: &FindOptions,
    ) -> Result<Option<Chain>, SearchError> {
        if self.needles.is_empty() {
            return Err(SearchError::NoValues);
        }
        let decoders: Vec<Arc<dyn Transformer>> = match &opts.decoders {
            Some(list) => {
                for d in list {
                    if !d.decodes() {
                        return Err(SearchError::NotADecoder(d.id().to_owned()));
                    }
                }
                list.clone()
            }
            None => self.transformers.iter().filter(|t| t.decodes()).cloned().collect(),
        };

        let min_len = self.min_encoded_length(&decoders);
        let seen = SharedLayerSeen::new();
        let found = self.find_impl(haystack, opts.max_decode_layers, &decoders, min_len, &seen);
        log::debug!(
            "searched {} bytes (min encoded length {}): {}",
            haystack.len(),
            min_len,
            match &found {
                Some(chain) => format!("hit via {:?}", chain),
                None => "no match".to_owned(),
            }
        );
        Ok(found)
    }

    /// Lower bound on the encoded length of any interesting match: the
    /// shortest needle, or shorter still if a compressing decoder can shrink
    /// one of the values below that.
    fn min_encoded_length(&self, decoders: &[Arc<dyn Transformer>]) -> usize {
        let mut min = self.min_needle_len;
        for decoder in decoders {
            for value in &self.values {
                if let Some(len) = decoder.compressed_length(value) {
                    min = min.min(len);
                }
            }
        }
        if min == usize::MAX {
            0
        } else {
            min
        }
    }

    fn find_impl(
        &self,
        haystack: &[u8],
        layers_left: u32,
        decoders: &[Arc<dyn Transformer>],
        min_len: usize,
        seen: &SharedLayerSeen,
    ) -> Option<Chain> {
        // Literal scan first: raw values were inserted before any encoded
        // form, so a direct hit reports the empty chain.
        if let Some(needle) =
            self.needles.iter().find(|n| memmem::find(haystack, &n.bytes).is_some())
        {
            return Some(needle.chain.clone());
        }
        if layers_left == 0 {
            return None;
        }

        // Decode race: every decoder is a branch, every admitted candidate a
        // sub-branch; the first branch to return a chain wins and remaining
        // work is no longer scheduled.
        decoders.par_iter().find_map_any(|decoder| {
            let candidates: Vec<Vec<u8>> = decoder
                .extract_decode(haystack, min_len)
                .filter(|c| seen.admit(fingerprint(c), layers_left))
                .collect();
            if candidates.is_empty() {
                return None;
            }
            log::trace!(
                "{}: {} candidate(s) at {} layers left",
                decoder.id(),
                candidates.len(),
                layers_left
            );
            candidates
                .into_par_iter()
                .find_map_any(|c| self.find_impl(&c, layers_left - 1, decoders, min_len, seen))
                .map(|mut chain| {
                    chain.insert(0, decoder.id().to_owned());
                    chain
                })
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
