//! CRC32 buffer fingerprints and the layer-parameterized dedup maps built on
//! top of them.
//!
//! Fingerprints exist purely for deduplication; they carry no cryptographic
//! weight. A collision between two distinct buffers can at worst suppress a
//! redundant branch, which only matters if the colliding buffers differ in a
//! needle-containing region.

use std::collections::HashMap;
use std::sync::Mutex;

/// CRC32 fingerprint of a byte buffer.
#[inline]
pub fn fingerprint(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

// ─────────────────────────────────────────────────────────────────────────────
// Layer-parameterized seen-maps
// ─────────────────────────────────────────────────────────────────────────────
//
// Both maps record, per fingerprint, the largest number of *remaining* layers
// a buffer has been visited with. A revisit is admitted only when it arrives
// with strictly more remaining depth than any earlier visit: an earlier visit
// that ran out of layers must not short-circuit a deeper exploration of the
// same buffer.

/// Seen-map for the single-threaded needle-precomputation path.
#[derive(Debug, Default)]
pub struct LayerSeen {
    map: HashMap<u32, u32>,
}

impl LayerSeen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit `fp` at `layers_left` remaining layers, recording the visit.
    pub fn admit(&mut self, fp: u32, layers_left: u32) -> bool {
        match self.map.get_mut(&fp) {
            None => {
                self.map.insert(fp, layers_left);
                true
            }
            Some(seen) if *seen < layers_left => {
                *seen = layers_left;
                true
            }
            Some(_) => false,
        }
    }
}

/// Seen-map shared across the racing branches of one search call.
///
/// Every `find` invocation owns exactly one of these; nothing is shared
/// between top-level searches.
#[derive(Debug, Default)]
pub struct SharedLayerSeen {
    map: Mutex<HashMap<u32, u32>>,
}

impl SharedLayerSeen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same admission rule as [`LayerSeen::admit`], safe to call from
    /// parallel decode branches.
    pub fn admit(&self, fp: u32, layers_left: u32) -> bool {
        let mut map = self.map.lock().expect("seen-map mutex poisoned");
        match map.get_mut(&fp) {
            None => {
                map.insert(fp, layers_left);
                true
            }
            Some(seen) if *seen < layers_left => {
                *seen = layers_left;
                true
            }
            Some(_) => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
