//! LZ-String codec, covering all five wire variants of the reference
//! library: raw code units (`ucs2`), the UTF-16-safe string (`utf16`), the
//! byte array (`bytes`), and the base64/URI string forms.
//!
//! Decoding only attempts the variants that arrive as raw bytes; the base64
//! and URI forms are reached by letting the base64 transformer peel its
//! layer first. Decompression is expensive, so the decode sequence is lazy:
//! a variant is only attempted when the consumer actually pulls on it.

use super::{ByteSeq, Transformer};

/// LZ-String wire variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LzVariant {
    /// `compressToUint8Array`: code units as big-endian byte pairs.
    Bytes,
    /// Raw `compress` output code units, rendered UTF-16LE.
    Ucs2,
    /// `compressToUTF16`, rendered UTF-8.
    Utf16,
    /// `compressToBase64`.
    Base64,
    /// `compressToEncodedURIComponent`.
    Uri,
}

impl LzVariant {
    pub const ALL: [LzVariant; 5] = [
        LzVariant::Bytes,
        LzVariant::Ucs2,
        LzVariant::Utf16,
        LzVariant::Base64,
        LzVariant::Uri,
    ];
}

/// The `lz-string` transformer.
pub struct LzStringTransform {
    variants: Vec<LzVariant>,
}

impl Default for LzStringTransform {
    fn default() -> Self {
        LzStringTransform { variants: LzVariant::ALL.to_vec() }
    }
}

impl LzStringTransform {
    /// `variants` must be non-empty.
    pub fn new(variants: Vec<LzVariant>) -> Self {
        assert!(!variants.is_empty(), "at least one LZ-String variant required");
        LzStringTransform { variants }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Interpretations and renderings
// ─────────────────────────────────────────────────────────────────────────────

/// Input readings to compress: the text interpretation (the UTF-8 rendering,
/// when valid) and the byte interpretation (each byte widened to a code
/// point, so every reading is a plain string). Identical for pure-ASCII
/// input, in which case only one is kept.
fn interpretations(value: &[u8]) -> Vec<String> {
    let widened: String = value.iter().map(|&b| b as char).collect();
    if let Ok(text) = std::str::from_utf8(value) {
        if text != widened {
            return vec![text.to_owned(), widened];
        }
    }
    vec![widened]
}

fn compress_variant(input: &str, variant: LzVariant) -> Vec<u8> {
    match variant {
        LzVariant::Bytes => lz_str::compress_to_uint8_array(input),
        LzVariant::Ucs2 => {
            lz_str::compress(input).into_iter().flat_map(u16::to_le_bytes).collect()
        }
        LzVariant::Utf16 => lz_str::compress_to_utf16(input).into_bytes(),
        LzVariant::Base64 => lz_str::compress_to_base64(input).into_bytes(),
        LzVariant::Uri => lz_str::compress_to_encoded_uri_component(input).into_bytes(),
    }
}

fn decompress_variant(haystack: &[u8], variant: LzVariant) -> Option<Vec<u16>> {
    match variant {
        LzVariant::Bytes => {
            // A trailing zero byte is easily lost in transit; restore even
            // length before decompressing.
            let mut buf = haystack.to_vec();
            if buf.len() % 2 == 1 {
                buf.push(0);
            }
            lz_str::decompress_from_uint8_array(&buf)
        }
        LzVariant::Ucs2 => {
            let units: Vec<u16> =
                haystack.chunks_exact(2).map(|p| u16::from_le_bytes([p[0], p[1]])).collect();
            lz_str::decompress(&units[..])
        }
        LzVariant::Utf16 => {
            let text = std::str::from_utf8(haystack).ok()?;
            lz_str::decompress_from_utf16(text)
        }
        // Reached through the base64 transformer, never directly.
        LzVariant::Base64 | LzVariant::Uri => None,
    }
}

/// UTF-8 and latin-1 (low byte) renderings of decompressed code units.
fn renderings(units: &[u16]) -> Vec<Vec<u8>> {
    let latin1: Vec<u8> = units.iter().map(|&u| u as u8).collect();
    let mut out = Vec::with_capacity(2);
    if let Ok(text) = String::from_utf16(units) {
        let utf8 = text.into_bytes();
        if utf8 != latin1 {
            out.push(utf8);
        }
    }
    out.push(latin1);
    out
}

impl Transformer for LzStringTransform {
    fn id(&self) -> &str {
        "lz-string"
    }

    fn encodes(&self) -> bool {
        true
    }

    fn decodes(&self) -> bool {
        true
    }

    fn encodings<'a>(&'a self, value: &'a [u8]) -> ByteSeq<'a> {
        let interps = interpretations(value);
        let mut jobs: Vec<(String, LzVariant)> = Vec::new();
        for interp in interps {
            for &variant in &self.variants {
                jobs.push((interp.clone(), variant));
            }
        }
        Box::new(jobs.into_iter().map(|(input, variant)| compress_variant(&input, variant)))
    }

    fn extract_decode<'a>(&'a self, haystack: &'a [u8], min_len: usize) -> ByteSeq<'a> {
        if haystack.len() < min_len {
            return super::empty_seq();
        }
        Box::new(
            self.variants
                .iter()
                .copied()
                .filter(|v| matches!(v, LzVariant::Bytes | LzVariant::Ucs2 | LzVariant::Utf16))
                .flat_map(move |variant| {
                    decompress_variant(haystack, variant)
                        .map(|units| renderings(&units))
                        .unwrap_or_default()
                }),
        )
    }

    /// Shortest output across interpretations and configured variants.
    fn compressed_length(&self, value: &[u8]) -> Option<usize> {
        interpretations(value)
            .iter()
            .flat_map(|input| {
                self.variants.iter().map(move |&v| compress_variant(input, v).len())
            })
            .min()
    }
}
