//! Generic compression codec: gzip, zlib, raw DEFLATE and Brotli.
//!
//! Decoding sniffs the stream header and attempts formats from cheapest to
//! most speculative, yielding the single decompressed buffer of the first
//! attempt that succeeds. Encoding additionally rewrites the gzip OS byte so
//! fixtures captured on any platform compare equal.

use std::io::Read;
use std::io::Write;

use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use flate2::write::{DeflateEncoder, GzEncoder, ZlibEncoder};
use flate2::Compression;

use super::{ByteSeq, Transformer};

/// Offset of the OS byte in a gzip member header (RFC 1952 §2.3).
const GZIP_OS_OFFSET: usize = 9;

/// OS byte values observed in the wild for the same logical stream.
const GZIP_OS_VARIANTS: [u8; 3] = [10, 3, 7]; // Windows, Unix, macOS

/// Supported compression formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressFormat {
    Gzip,
    /// zlib-wrapped DEFLATE.
    Deflate,
    /// Headerless DEFLATE.
    DeflateRaw,
    Brotli,
}

impl CompressFormat {
    pub const ALL: [CompressFormat; 4] = [
        CompressFormat::Gzip,
        CompressFormat::Deflate,
        CompressFormat::DeflateRaw,
        CompressFormat::Brotli,
    ];
}

/// The `compress` transformer.
pub struct CompressTransform {
    formats: Vec<CompressFormat>,
}

impl Default for CompressTransform {
    fn default() -> Self {
        CompressTransform { formats: CompressFormat::ALL.to_vec() }
    }
}

impl CompressTransform {
    /// `formats` must be non-empty.
    pub fn new(formats: Vec<CompressFormat>) -> Self {
        assert!(!formats.is_empty(), "at least one compression format required");
        CompressTransform { formats }
    }

    fn has(&self, format: CompressFormat) -> bool {
        self.formats.contains(&format)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// One-shot compress / decompress helpers
// ─────────────────────────────────────────────────────────────────────────────

fn compress_one(value: &[u8], format: CompressFormat) -> Option<Vec<u8>> {
    match format {
        CompressFormat::Gzip => {
            let mut enc = GzEncoder::new(Vec::new(), Compression::default());
            enc.write_all(value).ok()?;
            enc.finish().ok()
        }
        CompressFormat::Deflate => {
            let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
            enc.write_all(value).ok()?;
            enc.finish().ok()
        }
        CompressFormat::DeflateRaw => {
            let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
            enc.write_all(value).ok()?;
            enc.finish().ok()
        }
        CompressFormat::Brotli => {
            let mut out = Vec::new();
            let params = brotli::enc::BrotliEncoderParams::default();
            brotli::BrotliCompress(&mut &value[..], &mut out, &params).ok()?;
            Some(out)
        }
    }
}

fn gunzip(h: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(h).read_to_end(&mut out).ok()?;
    Some(out)
}

fn inflate_zlib(h: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(h).read_to_end(&mut out).ok()?;
    Some(out)
}

fn inflate_raw(h: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    DeflateDecoder::new(h).read_to_end(&mut out).ok()?;
    Some(out)
}

fn unbrotli(h: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    brotli::BrotliDecompress(&mut &h[..], &mut out).ok()?;
    Some(out)
}

/// Header-sniffed decode: gzip/zlib first when the header says so, then raw
/// DEFLATE unless the first byte announces a reserved block type, then
/// Brotli. A failed attempt falls through to the next applicable format.
fn sniff_decode(h: &[u8], t: &CompressTransform) -> Option<Vec<u8>> {
    if h.len() < 2 {
        return None;
    }
    let looks_gzip = h[0] == 0x1F && h[1] == 0x8B;
    let looks_zlib = u16::from_be_bytes([h[0], h[1]]) % 31 == 0;
    if looks_gzip && t.has(CompressFormat::Gzip) {
        if let Some(out) = gunzip(h) {
            return Some(out);
        }
    } else if looks_zlib && t.has(CompressFormat::Deflate) {
        if let Some(out) = inflate_zlib(h) {
            return Some(out);
        }
    }
    // 0b110 = final-bit clear + reserved block type: cannot be DEFLATE.
    if t.has(CompressFormat::DeflateRaw) && h[0] & 0b111 != 0b110 {
        if let Some(out) = inflate_raw(h) {
            return Some(out);
        }
    }
    if t.has(CompressFormat::Brotli) {
        if let Some(out) = unbrotli(h) {
            return Some(out);
        }
    }
    None
}

impl Transformer for CompressTransform {
    fn id(&self) -> &str {
        "compress"
    }

    fn encodes(&self) -> bool {
        true
    }

    fn decodes(&self) -> bool {
        true
    }

    fn encodings<'a>(&'a self, value: &'a [u8]) -> ByteSeq<'a> {
        Box::new(self.formats.iter().flat_map(move |&format| {
            let mut variants: Vec<Vec<u8>> = Vec::new();
            if let Some(base) = compress_one(value, format) {
                if format == CompressFormat::Gzip && base.len() > GZIP_OS_OFFSET {
                    for os in GZIP_OS_VARIANTS {
                        let mut patched = base.clone();
                        patched[GZIP_OS_OFFSET] = os;
                        variants.push(patched);
                    }
                }
                variants.insert(0, base);
            }
            variants
        }))
    }

    fn extract_decode<'a>(&'a self, haystack: &'a [u8], min_len: usize) -> ByteSeq<'a> {
        if haystack.len() < min_len {
            return super::empty_seq();
        }
        Box::new(std::iter::once_with(move || sniff_decode(haystack, self)).flatten())
    }

    /// Minimum compressed size across the enabled formats.
    fn compressed_length(&self, value: &[u8]) -> Option<usize> {
        self.formats
            .iter()
            .filter_map(|&format| compress_one(value, format).map(|out| out.len()))
            .min()
    }
}
