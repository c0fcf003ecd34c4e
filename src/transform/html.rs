//! HTML entity codec.
//!
//! Encoding renders the five markup-significant characters as named
//! entities; a second variant keeps quotes literal, matching serializers
//! that only escape `& < >`. Decoding handles the full named and numeric
//! entity tables and always operates on the whole buffer, since entities
//! have no reliable substring delimiter to extract by.

use super::{ByteSeq, Transformer};

/// The `html-entities` transformer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEntitiesTransform;

impl HtmlEntitiesTransform {
    pub fn new() -> Self {
        HtmlEntitiesTransform
    }
}

fn encode_entities(text: &str) -> String {
    // '&' first so later replacements are not double-escaped.
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

impl Transformer for HtmlEntitiesTransform {
    fn id(&self) -> &str {
        "html-entities"
    }

    fn encodes(&self) -> bool {
        true
    }

    fn decodes(&self) -> bool {
        true
    }

    fn encodings<'a>(&'a self, value: &'a [u8]) -> ByteSeq<'a> {
        let Ok(text) = std::str::from_utf8(value) else {
            return super::empty_seq();
        };
        let full = encode_entities(text);
        let bare_quotes = full.replace("&quot;", "\"").replace("&apos;", "'");
        let mut variants = vec![full.into_bytes()];
        let bare_quotes = bare_quotes.into_bytes();
        if bare_quotes != variants[0] {
            variants.push(bare_quotes);
        }
        Box::new(variants.into_iter())
    }

    fn extract_decode<'a>(&'a self, haystack: &'a [u8], min_len: usize) -> ByteSeq<'a> {
        if haystack.len() < min_len {
            return super::empty_seq();
        }
        let Ok(text) = std::str::from_utf8(haystack) else {
            return super::empty_seq();
        };
        let decoded = html_escape::decode_html_entities(text);
        // Unchanged output means there was nothing entity-encoded here.
        if decoded.as_bytes() == haystack {
            return super::empty_seq();
        }
        Box::new(std::iter::once(decoded.into_owned().into_bytes()))
    }
}
