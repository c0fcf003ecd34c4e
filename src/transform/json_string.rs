//! JSON string literal extraction (decode-only).
//!
//! Matches balanced `"…"` substrings under the JSON escape grammar and
//! unescapes them. There is no encoder: producing JSON documents is the
//! job of whatever emitted the haystack, not of the needle engine.

use regex::Regex;

use super::{ByteSeq, Transformer};

/// The `json-string` transformer.
pub struct JsonStringTransform {
    literal_re: Regex,
}

impl Default for JsonStringTransform {
    fn default() -> Self {
        // Unescaped control characters and bare quotes terminate a literal;
        // escapes are limited to the JSON set. The empty literal is valid.
        JsonStringTransform {
            literal_re: Regex::new(
                r#""(?:[^"\\\x00-\x1F]|\\(?:["\\/bfnrt]|u[0-9a-fA-F]{4}))*""#,
            )
            .expect("json string pattern must compile"),
        }
    }
}

impl JsonStringTransform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transformer for JsonStringTransform {
    fn id(&self) -> &str {
        "json-string"
    }

    fn decodes(&self) -> bool {
        true
    }

    fn extract_decode<'a>(&'a self, haystack: &'a [u8], min_len: usize) -> ByteSeq<'a> {
        let text = String::from_utf8_lossy(haystack).into_owned();
        let mut out: Vec<Vec<u8>> = Vec::new();
        for m in self.literal_re.find_iter(&text) {
            if m.as_str().len() < min_len {
                continue;
            }
            // serde_json re-validates (lone surrogates etc.) and unescapes.
            if let Ok(s) = serde_json::from_str::<String>(m.as_str()) {
                out.push(s.into_bytes());
            }
        }
        Box::new(out.into_iter())
    }
}
