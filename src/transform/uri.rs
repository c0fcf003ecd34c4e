//! URI percent-encoding codec.
//!
//! Encoding covers the `encodeURIComponent` character set plus the
//! form-encoded variant where spaces become `+`. Decoding extracts runs of
//! URL-unit characters (minus the `/&=?` separators) that contain at least
//! one escape, so plain words are never reported as candidates.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

use super::{ByteSeq, Transformer};

/// Everything `encodeURIComponent` escapes: non-alphanumerics except
/// `- _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The `uri` transformer.
pub struct UriTransform {
    token_re: Regex,
}

impl Default for UriTransform {
    fn default() -> Self {
        // URL code points a component may contain, excluding the `/&=?`
        // separators that end a component in practice.
        UriTransform {
            token_re: Regex::new(r"[A-Za-z0-9!$'()*+,\-.:;@_~%]+")
                .expect("uri token pattern must compile"),
        }
    }
}

impl UriTransform {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Every `%` must introduce a two-digit hex escape for the token to decode.
fn escapes_are_wellformed(token: &str) -> bool {
    let bytes = token.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len()
                || !bytes[i + 1].is_ascii_hexdigit()
                || !bytes[i + 2].is_ascii_hexdigit()
            {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

impl Transformer for UriTransform {
    fn id(&self) -> &str {
        "uri"
    }

    fn encodes(&self) -> bool {
        true
    }

    fn decodes(&self) -> bool {
        true
    }

    fn encodings<'a>(&'a self, value: &'a [u8]) -> ByteSeq<'a> {
        // Percent-encoding operates on the UTF-8 rendering; arbitrary binary
        // input has no such rendering and yields nothing.
        let Ok(text) = std::str::from_utf8(value) else {
            return super::empty_seq();
        };
        let encoded = utf8_percent_encode(text, COMPONENT).to_string();
        let form = encoded.replace("%20", "+");
        let mut variants = vec![encoded.into_bytes()];
        let form = form.into_bytes();
        if form != variants[0] {
            variants.push(form);
        }
        Box::new(variants.into_iter())
    }

    fn extract_decode<'a>(&'a self, haystack: &'a [u8], min_len: usize) -> ByteSeq<'a> {
        let text = String::from_utf8_lossy(haystack).into_owned();
        let mut out: Vec<Vec<u8>> = Vec::new();
        for m in self.token_re.find_iter(&text) {
            let token = m.as_str();
            if token.len() < min_len {
                continue;
            }
            // A hit must actually be encoded; bare words stay untouched.
            if !token.contains('%') && !token.contains('+') {
                continue;
            }
            if !escapes_are_wellformed(token) {
                continue;
            }
            let spaced = token.replace('+', "%20");
            let decoded: Vec<u8> = percent_decode_str(&spaced).collect();
            out.push(decoded);
        }
        Box::new(out.into_iter())
    }
}
