//! Hexadecimal codec with lowercase/uppercase variants.
//!
//! Casing never mixes within a single match: a run like `aBcd12` is not a
//! hex token in either variant. Odd-length runs are likewise never matched.

use regex::Regex;

use super::{ByteSeq, Transformer};

/// Casing of a hex rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexCase {
    Lower,
    Upper,
}

/// The `hex` transformer.
pub struct HexTransform {
    cases: Vec<HexCase>,
    lower_re: Regex,
    upper_re: Regex,
}

impl Default for HexTransform {
    fn default() -> Self {
        HexTransform::new(vec![HexCase::Lower, HexCase::Upper])
    }
}

impl HexTransform {
    /// `cases` must be non-empty.
    pub fn new(cases: Vec<HexCase>) -> Self {
        assert!(!cases.is_empty(), "at least one hex case variant required");
        HexTransform {
            cases,
            lower_re: Regex::new(r"\b(?:[a-f0-9]{2})+\b").expect("hex pattern must compile"),
            upper_re: Regex::new(r"\b(?:[A-F0-9]{2})+\b").expect("hex pattern must compile"),
        }
    }

}

impl Transformer for HexTransform {
    fn id(&self) -> &str {
        "hex"
    }

    fn encodes(&self) -> bool {
        true
    }

    fn decodes(&self) -> bool {
        true
    }

    fn encodings<'a>(&'a self, value: &'a [u8]) -> ByteSeq<'a> {
        Box::new(self.cases.iter().map(move |case| match case {
            HexCase::Lower => hex::encode(value).into_bytes(),
            HexCase::Upper => hex::encode_upper(value).into_bytes(),
        }))
    }

    fn extract_decode<'a>(&'a self, haystack: &'a [u8], min_len: usize) -> ByteSeq<'a> {
        let text = String::from_utf8_lossy(haystack).into_owned();
        let mut out: Vec<Vec<u8>> = Vec::new();
        for case in &self.cases {
            let re = match case {
                HexCase::Lower => &self.lower_re,
                HexCase::Upper => &self.upper_re,
            };
            for m in re.find_iter(&text) {
                let s = m.as_str();
                if s.len() < min_len {
                    continue;
                }
                // The pattern guarantees even length and uniform casing; a
                // digits-only run can reach this point through both variants
                // and the duplicate is harmless.
                if let Ok(bytes) = hex::decode(s) {
                    out.push(bytes);
                }
            }
        }
        Box::new(out.into_iter())
    }
}
