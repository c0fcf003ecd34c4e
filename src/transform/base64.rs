//! Dialect-aware base64 codec.
//!
//! A dialect is the choice of the two non-alphanumeric digits plus an
//! optional padding character. Encoding emits one buffer per configured
//! dialect; decoding scans the haystack for maximal digit runs with a
//! lookaround regex per dialect, repairs non-byte-aligned tails, and decodes
//! with a permissive engine. The tail repair preserves low bits that a
//! truncated encoding would otherwise drop, which matters for LZ-String
//! base64 output.

use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::{alphabet, Engine};
use fancy_regex::Regex;

use super::{ByteSeq, Transformer};

// ─────────────────────────────────────────────────────────────────────────────
// Dialects
// ─────────────────────────────────────────────────────────────────────────────

/// Digits 62/63 and optional padding of a base64 dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Base64Dialect {
    pub digit62: char,
    pub digit63: char,
    pub padding: Option<char>,
}

impl Base64Dialect {
    /// RFC 4648 §4 with padding.
    pub const STANDARD: Base64Dialect =
        Base64Dialect { digit62: '+', digit63: '/', padding: Some('=') };
    /// RFC 4648 §4 without padding.
    pub const STANDARD_UNPADDED: Base64Dialect =
        Base64Dialect { digit62: '+', digit63: '/', padding: None };
    /// RFC 4648 §5 (URL-safe), unpadded.
    pub const URL_SAFE: Base64Dialect =
        Base64Dialect { digit62: '-', digit63: '_', padding: None };
    /// The alphabet LZ-String uses for `compressToEncodedURIComponent`.
    pub const LZ_STRING_URI: Base64Dialect =
        Base64Dialect { digit62: '+', digit63: '-', padding: None };

    fn has_standard_digits(self) -> bool {
        self.digit62 == '+' && self.digit63 == '/'
    }

    fn has_url_safe_digits(self) -> bool {
        self.digit62 == '-' && self.digit63 == '_'
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Permissive decode engines
// ─────────────────────────────────────────────────────────────────────────────
//
// Tokens reach the engine with padding already stripped and tails already
// repaired, so the engine must accept unpadded input of any residue and must
// not second-guess trailing bits.

const PERMISSIVE: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

static STD_PERMISSIVE: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, PERMISSIVE);
static URL_PERMISSIVE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, PERMISSIVE);

// ─────────────────────────────────────────────────────────────────────────────
// Transform
// ─────────────────────────────────────────────────────────────────────────────

struct DialectMatcher {
    dialect: Base64Dialect,
    token_re: Regex,
}

/// The `base64` transformer.
pub struct Base64Transform {
    dialects: Vec<Base64Dialect>,
    matchers: Vec<DialectMatcher>,
    try_skip_start: bool,
}

impl Default for Base64Transform {
    fn default() -> Self {
        Base64Transform::new(vec![
            Base64Dialect::STANDARD,
            Base64Dialect::STANDARD_UNPADDED,
            Base64Dialect::URL_SAFE,
            Base64Dialect::LZ_STRING_URI,
        ])
    }
}

impl Base64Transform {
    pub fn new(dialects: Vec<Base64Dialect>) -> Self {
        Self::build(dialects, false)
    }

    /// Additionally try decoding each token with its first 1..=3 characters
    /// skipped, to catch values embedded in a base64 stream at a non-aligned
    /// byte offset. Substantially inflates search cost, hence opt-in.
    ///
    /// Skipping is only sound without padding, which pins the tail to the
    /// original alignment; panics when a padded dialect is supplied.
    pub fn with_skip_start(dialects: Vec<Base64Dialect>) -> Self {
        Self::build(dialects, true)
    }

    fn build(dialects: Vec<Base64Dialect>, try_skip_start: bool) -> Self {
        if try_skip_start {
            assert!(
                dialects.iter().all(|d| d.padding.is_none()),
                "skip-start mode requires unpadded dialects"
            );
        }
        let mut matchers = Vec::new();
        for &d in &dialects {
            // A padded dialect is redundant for matching when the same digit
            // pair is configured unpadded: the unpadded run regex already
            // covers the digits of every padded token.
            if d.padding.is_some()
                && dialects.iter().any(|o| {
                    o.padding.is_none() && o.digit62 == d.digit62 && o.digit63 == d.digit63
                })
            {
                continue;
            }
            matchers.push(DialectMatcher { dialect: d, token_re: token_regex(d) });
        }
        Base64Transform { dialects, matchers, try_skip_start }
    }
}

/// Escape `c` for use inside a regex character class.
fn class_escape(c: char) -> String {
    match c {
        '\\' | ']' | '^' | '-' | '[' => format!("\\{c}"),
        _ => c.to_string(),
    }
}

fn token_regex(d: Base64Dialect) -> Regex {
    let digits = format!("A-Za-z0-9{}{}", class_escape(d.digit62), class_escape(d.digit63));
    let pattern = match d.padding {
        Some(p) => {
            let pad = regex::escape(&p.to_string());
            let pad_cls = class_escape(p);
            format!(
                "(?<![{digits}])(?:[{digits}]{{4}})*(?:[{digits}]{{4}}|[{digits}]{{3}}{pad}|[{digits}]{{2}}{pad}{{2}}|[{digits}]{pad}{{3}})(?![{digits}{pad_cls}])"
            )
        }
        None => format!("(?<![{digits}])[{digits}]+(?![{digits}])"),
    };
    Regex::new(&pattern).expect("base64 token pattern must compile")
}

/// Value of a single base64 digit in the standard or URL-safe alphabet.
fn digit_value(c: char, url_safe: bool) -> Option<u8> {
    let v = match c {
        'A'..='Z' => c as u8 - b'A',
        'a'..='z' => c as u8 - b'a' + 26,
        '0'..='9' => c as u8 - b'0' + 52,
        '+' if !url_safe => 62,
        '/' if !url_safe => 63,
        '-' if url_safe => 62,
        '_' if url_safe => 63,
        _ => return None,
    };
    Some(v)
}

/// Decode an unpadded token, repairing a non-byte-aligned tail first.
///
/// When the token length is not a multiple of four, `(len * 6) mod 8` low
/// bits of the final digit would be dropped by a plain decode. If any of
/// them are set, or the residue is one digit (which no decoder accepts), an
/// all-zero digit is appended so the dropped bits survive into an extra
/// output byte.
fn decode_token(token: &str, url_safe: bool) -> Option<Vec<u8>> {
    if token.is_empty() {
        return None;
    }
    let mut repaired = token.to_owned();
    if repaired.len() % 4 != 0 {
        let bits_dropped = (repaired.len() * 6) % 8;
        let last = repaired.chars().next_back()?;
        let digit = digit_value(last, url_safe)?;
        let mask = (1u8 << bits_dropped) - 1;
        if repaired.len() % 4 == 1 || digit & mask != 0 {
            repaired.push('A');
        }
    }
    let engine: &GeneralPurpose = if url_safe { &URL_PERMISSIVE } else { &STD_PERMISSIVE };
    engine.decode(repaired.as_bytes()).ok()
}

/// Rewrite canonical padded standard output into `d`'s alphabet.
fn apply_dialect(canonical: &str, d: Base64Dialect) -> String {
    canonical
        .chars()
        .filter_map(|c| match c {
            '+' => Some(d.digit62),
            '/' => Some(d.digit63),
            '=' => d.padding,
            other => Some(other),
        })
        .collect()
}

impl Transformer for Base64Transform {
    fn id(&self) -> &str {
        "base64"
    }

    fn encodes(&self) -> bool {
        true
    }

    fn decodes(&self) -> bool {
        true
    }

    fn encodings<'a>(&'a self, value: &'a [u8]) -> ByteSeq<'a> {
        let canonical = base64::engine::general_purpose::STANDARD.encode(value);
        Box::new(
            self.dialects
                .iter()
                .map(move |&d| apply_dialect(&canonical, d).into_bytes()),
        )
    }

    fn extract_decode<'a>(&'a self, haystack: &'a [u8], min_len: usize) -> ByteSeq<'a> {
        // Base64 payloads are frequently line-wrapped; normalize by dropping
        // CR/LF so wrapped tokens match as one run.
        let text: String = String::from_utf8_lossy(haystack)
            .chars()
            .filter(|&c| c != '\r' && c != '\n')
            .collect();

        let mut tokens: Vec<(String, bool)> = Vec::new();
        for m in &self.matchers {
            let url_safe = m.dialect.has_url_safe_digits();
            for mat in m.token_re.find_iter(&text).flatten() {
                let raw = mat.as_str();
                if raw.len() < min_len {
                    continue;
                }
                let stripped = match m.dialect.padding {
                    Some(p) => raw.trim_end_matches(p),
                    None => raw,
                };
                let token: String =
                    if m.dialect.has_standard_digits() || m.dialect.has_url_safe_digits() {
                        stripped.to_owned()
                    } else {
                        stripped
                            .chars()
                            .map(|c| {
                                if c == m.dialect.digit62 {
                                    '+'
                                } else if c == m.dialect.digit63 {
                                    '/'
                                } else {
                                    c
                                }
                            })
                            .collect()
                    };
                // The constructor guarantees skip-start only coexists with
                // unpadded dialects.
                let max_skip = if self.try_skip_start {
                    token.len().saturating_sub(1).min(3)
                } else {
                    0
                };
                for skip in 0..=max_skip {
                    tokens.push((token[skip..].to_owned(), url_safe));
                }
            }
        }
        Box::new(tokens.into_iter().filter_map(|(tok, url_safe)| decode_token(&tok, url_safe)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
