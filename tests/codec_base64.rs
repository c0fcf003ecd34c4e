// Base64 codec behavior: dialect handling, token extraction, padding, the
// non-byte-aligned tail repair, CR/LF normalization, and the opt-in
// skip-start mode for mid-stream values.

use leakseek::{Base64Dialect, Base64Transform, Transformer};

fn decode_all(t: &Base64Transform, haystack: &[u8]) -> Vec<Vec<u8>> {
    t.extract_decode(haystack, 0).collect()
}

fn standard_only() -> Base64Transform {
    Base64Transform::new(vec![Base64Dialect::STANDARD])
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoding: one buffer per dialect
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn encodes_every_dialect() {
    let t = Base64Transform::default();
    let out: Vec<Vec<u8>> = t.encodings(&[0xFF, 0xFF, 0xFE]).collect();
    // standard "///+" with padding rules: 3 bytes -> 4 digits, no padding.
    assert_eq!(out[0], b"///+".to_vec());
    assert_eq!(out[1], b"///+".to_vec()); // unpadded, same digits here
    assert_eq!(out[2], b"___-".to_vec()); // url-safe
    assert_eq!(out[3], b"---+".to_vec()); // lz-string-uri: / -> -, + stays
}

#[test]
fn padding_present_only_in_padded_dialects() {
    let t = Base64Transform::default();
    let out: Vec<Vec<u8>> = t.encodings(b"first").collect();
    assert_eq!(out[0], b"Zmlyc3Q=".to_vec());
    assert_eq!(out[1], b"Zmlyc3Q".to_vec());
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding edge cases (standard padded dialect)
// ─────────────────────────────────────────────────────────────────────────────

/// A lone digit is not a padded-form token.
#[test]
fn lone_slash_yields_nothing_under_standard() {
    assert!(decode_all(&standard_only(), b"/").is_empty());
}

/// "A===" survives padding-strip as a single all-zero digit.
#[test]
fn a_with_three_pads_decodes_to_zero_byte() {
    assert_eq!(decode_all(&standard_only(), b"A==="), vec![vec![0x00]]);
}

/// "/===" keeps the six set bits of '/' in one output byte.
#[test]
fn slash_with_three_pads_decodes_to_fc() {
    assert_eq!(decode_all(&standard_only(), b"/==="), vec![vec![0xFC]]);
}

#[test]
fn canonical_padded_token_decodes() {
    assert_eq!(decode_all(&standard_only(), b"x: Zmlyc3Q= (q)"), vec![b"first".to_vec()]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Default stack decoding
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unpadded_token_decodes_with_tail_intact() {
    let t = Base64Transform::default();
    assert!(decode_all(&t, b"Zmlyc3Q").contains(&b"first".to_vec()));
}

#[test]
fn url_safe_token_decodes() {
    let t = Base64Transform::default();
    assert!(decode_all(&t, b"___-").contains(&vec![0xFF, 0xFF, 0xFE]));
}

#[test]
fn lz_string_uri_digits_are_remapped() {
    let t = Base64Transform::default();
    // "----" under the (+,-) dialect is "////" standard: three 0xFF bytes.
    assert!(decode_all(&t, b"----").contains(&vec![0xFF, 0xFF, 0xFF]));
}

#[test]
fn crlf_line_wrapping_is_normalized() {
    let t = Base64Transform::default();
    assert!(decode_all(&t, b"Zmly\r\nc3Q=").contains(&b"first".to_vec()));
}

/// Every dialect's encoding must round-trip through extraction.
#[test]
fn dialect_round_trips() {
    let t = Base64Transform::default();
    for value in [&b"first"[..], &[0xFB, 0xEF, 0xBE], &[0xFF, 0x00, 0x10, 0x88]] {
        for encoded in t.encodings(value) {
            let decoded = decode_all(&t, &encoded);
            assert!(
                decoded.contains(&value.to_vec()),
                "{:?} must round-trip via {:?}",
                value,
                String::from_utf8_lossy(&encoded)
            );
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Skip-start mode
// ─────────────────────────────────────────────────────────────────────────────

fn contains_subslice(buf: &[u8], wanted: &[u8]) -> bool {
    buf.windows(wanted.len()).any(|w| w == wanted)
}

/// A haystack holding only the tail of a base64 stream still reveals a value
/// once the token is re-aligned by skipping leading digits.
#[test]
fn skip_start_recovers_non_aligned_suffix() {
    use base64::Engine;
    let stream =
        base64::engine::general_purpose::STANDARD_NO_PAD.encode(b"0123456789value-here!!");
    // Cut mid-token so no skip count of zero can align it.
    let suffix = &stream[7..];

    let plain = Base64Transform::new(vec![Base64Dialect::STANDARD_UNPADDED]);
    assert!(
        !decode_all(&plain, suffix.as_bytes())
            .iter()
            .any(|d| contains_subslice(d, b"value-here")),
        "unaligned suffix must not decode without skip-start"
    );

    let skipping = Base64Transform::with_skip_start(vec![Base64Dialect::STANDARD_UNPADDED]);
    assert!(decode_all(&skipping, suffix.as_bytes())
        .iter()
        .any(|d| contains_subslice(d, b"value-here")));
}
