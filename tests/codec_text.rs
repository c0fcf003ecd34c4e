// Textual codec behavior: hex casing rules, URI component extraction,
// JSON string literals, HTML entities.

use leakseek::{
    HexCase, HexTransform, HtmlEntitiesTransform, JsonStringTransform, Transformer, UriTransform,
};

fn decode_all<T: Transformer>(t: &T, haystack: &[u8]) -> Vec<Vec<u8>> {
    t.extract_decode(haystack, 0).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Hex
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn hex_round_trips_both_cases() {
    let t = HexTransform::default();
    let value = [0xDE, 0xAD, 0xBE, 0xEF, 0x01];
    for encoded in t.encodings(&value) {
        assert!(decode_all(&t, &encoded).contains(&value.to_vec()));
    }
}

/// Casing cannot mix within a single match.
#[test]
fn hex_mixed_case_is_ignored() {
    let t = HexTransform::default();
    assert!(decode_all(&t, b"sid=DeAdBeEf;").is_empty());
}

#[test]
fn hex_respects_min_len() {
    let t = HexTransform::default();
    let hits: Vec<Vec<u8>> = t.extract_decode(b"aabb ccddeeff00112233", 10).collect();
    assert_eq!(hits, vec![vec![0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11, 0x22, 0x33]]);
}

#[test]
fn hex_single_case_configuration() {
    let t = HexTransform::new(vec![HexCase::Upper]);
    assert!(decode_all(&t, b"cafebabe").is_empty());
    assert_eq!(decode_all(&t, b"CAFEBABE"), vec![vec![0xCA, 0xFE, 0xBA, 0xBE]]);
}

// ─────────────────────────────────────────────────────────────────────────────
// URI component
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn uri_round_trips_both_variants() {
    let t = UriTransform::default();
    let value = b"some value! with spaces";
    for encoded in t.encodings(value) {
        assert!(decode_all(&t, &encoded).contains(&value.to_vec()));
    }
}

/// `+` inside a hit means space, per form encoding.
#[test]
fn uri_plus_is_space() {
    let t = UriTransform::default();
    assert!(decode_all(&t, b"q=hello+world%21&lang=en")
        .contains(&b"hello world!".to_vec()));
}

#[test]
fn uri_stops_at_separators() {
    let t = UriTransform::default();
    let hits = decode_all(&t, b"a%41b&c%42d");
    assert!(hits.contains(&b"aAb".to_vec()));
    assert!(hits.contains(&b"cBd".to_vec()));
    // Never the two joined across '&'.
    assert!(!hits.iter().any(|h| h.windows(3).any(|w| w == b"b&c")));
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON string
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn json_string_is_decode_only() {
    let t = JsonStringTransform::default();
    assert!(!t.encodes());
    assert_eq!(t.encodings(b"x").count(), 0);
}

#[test]
fn json_empty_string_is_accepted() {
    let t = JsonStringTransform::default();
    assert!(decode_all(&t, br#"{"empty":""}"#).contains(&Vec::new()));
}

/// Escaped quotes stay balanced across neighboring literals.
#[test]
fn json_nested_escaped_quotes() {
    let t = JsonStringTransform::default();
    let hits = decode_all(&t, br#"["a","","b","\"","c"]"#);
    for expected in [&b"a"[..], b"b", b"\"", b"c"] {
        assert!(hits.contains(&expected.to_vec()), "missing {:?}", expected);
    }
}

#[test]
fn json_escaped_payload_is_unescaped() {
    let t = JsonStringTransform::default();
    let hits = decode_all(&t, br#"{"v":"line1\nline2\t\"q\""}"#);
    assert!(hits.contains(&b"line1\nline2\t\"q\"".to_vec()));
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML entities
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn html_round_trips_within_domain() {
    let t = HtmlEntitiesTransform::default();
    let value = br#"<a href="x">&'q'</a>"#;
    for encoded in t.encodings(value) {
        assert!(decode_all(&t, &encoded).contains(&value.to_vec()));
    }
}

#[test]
fn html_decodes_the_whole_buffer_once() {
    let t = HtmlEntitiesTransform::default();
    let hits = decode_all(&t, b"Tom &amp; Jerry &lt;3");
    assert_eq!(hits, vec![b"Tom & Jerry <3".to_vec()]);
}
