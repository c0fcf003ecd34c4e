// multipart/form-data extraction: RFC 2046 boundary grammar, CRLF
// requirements, header policy, and field/file content recovery.

use leakseek::{FormDataTransform, Transformer};

fn decode_all(haystack: &[u8]) -> Vec<Vec<u8>> {
    FormDataTransform::default().extract_decode(haystack, 0).collect()
}

/// Build a simple two-field body with CRLF line endings.
fn two_field_body(boundary: &str) -> Vec<u8> {
    let mut b = Vec::new();
    for (name, value) in [("email", "mail@example.com"), ("note", "hello there")] {
        b.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        b.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        b.extend_from_slice(value.as_bytes());
        b.extend_from_slice(b"\r\n");
    }
    b.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    b
}

// ─────────────────────────────────────────────────────────────────────────────
// Extraction
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn yields_every_field() {
    let hits = decode_all(&two_field_body("----geckoformboundary1234"));
    assert_eq!(hits, vec![b"mail@example.com".to_vec(), b"hello there".to_vec()]);
}

#[test]
fn yields_file_contents_raw() {
    let body = b"--bnd\r\n\
        Content-Disposition: form-data; name=\"upload\"; filename=\"x.bin\"\r\n\
        Content-Type: application/octet-stream\r\n\
        \r\n\
        \x00\x01\xFFbinary\r\n\
        --bnd--\r\n";
    assert_eq!(decode_all(body), vec![b"\x00\x01\xFFbinary".to_vec()]);
}

/// Part content may itself contain CRLF; only the delimiter ends it.
#[test]
fn multiline_content_is_kept_whole() {
    let body = b"--bnd\r\n\
        Content-Disposition: form-data; name=\"text\"\r\n\
        \r\n\
        line one\r\nline two\r\n\
        --bnd--\r\n";
    assert_eq!(decode_all(body), vec![b"line one\r\nline two".to_vec()]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Rejection and truncation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn lf_only_line_endings_are_rejected() {
    let body = b"--bnd\n\
        Content-Disposition: form-data; name=\"a\"\n\
        \n\
        data\n\
        --bnd--\n";
    assert!(decode_all(body).is_empty());
}

#[test]
fn invalid_boundary_characters_are_rejected() {
    // '[' is not a bchar.
    let body = b"--bad[boundary\r\n\
        Content-Disposition: form-data; name=\"a\"\r\n\r\ndata\r\n--bad[boundary--\r\n";
    assert!(decode_all(body).is_empty());
}

#[test]
fn missing_content_disposition_rejects_the_part() {
    let body = b"--bnd\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        data\r\n\
        --bnd--\r\n";
    assert!(decode_all(body).is_empty());
}

/// A mid-body failure keeps the parts already extracted.
#[test]
fn mid_parse_error_truncates_silently() {
    let mut body = Vec::new();
    body.extend_from_slice(b"--bnd\r\nContent-Disposition: form-data; name=\"ok\"\r\n\r\ngood\r\n");
    // Second part has no disposition header.
    body.extend_from_slice(b"--bnd\r\nContent-Type: text/plain\r\n\r\nbad\r\n--bnd--\r\n");
    assert_eq!(decode_all(&body), vec![b"good".to_vec()]);
}

#[test]
fn quoted_printable_parts_abort() {
    let body = b"--bnd\r\n\
        Content-Disposition: form-data; name=\"a\"\r\n\
        Content-Transfer-Encoding: quoted-printable\r\n\
        \r\n\
        data=3D1\r\n\
        --bnd--\r\n";
    assert!(decode_all(body).is_empty());
}

#[test]
fn non_multipart_bodies_yield_nothing() {
    assert!(decode_all(b"ordinary text\r\nmore text\r\n").is_empty());
    assert!(decode_all(b"").is_empty());
    assert!(decode_all(b"key=value&other=thing").is_empty());
}
