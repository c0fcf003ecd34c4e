//! multipart/form-data part extraction (decode-only).
//!
//! The decoder sniffs the first line for a dash-boundary per the RFC 2046
//! grammar, then walks the delimiter structure and yields each part's raw
//! content bytes. Line endings must be CRLF; LF-only bodies are rejected
//! outright. Any mid-parse irregularity truncates the yielded sequence
//! silently; the parts already extracted are still reported.

use memchr::memmem;

use super::{ByteSeq, Transformer};

/// Longest boundary RFC 2046 permits.
const MAX_BOUNDARY_LEN: usize = 70;

/// The `form-data` transformer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormDataTransform;

impl FormDataTransform {
    pub fn new() -> Self {
        FormDataTransform
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Boundary grammar
// ─────────────────────────────────────────────────────────────────────────────

/// `bcharsnospace` from RFC 2046 §5.1.1.
fn is_bchar_nospace(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'\'' | b'(' | b')' | b'+' | b'_' | b',' | b'-' | b'.' | b'/' | b':' | b'=' | b'?')
}

/// Parse a dash-boundary line (`--boundary` + optional transport padding),
/// returning the boundary bytes.
fn boundary_of_line(line: &[u8]) -> Option<&[u8]> {
    let rest = line.strip_prefix(b"--")?;
    // Trailing spaces/tabs after the boundary are transport padding.
    let mut end = rest.len();
    while end > 0 && (rest[end - 1] == b' ' || rest[end - 1] == b'\t') {
        end -= 1;
    }
    let boundary = &rest[..end];
    if boundary.is_empty() || boundary.len() > MAX_BOUNDARY_LEN {
        return None;
    }
    // Inner spaces are legal, a trailing space is not; every other byte must
    // be a bchar.
    if boundary.last() == Some(&b' ') {
        return None;
    }
    if !boundary.iter().all(|&b| b == b' ' || is_bchar_nospace(b)) {
        return None;
    }
    Some(boundary)
}

// ─────────────────────────────────────────────────────────────────────────────
// Part walking
// ─────────────────────────────────────────────────────────────────────────────

/// Split one part into headers and content; `None` aborts the parse.
fn content_of_part(part: &[u8]) -> Option<Vec<u8>> {
    let header_end = memmem::find(part, b"\r\n\r\n")?;
    let mut saw_disposition = false;
    for line in part[..header_end].split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let colon = memchr::memchr(b':', line)?;
        let name = &line[..colon];
        let value = &line[colon + 1..];
        if name.eq_ignore_ascii_case(b"content-disposition") {
            saw_disposition = true;
        }
        if name.eq_ignore_ascii_case(b"content-transfer-encoding") {
            let value = String::from_utf8_lossy(value);
            if value.trim().eq_ignore_ascii_case("quoted-printable") {
                // Not supported; treat like any other parse failure.
                return None;
            }
        }
    }
    if !saw_disposition {
        return None;
    }
    Some(part[header_end + 4..].to_vec())
}

/// Extract every field/file content from a multipart body, stopping silently
/// at the first irregularity.
fn parse_multipart(body: &[u8]) -> Vec<Vec<u8>> {
    let mut parts = Vec::new();

    // First line carries the dash-boundary and must end with CRLF.
    let Some(nl) = memchr::memchr(b'\n', body) else {
        return parts;
    };
    if nl == 0 || body[nl - 1] != b'\r' {
        return parts;
    }
    let Some(boundary) = boundary_of_line(&body[..nl - 1]) else {
        return parts;
    };

    let mut delimiter = Vec::with_capacity(4 + boundary.len());
    delimiter.extend_from_slice(b"\r\n--");
    delimiter.extend_from_slice(boundary);
    let finder = memmem::Finder::new(&delimiter);

    let mut pos = nl + 1;
    loop {
        let Some(hit) = finder.find(&body[pos..]) else {
            // Close delimiter never arrived; keep what we have.
            return parts;
        };
        let part = &body[pos..pos + hit];
        match content_of_part(part) {
            Some(content) => parts.push(content),
            None => return parts,
        }

        // After the delimiter: either the closing `--`, or transport padding
        // and CRLF before the next part.
        let mut next = pos + hit + delimiter.len();
        if body[next..].starts_with(b"--") {
            return parts;
        }
        while body.get(next).is_some_and(|&b| b == b' ' || b == b'\t') {
            next += 1;
        }
        if !body[next..].starts_with(b"\r\n") {
            return parts;
        }
        pos = next + 2;
    }
}

impl Transformer for FormDataTransform {
    fn id(&self) -> &str {
        "form-data"
    }

    fn decodes(&self) -> bool {
        true
    }

    fn extract_decode<'a>(&'a self, haystack: &'a [u8], min_len: usize) -> ByteSeq<'a> {
        if haystack.len() < min_len {
            return super::empty_seq();
        }
        Box::new(parse_multipart(haystack).into_iter())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
