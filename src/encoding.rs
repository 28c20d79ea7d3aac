//! Character encoding detection and transcoding.
//!
//! Crawled payloads arrive as raw bytes in whatever encoding the origin
//! server used. This module detects the charset from HTML meta tags and
//! converts to UTF-8, falling back through the encodings most commonly seen
//! in the wild. Decoding never fails outright: the last rung of the ladder
//! (windows-1252) accepts any byte sequence, so a garbled page degrades into
//! garbled text rather than an error.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::Regex;
use std::sync::LazyLock;

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("valid regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">` tag
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// Detect character encoding from HTML bytes.
///
/// Looks for charset declarations in the following order:
/// 1. `<meta charset="...">`
/// 2. `<meta http-equiv="Content-Type" content="...; charset=...">`
/// 3. UTF-8 if the payload is valid UTF-8
/// 4. windows-1252 (superset of ISO-8859-1) otherwise
///
/// Only examines the first 1024 bytes for meta tags.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    if let Some(charset) = extract_charset(&head_str) {
        if let Some(encoding) = Encoding::for_label(charset.as_bytes()) {
            return encoding;
        }
    }

    if let Some(charset) = extract_content_type_charset(&head_str) {
        if let Some(encoding) = Encoding::for_label(charset.as_bytes()) {
            return encoding;
        }
    }

    if std::str::from_utf8(html).is_ok() {
        UTF_8
    } else {
        WINDOWS_1252
    }
}

/// Extract charset from `<meta charset="...">` tag.
fn extract_charset(html: &str) -> Option<String> {
    CHARSET_META_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract charset from `<meta http-equiv="Content-Type" ...>` tag.
fn extract_content_type_charset(html: &str) -> Option<String> {
    CONTENT_TYPE_CHARSET_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Transcode HTML bytes to a UTF-8 string.
///
/// Detects the encoding and converts, replacing undecodable sequences with
/// the replacement character. Returns `had_errors = true` when replacement
/// happened so callers can log the degradation.
#[must_use]
pub fn decode_html(html: &[u8]) -> (String, bool) {
    let encoding = detect_encoding(html);
    let (text, _, had_errors) = encoding.decode(html);
    (text.into_owned(), had_errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_meta_charset() {
        let html = br#"<html><head><meta charset="iso-8859-1"></head></html>"#;
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn detects_http_equiv_charset() {
        let html =
            br#"<meta http-equiv="Content-Type" content="text/html; charset=shift_jis">"#;
        assert_eq!(detect_encoding(html).name(), "Shift_JIS");
    }

    #[test]
    fn valid_utf8_defaults_to_utf8() {
        let html = "<html><body>caf\u{e9}</body></html>".as_bytes();
        assert_eq!(detect_encoding(html), UTF_8);
    }

    #[test]
    fn invalid_utf8_falls_back_to_windows_1252() {
        // 0xE9 is 'é' in ISO-8859-1 but an invalid UTF-8 continuation start
        let html = b"<html><body>caf\xe9</body></html>";
        let (text, had_errors) = decode_html(html);
        assert!(!had_errors);
        assert!(text.contains("caf\u{e9}"));
    }

    #[test]
    fn declared_charset_decodes_accented_bytes() {
        let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>na\xefve</body></html>";
        let (text, _) = decode_html(html);
        assert!(text.contains("na\u{ef}ve"));
    }
}
