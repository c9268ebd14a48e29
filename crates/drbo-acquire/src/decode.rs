// Byte-to-text decoding for chapter pages.
//
// Older drbo.org pages are windows-1252 and may declare it only in a <meta>
// tag.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// Only the head of the document is searched for a `<meta>` charset.
const META_PRESCAN_BYTES: usize = 1024;

static META_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]*charset\s*=\s*["']?([A-Za-z0-9_.:\-]+)"#).expect("valid regex")
});

/// Decode an HTML body to a string.
///
/// Encoding is chosen from, in order: a byte-order mark, the `charset`
/// parameter of `content_type`, a `<meta>` charset near the top of the
/// document, UTF-8 if the bytes are valid UTF-8, and windows-1252 otherwise.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(bytes, content_type);
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(encoding = encoding.name(), "Page contained undecodable bytes");
    }
    tracing::debug!(encoding = encoding.name(), bytes = bytes.len(), "Decoded page");
    text.into_owned()
}

fn detect_encoding(bytes: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    if let Some(encoding) = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding;
    }
    let head = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    if let Some(encoding) = META_CHARSET
        .captures(head)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_bytes()))
    {
        return encoding;
    }
    if std::str::from_utf8(bytes).is_ok() {
        UTF_8
    } else {
        WINDOWS_1252
    }
}

/// The `charset` parameter of a `Content-Type` header value.
fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_charset_wins_over_utf8_guess() {
        let text = decode_html(b"<p>\xC6a", Some("text/html; charset=windows-1252"));
        assert_eq!(text, "<p>Æa");
    }

    #[test]
    fn test_meta_charset() {
        let bytes = b"<html><head><meta http-equiv=\"Content-Type\" \
                      content=\"text/html; charset=iso-8859-1\"></head>\
                      <body><p>Ecce \xE6dificium</p></body></html>";
        assert!(decode_html(bytes, None).contains("Ecce ædificium"));
    }

    #[test]
    fn test_invalid_utf8_without_declaration_falls_back_to_windows_1252() {
        assert_eq!(decode_html(b"Di\xE9s", Some("text/html")), "Diés");
    }

    #[test]
    fn test_utf8_passthrough() {
        assert_eq!(decode_html("Iesú".as_bytes(), None), "Iesú");
    }

    #[test]
    fn test_bom_overrides_header() {
        let bytes = b"\xEF\xBB\xBFIes\xC3\xBA";
        assert_eq!(decode_html(bytes, Some("text/html; charset=windows-1252")), "Iesú");
    }

    #[test]
    fn test_charset_param() {
        assert_eq!(charset_param("text/html; charset=\"UTF-8\""), Some("UTF-8"));
        assert_eq!(charset_param("text/html;Charset=windows-1252"), Some("windows-1252"));
        assert_eq!(charset_param("text/html"), None);
    }
}
