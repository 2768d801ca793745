use chardetng::EncodingDetector;
use encoding_rs::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
}

/// Decode a fetched body to UTF-8: BOM, then Content-Type charset, then detection.
/// Malformed sequences are an error.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedText, DecodeError> {
    let decoded = decode_page(bytes, content_type);
    if decoded.had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: decoded.encoding_label,
            message: "malformed byte sequence".into(),
        });
    }
    Ok(decoded)
}

/// Same encoding choice as [`decode_body`], but malformed sequences become U+FFFD.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> DecodedText {
    decode_with(bytes, pick_encoding(bytes, content_type))
}

fn pick_encoding(bytes: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    if let Some(enc) = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return enc;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (name, value) = part.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> DecodedText {
    let (text, had_errors) = enc.decode_with_bom_removal(bytes);
    DecodedText {
        text: text.into_owned(),
        encoding_label: enc.name().to_string(),
        had_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_param_is_case_insensitive_and_unquoted() {
        assert_eq!(
            charset_param("text/html; Charset=\"ISO-8859-1\""),
            Some("ISO-8859-1".to_string())
        );
        assert_eq!(charset_param("text/plain"), None);
    }

    #[test]
    fn utf8_bom_is_removed() {
        let decoded = decode_body(b"\xEF\xBB\xBFUser-agent: *", None).unwrap();
        assert_eq!(decoded.text, "User-agent: *");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }

    #[test]
    fn header_charset_wins_over_detection() {
        let decoded = decode_body(b"caf\xe9", Some("text/html; charset=ISO-8859-1")).unwrap();
        assert_eq!(decoded.text, "caf\u{e9}");
    }

    #[test]
    fn malformed_utf8_is_rejected() {
        let broken = decode_body(b"ok \xc3\x28", Some("text/html; charset=utf-8"));
        assert!(matches!(broken, Err(DecodeError::DecodeFailure { .. })));
    }

    #[test]
    fn page_decode_replaces_stray_bytes() {
        let html = b"<h1 class=\"job-title\">Engineer</h1><p>caf\xe9</p>";
        let decoded = decode_page(html, Some("text/html; charset=utf-8"));
        assert!(decoded.had_errors);
        assert!(decoded.text.contains("Engineer"));
        assert!(decoded.text.contains("caf\u{fffd}"));
        assert!(!decode_page(b"clean", Some("text/html; charset=utf-8")).had_errors);
    }
}
