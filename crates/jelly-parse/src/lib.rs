//! Decoding of `jelly-player://` payloads into playback requests.
//!
//! The browser side encodes a JSON object (or an array of them) as URL-safe
//! base64 without padding. By the time the URI reaches us it may have picked
//! up stray slashes, percent escapes or trailing junk from the shell, so the
//! pipeline is deliberately forgiving:
//!
//! 1. [`sanitize`] reclassifies every character into the standard alphabet
//! 2. [`decode`] repairs padding, decodes and trims the resulting text
//! 3. [`parse_requests`] accepts either a single object or an array

pub mod decode;
pub mod error;
pub mod request;
pub mod sanitize;

pub use decode::{decode, pad};
pub use error::ParseError;
pub use request::{parse_requests, PlaybackRequest};
pub use sanitize::sanitize;

/// Strip `<scheme>://` from the front of a raw URI, returning the payload.
pub fn strip_scheme<'a>(raw_uri: &'a str, scheme: &str) -> Result<&'a str, ParseError> {
    raw_uri
        .strip_prefix(scheme)
        .and_then(|rest| rest.strip_prefix("://"))
        .ok_or_else(|| ParseError::Scheme {
            expected: scheme.to_string(),
        })
}

/// Run the full pipeline on a raw URI and return the ordered request batch.
pub fn parse_uri(raw_uri: &str, scheme: &str) -> Result<Vec<PlaybackRequest>, ParseError> {
    let payload = strip_scheme(raw_uri, scheme)?;
    let cleaned = sanitize(payload);
    tracing::debug!(raw_len = payload.len(), cleaned_len = cleaned.len(), "Sanitized payload");
    let text = decode(&cleaned)?;
    parse_requests(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;

    fn encode(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json)
    }

    #[test]
    fn test_strip_scheme() {
        let payload = strip_scheme("jelly-player://abc", "jelly-player").unwrap();
        assert_eq!(payload, "abc");
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let err = strip_scheme("http://abc", "jelly-player").unwrap_err();
        assert!(matches!(err, ParseError::Scheme { .. }));
    }

    #[test]
    fn test_scheme_without_separator_rejected() {
        assert!(strip_scheme("jelly-playerabc", "jelly-player").is_err());
    }

    #[test]
    fn test_parse_uri_single() {
        let uri = format!(
            "jelly-player://{}",
            encode(r#"{"mode":"mpv","url":"http://example/video.mkv"}"#)
        );
        let batch = parse_uri(&uri, "jelly-player").unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].target, "mpv");
        assert_eq!(batch[0].url, "http://example/video.mkv");
        assert!(batch[0].profile.is_none());
    }

    #[test]
    fn test_parse_uri_survives_trailing_slash() {
        // Browsers on Windows like to append a slash to custom-scheme URIs.
        let uri = format!(
            "jelly-player://{}/",
            encode(r#"[{"mode":"mpv","url":"http://a"},{"mode":"mpv","url":"http://b"}]"#)
        );
        let batch = parse_uri(&uri, "jelly-player").unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].url, "http://b");
    }

    #[test]
    fn test_parse_uri_with_utf8_title() {
        let json = r#"{"mode":"mpv","url":"http://a","title":"Slot 1: 葬送のフリーレン"}"#;
        let uri = format!("jelly-player://{}", encode(json));
        let batch = parse_uri(&uri, "jelly-player").unwrap();
        assert_eq!(batch[0].title.as_deref(), Some("Slot 1: 葬送のフリーレン"));
    }

    #[test]
    fn test_parse_uri_garbage_payload() {
        let err = parse_uri("jelly-player://not-json-at-all", "jelly-player").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Decode { .. } | ParseError::RequestFormat { .. }
        ));
    }
}
