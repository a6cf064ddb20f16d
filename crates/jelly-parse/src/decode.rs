use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use crate::error::ParseError;

/// Standard alphabet, canonical padding, but tolerant of non-zero trailing
/// bits: a payload that lost characters in transit still decodes as far as
/// it goes.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Characters trimmed from both ends of the decoded text after whitespace.
///
/// 0x0F and `?` are artifacts seen from upstream. 0x0F is kept as-is; it is
/// not the form-feed 0x0C.
const TRIM_CHARS: &[char] = &['\0', '\u{0f}', '\n', '\r', '\t', ' ', '?'];

/// Append `=` until the length is a multiple of four.
pub fn pad(cleaned: &str) -> String {
    let missing = (4 - cleaned.len() % 4) % 4;
    let mut padded = String::with_capacity(cleaned.len() + missing);
    padded.push_str(cleaned);
    padded.push_str(&"=".repeat(missing));
    padded
}

/// Decode a sanitized payload into the JSON text it carries.
pub fn decode(cleaned: &str) -> Result<String, ParseError> {
    let padded = pad(cleaned);
    let bytes = LENIENT_STANDARD
        .decode(&padded)
        .map_err(|source| ParseError::Decode {
            cleaned: padded.clone(),
            source,
        })?;

    let text = String::from_utf8_lossy(&bytes);
    Ok(text.trim().trim_matches(TRIM_CHARS).to_string())
}
