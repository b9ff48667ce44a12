use base64::alphabet;
use base64::engine::{general_purpose, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

/// Engine used for share-link payloads: padding is optional and stray
/// trailing bits are accepted.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Encodes a string to Base64 format.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Encodes a string to URL-safe Base64 format without padding.
pub fn url_safe_base64_encode(input: &str) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(input)
}

/// Decodes a Base64 string leniently.
///
/// Decoding never fails:
/// * characters outside the alphabet are skipped,
/// * the URL-safe characters `-` and `_` are accepted,
/// * decoding stops at the first `=`,
/// * a dangling sextet is dropped,
/// * invalid UTF-8 is replaced rather than rejected.
///
/// Garbage input therefore yields a garbage (or empty) string, which callers
/// reject through their own required-field checks.
pub fn base64_decode(input: &str) -> String {
    let mut cleaned: String = input
        .chars()
        .take_while(|c| *c != '=')
        .filter_map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '+' | '/' => Some(c),
            '-' => Some('+'),
            '_' => Some('/'),
            _ => None,
        })
        .collect();

    if cleaned.len() % 4 == 1 {
        cleaned.pop();
    }

    match LENIENT.decode(cleaned.as_bytes()) {
        Ok(decoded) => String::from_utf8_lossy(&decoded).into_owned(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_padded_and_unpadded() {
        assert_eq!(base64_decode("aGVsbG8="), "hello");
        assert_eq!(base64_decode("aGVsbG8"), "hello");
    }

    #[test]
    fn test_decode_skips_unknown_characters() {
        assert_eq!(base64_decode("aGVs\nbG8*"), "hello");
        assert_eq!(base64_decode("!!!"), "");
    }

    #[test]
    fn test_decode_url_safe_alphabet() {
        let encoded = url_safe_base64_encode("??>>");
        assert!(encoded.contains('_') || encoded.contains('-'));
        assert_eq!(base64_decode(&encoded), "??>>");
    }

    #[test]
    fn test_decode_stops_at_padding() {
        assert_eq!(base64_decode("aGk=aGVsbG8="), "hi");
    }
}
