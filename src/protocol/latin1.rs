//! # Latin-1 Encoding
//!
//! Converts Unicode strings to ISO-8859-1 single-byte encoding for the
//! printer's text path.
//!
//! Latin-1 is the first 256 Unicode code points, so U+0000–U+00FF map to the
//! byte with the same value. Anything above that has no representation:
//! [`encode`] substitutes `?` (one byte per character, so following text is
//! never shifted) and [`try_encode`] reports the offending character.

use crate::error::PrinterError;

/// Byte written in place of an unmappable character.
pub const REPLACEMENT: u8 = b'?';

/// Encode a Unicode string as Latin-1 bytes.
///
/// - U+0000–U+00FF: single byte with the code point's value
/// - Anything else: replaced with `?`, warning logged
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        match to_latin1(ch) {
            Some(byte) => out.push(byte),
            None => {
                tracing::warn!(
                    "latin1: unmapped character '{}' (U+{:04X}), replacing with '?'",
                    ch,
                    ch as u32
                );
                out.push(REPLACEMENT);
            }
        }
    }
    out
}

/// Encode a Unicode string as Latin-1, failing on the first character
/// outside the mapping.
pub fn try_encode(s: &str) -> Result<Vec<u8>, PrinterError> {
    s.chars()
        .enumerate()
        .map(|(index, ch)| to_latin1(ch).ok_or(PrinterError::Unencodable { ch, index }))
        .collect()
}

fn to_latin1(ch: char) -> Option<u8> {
    u8::try_from(ch as u32).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(encode("Hello"), b"Hello".to_vec());
    }

    #[test]
    fn test_upper_half() {
        assert_eq!(encode("ñÁü€"), vec![0xF1, 0xC1, 0xFC, b'?']);
        assert_eq!(encode("ÿ"), vec![0xFF]);
    }

    #[test]
    fn test_unmappable_does_not_shift_following_bytes() {
        // One replacement byte per character regardless of UTF-8 width
        assert_eq!(encode("a😀b漢c"), vec![b'a', b'?', b'b', b'?', b'c']);
    }

    #[test]
    fn test_try_encode_ok() {
        assert_eq!(try_encode("café").unwrap(), vec![b'c', b'a', b'f', 0xE9]);
    }

    #[test]
    fn test_try_encode_reports_char_index() {
        match try_encode("ab€d") {
            Err(PrinterError::Unencodable { ch, index }) => {
                assert_eq!(ch, '€');
                assert_eq!(index, 2);
            }
            other => panic!("expected Unencodable, got {:?}", other),
        }
    }
}
