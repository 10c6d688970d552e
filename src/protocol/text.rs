//! # Text Printing Commands
//!
//! Builds the byte stream for one formatted text print.
//!
//! ## Size Presets
//!
//! | Index | Command  | Hex      | Effect |
//! |-------|----------|----------|--------|
//! | 0 | GS ! 0x00 | 1D 21 00 | Normal size, no magnification |
//! | 1 | ESC M 1   | 1B 4D 01 | Compressed ASCII font (Font B) |
//! | 2 | ESC M 0   | 1B 4D 00 | Standard ASCII font (Font A) |
//! | 3 | GS ! 0x11 | 1D 21 11 | Double width and height |
//! | 4 | GS ! 0x22 | 1D 21 22 | Triple width and height |
//! | 5 | GS ! 0x33 | 1D 21 33 | Quadruple width and height |
//!
//! ## Output Layout
//!
//! ```text
//! FS .  |  ESC t 16  |  <preset>  |  <Latin-1 text>
//! 1C 2E |  1B 74 10  |  3 bytes   |  n bytes
//! ```

use super::commands::{CANCEL_CHINESE_MODE, ESC, ESCAPE_MODE, GS};
use super::latin1;

/// Largest valid preset index.
pub const MAX_SIZE_INDEX: u8 = 5;

/// Preset used when the caller gives no size.
pub const DEFAULT_SIZE_INDEX: u8 = 2;

/// Size/font preset bytes, indexed 0..=5.
pub const SIZE_PRESETS: [[u8; 3]; 6] = [
    [GS, b'!', 0x00],
    [ESC, b'M', 0x01],
    [ESC, b'M', 0x00],
    [GS, b'!', 0x11],
    [GS, b'!', 0x22],
    [GS, b'!', 0x33],
];

/// Clamp any integer to a valid preset index.
pub fn clamp_size_index(size_index: i64) -> u8 {
    size_index.clamp(0, MAX_SIZE_INDEX as i64) as u8
}

/// Preset bytes for an index, clamped into range.
pub fn size_preset(size_index: i64) -> [u8; 3] {
    SIZE_PRESETS[clamp_size_index(size_index) as usize]
}

/// # Encode a Text Print
///
/// Out-of-range indices are clamped, never rejected. Characters outside
/// Latin-1 become `?`.
///
/// ## Example
///
/// ```
/// use btprint::protocol::text;
///
/// let bytes = text::encode_print_command(2, "ABC");
/// assert_eq!(
///     bytes,
///     vec![0x1C, 0x2E, 0x1B, 0x74, 0x10, 0x1B, 0x4D, 0x00, 0x41, 0x42, 0x43]
/// );
/// ```
pub fn encode_print_command(size_index: i64, text: &str) -> Vec<u8> {
    let encoded = latin1::encode(text);
    let mut out =
        Vec::with_capacity(CANCEL_CHINESE_MODE.len() + ESCAPE_MODE.len() + 3 + encoded.len());
    out.extend_from_slice(&CANCEL_CHINESE_MODE);
    out.extend_from_slice(&ESCAPE_MODE);
    out.extend_from_slice(&size_preset(size_index));
    out.extend(encoded);
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PREFIX: [u8; 5] = [0x1C, 0x2E, 0x1B, 0x74, 0x10];

    fn expected(preset: [u8; 3], text: &[u8]) -> Vec<u8> {
        let mut v = PREFIX.to_vec();
        v.extend(preset);
        v.extend(text);
        v
    }

    #[test]
    fn test_preset_table() {
        assert_eq!(SIZE_PRESETS[0], [0x1D, 0x21, 0x00]);
        assert_eq!(SIZE_PRESETS[1], [0x1B, 0x4D, 0x01]);
        assert_eq!(SIZE_PRESETS[2], [0x1B, 0x4D, 0x00]);
        assert_eq!(SIZE_PRESETS[3], [0x1D, 0x21, 0x11]);
        assert_eq!(SIZE_PRESETS[4], [0x1D, 0x21, 0x22]);
        assert_eq!(SIZE_PRESETS[5], [0x1D, 0x21, 0x33]);
    }

    #[test]
    fn test_encode_default_size() {
        assert_eq!(
            encode_print_command(2, "ABC"),
            expected([0x1B, 0x4D, 0x00], b"ABC")
        );
    }

    #[test]
    fn test_encode_clamps_low() {
        assert_eq!(encode_print_command(-1, "x"), encode_print_command(0, "x"));
        assert_eq!(encode_print_command(i64::MIN, "x"), expected([0x1D, 0x21, 0x00], b"x"));
    }

    #[test]
    fn test_encode_clamps_high() {
        assert_eq!(encode_print_command(9, "x"), encode_print_command(5, "x"));
        assert_eq!(encode_print_command(i64::MAX, "x"), expected([0x1D, 0x21, 0x33], b"x"));
    }

    #[test]
    fn test_encode_latin1_text() {
        assert_eq!(
            encode_print_command(3, "Añó"),
            expected([0x1D, 0x21, 0x11], &[0x41, 0xF1, 0xF3])
        );
    }

    #[test]
    fn test_encode_substitutes_unmappable() {
        assert_eq!(
            encode_print_command(0, "1€2"),
            expected([0x1D, 0x21, 0x00], b"1?2")
        );
    }

    #[test]
    fn test_encode_empty_text() {
        assert_eq!(encode_print_command(4, ""), expected([0x1D, 0x21, 0x22], b""));
    }
}
