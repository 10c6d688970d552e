//! # ESC/POS Control Sequences
//!
//! Fixed control sequences understood by the generic 58/80mm ESC/POS
//! thermal printers this bridge drives.
//!
//! ## Escape Sequence Structure
//!
//! Commands are short byte prefixes:
//! - Single byte: `LF`
//! - Two bytes: `FS .`, `ESC @`
//! - Three bytes with a parameter: `ESC t n`, `ESC M n`, `GS ! n`
//!
//! The printer interprets everything that is not part of a control sequence
//! as text in the currently selected code table.

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Character size and graphics prefix
pub const GS: u8 = 0x1D;

/// FS (File Separator) - Kanji/Chinese mode prefix
pub const FS: u8 = 0x1C;

/// LF (Line Feed) - Print and advance one line
pub const LF: u8 = 0x0A;

// ============================================================================
// FIXED SEQUENCES
// ============================================================================

/// # Cancel Chinese Character Mode (FS .)
///
/// Many budget printers boot in a double-byte Chinese mode where bytes
/// above 0x7F are consumed in pairs. This turns it off so each byte is
/// rendered as one glyph.
///
/// | Format | Bytes |
/// |--------|-------|
/// | ASCII  | FS .  |
/// | Hex    | 1C 2E |
pub const CANCEL_CHINESE_MODE: [u8; 2] = [FS, b'.'];

/// # Select Character Code Table 16 (ESC t 16)
///
/// Selects the WPC1252 table, whose upper half agrees with Latin-1 for the
/// printable range.
///
/// | Format | Bytes    |
/// |--------|----------|
/// | ASCII  | ESC t 16 |
/// | Hex    | 1B 74 10 |
pub const ESCAPE_MODE: [u8; 3] = [ESC, b't', 0x10];

/// # Initialize Printer and Feed (ESC @ LF)
///
/// Currently not emitted by any call: the print path never resets the
/// printer. Kept for integrators building their own byte streams.
///
/// | Format | Bytes       |
/// |--------|-------------|
/// | ASCII  | ESC @ LF    |
/// | Hex    | 1B 40 0A    |
pub const RESET_PRINTER: [u8; 3] = [ESC, b'@', LF];

// ============================================================================
// RAW WRITES
// ============================================================================

/// # Raw Write Framing
///
/// Prefixes caller-supplied byte values with a single `LF`. Each value is
/// narrowed to its low 8 bits, so `256` becomes `0x00` and `-1` becomes
/// `0xFF`.
///
/// ## Example
///
/// ```
/// use btprint::protocol::commands;
///
/// assert_eq!(commands::encode_raw_write(&[72, 105]), vec![0x0A, 0x48, 0x69]);
/// ```
pub fn encode_raw_write(values: &[i64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() + 1);
    out.push(LF);
    out.extend(values.iter().map(|&v| v as u8));
    out
}

// ============================================================================
// TESTS
// ============================================================================
