//! Unicode to QR kanji lookup.
//!
//! Kanji mode encodes the double-byte Shift JIS characters in the ranges
//! 0x8140..=0x9FFC and 0xE040..=0xEBBF as 13-bit values. The table is dense
//! over the Basic Multilingual Plane and is built once, on first use, by
//! walking every 13-bit code and decoding its Shift JIS pair.

use std::sync::OnceLock;

use encoding_rs::SHIFT_JIS;
use tracing::debug;

const UNMAPPED: u16 = u16::MAX;

static UNICODE_TO_QR_KANJI: OnceLock<Box<[u16]>> = OnceLock::new();

fn table() -> &'static [u16] {
    UNICODE_TO_QR_KANJI.get_or_init(build_table)
}

fn build_table() -> Box<[u16]> {
    let mut result = vec![UNMAPPED; 1 << 16].into_boxed_slice();
    let mut entries: usize = 0;
    for code in 0u16..(1 << 13) {
        let Some(c) = decode_qr_kanji(code) else {
            continue;
        };
        let slot = &mut result[c as usize];
        // Lowest code wins where Shift JIS maps two codes to one character
        if *slot == UNMAPPED {
            *slot = code;
            entries += 1;
        }
    }
    debug!(entries, "kanji table built");
    result
}

/// Converts a 13-bit QR kanji value back to its Shift JIS byte pair and decodes it.
fn decode_qr_kanji(code: u16) -> Option<char> {
    let hi = code / 0xC0;
    let lo = code % 0xC0;
    let lead = if hi <= 0x1E { hi + 0x81 } else { hi + 0xC1 };
    let bytes = [lead as u8, (lo + 0x40) as u8];
    let decoded = SHIFT_JIS.decode_without_bom_handling_and_without_replacement(&bytes)?;
    let mut chars = decoded.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if (c as u32) < 0x10000 => Some(c),
        _ => None,
    }
}

/// Returns the 13-bit QR kanji value for the given character, if it has one.
pub fn to_qr_kanji(c: char) -> Option<u16> {
    let cp = c as u32;
    if cp >= 0x10000 {
        return None;
    }
    match table()[cp as usize] {
        UNMAPPED => None,
        code => Some(code),
    }
}

pub fn is_kanji(c: char) -> bool {
    to_qr_kanji(c).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_examples() {
        // 0x935F and 0xE4AA in Shift JIS
        assert_eq!(to_qr_kanji('点'), Some(0x0D9F));
        assert_eq!(to_qr_kanji('茗'), Some(0x1AAA));
    }

    #[test]
    fn test_first_and_common_codes() {
        assert_eq!(to_qr_kanji('\u{3000}'), Some(0x0000));
        assert_eq!(to_qr_kanji('、'), Some(0x0001));
        assert!(is_kanji('こ'));
        assert!(is_kanji('☆'));
        assert!(is_kanji('И'));
        assert!(is_kanji('κ'));
    }

    #[test]
    fn test_unmapped() {
        assert!(!is_kanji('A'));
        assert!(!is_kanji('a'));
        assert!(!is_kanji(' '));
        assert!(!is_kanji('é'));
        assert!(!is_kanji('\u{1F600}'));
    }
}
