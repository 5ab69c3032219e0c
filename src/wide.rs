//! Wide character detection
//!
//! A small, deterministic classifier for characters that occupy two terminal
//! cells: CJK ideographs, kana, hangul, and the common emoji ranges. The
//! table is deliberately coarse; consumers that need East Asian Ambiguous
//! width resolution should layer their own classifier on top.

use std::cmp::Ordering;

/// Inclusive code point ranges classified as double-width, sorted by start.
const WIDE_RANGES: &[(u32, u32)] = &[
    (0x1100, 0x11FF),   // Hangul Jamo
    (0x2600, 0x26FF),   // Miscellaneous Symbols
    (0x2700, 0x27BF),   // Dingbats
    (0x3040, 0x309F),   // Hiragana
    (0x30A0, 0x30FF),   // Katakana
    (0x3400, 0x4DBF),   // CJK Unified Ideographs Extension A
    (0x4E00, 0x9FFF),   // CJK Unified Ideographs
    (0xAC00, 0xD7AF),   // Hangul Syllables
    (0xF900, 0xFAFF),   // CJK Compatibility Ideographs
    (0x1F300, 0x1F9FF), // Symbols and Pictographs, Emoticons, Transport
    (0x20000, 0x2A6DF), // CJK Unified Ideographs Extension B
];

/// Whether a character occupies two terminal cells.
///
/// ASCII short-circuits before any table lookup; most terminal traffic never
/// reaches the range search.
pub fn is_wide(c: char) -> bool {
    let cp = c as u32;
    if cp < 128 {
        return false;
    }
    WIDE_RANGES
        .binary_search_by(|&(start, end)| {
            if cp < start {
                Ordering::Greater
            } else if cp > end {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        })
        .is_ok()
}
