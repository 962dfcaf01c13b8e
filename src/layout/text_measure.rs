//! Text Measurement
//!
//! Utilities for measuring text dimensions in terminal cells.
//!
//! Terminal text width depends on Unicode character widths:
//! - ASCII characters: 1 cell
//! - CJK characters: 2 cells (fullwidth)
//! - Emoji: 2 cells (most)
//! - Zero-width and control characters: 0 cells

use unicode_width::UnicodeWidthChar;

/// Display width of a single character in cells.
#[inline]
pub fn char_width(c: char) -> u16 {
    c.width().unwrap_or(0) as u16
}

/// Display width of a single line in cells.
pub fn string_width(s: &str) -> u16 {
    s.chars()
        .fold(0u16, |width, c| width.saturating_add(char_width(c)))
}

/// Widest line and line count of `text`, split on `\n`.
///
/// Empty text measures as zero by zero.
pub fn measure(text: &str) -> (u16, u16) {
    if text.is_empty() {
        return (0, 0);
    }
    text.lines().fold((0u16, 0u16), |(width, height), line| {
        (width.max(string_width(line)), height.saturating_add(1))
    })
}

/// Cut `text` to at most `max_width` cells, never splitting a wide char.
pub fn truncate(text: &str, max_width: u16) -> &str {
    let mut width = 0u16;
    for (i, c) in text.char_indices() {
        let w = char_width(c);
        if width + w > max_width {
            return &text[..i];
        }
        width += w;
    }
    text
}
