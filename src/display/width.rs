use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Number of terminal columns `s` occupies.
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Longest prefix of `s` that fits in `max_cols` terminal columns.
///
/// Wide glyphs are never split: if the next character would straddle the
/// boundary it is dropped entirely, so the result can be one column short.
pub fn truncate_to_width(s: &str, max_cols: usize) -> &str {
    let mut cols = 0usize;
    for (idx, c) in s.char_indices() {
        let w = c.width().unwrap_or(0);
        if cols + w > max_cols {
            return &s[..idx];
        }
        cols += w;
    }
    s
}
