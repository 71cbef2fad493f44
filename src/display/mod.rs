//! Presentation of raw clipboard text.
//!
//! Clipboard entries can contain anything: control characters, ANSI escape
//! sequences, embedded newlines. Printing them verbatim would corrupt the
//! terminal, so every entry is rendered through [`UnprintableRenderer`] into
//!
//! 1. a *search form* with control characters replaced by a placeholder glyph,
//!    used for fuzzy matching;
//! 2. an *abbreviation* with control characters escaped as two-glyph caret
//!    pairs, truncated to a display-column budget;
//! 3. [`HighlightSpan`]s locating every caret pair that survived truncation,
//!    in byte offsets, since that is how terminal row slicing addresses text.

pub mod duration;
pub mod width;

pub use duration::to_duration;
pub use width::{display_width, truncate_to_width};

/// Each escaped control character renders as exactly two ASCII glyphs.
const PAIR_CHARS: usize = 2;
const PAIR_BYTES: usize = 2;

const DEFAULT_PLACEHOLDER: char = '?';

/// A contiguous byte range inside an abbreviation to be visually marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Byte offset of the range start.
    pub col: usize,
    /// Byte width of the range.
    pub width: usize,
}

/// The three presentation forms of one text blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayText {
    pub search: String,
    pub abbr: String,
    pub highlights: Vec<HighlightSpan>,
}

/// Caret-notation escape for a code point below 0x100.
///
/// `0x00..=0x1F` map to `^@`..`^_`, DEL to `^?`, the C1 range to `~@`..`~_`,
/// `0xA0..=0xFE` to `|`-prefixed pairs, and `0xFF` to `~?`.
pub fn caret_pair(code: u8) -> [char; 2] {
    match code {
        0x00..=0x1F => ['^', (code + 0x40) as char],
        0x7F => ['^', '?'],
        0x80..=0x9F => ['~', (code - 0x40) as char],
        0xA0..=0xFE => ['|', (code - 0x80) as char],
        0xFF => ['~', '?'],
        // printable bytes have no caret form; callers only pass members of
        // the unprintable set
        _ => ['^', code as char],
    }
}

/// Renders raw text into search form, abbreviation, and highlight spans.
///
/// The effective unprintable set is fixed at construction: the C0 controls
/// and DEL by default, extendable with host-specific code points below 0x100
/// (some hosts also treat the C1 range or NBSP as unprintable).
#[derive(Debug, Clone)]
pub struct UnprintableRenderer {
    unprintable: [bool; 0x100],
    placeholder: char,
}

impl Default for UnprintableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl UnprintableRenderer {
    pub fn new() -> Self {
        let mut unprintable = [false; 0x100];
        for code in 0x00..=0x1F {
            unprintable[code] = true;
        }
        unprintable[0x7F] = true;
        Self { unprintable, placeholder: DEFAULT_PLACEHOLDER }
    }

    /// Add host-reported unprintable code points; values >= 0x100 are ignored.
    pub fn with_extra_unprintable(mut self, codes: impl IntoIterator<Item = u32>) -> Self {
        for code in codes {
            if let Ok(idx) = usize::try_from(code)
                && idx < 0x100
            {
                self.unprintable[idx] = true;
            }
        }
        self
    }

    /// Override the search-form placeholder glyph.
    pub fn with_placeholder(mut self, placeholder: char) -> Self {
        self.placeholder = placeholder;
        self
    }

    fn is_unprintable(&self, c: char) -> bool {
        (c as u32) < 0x100 && self.unprintable[c as usize]
    }

    /// Text with every unprintable character replaced by the placeholder.
    pub fn search_form(&self, text: &str) -> String {
        text.chars().map(|c| if self.is_unprintable(c) { self.placeholder } else { c }).collect()
    }

    /// Text with every unprintable character escaped to its caret pair,
    /// truncated to `max_width` display columns (0 = unlimited).
    pub fn abbreviate(&self, text: &str, max_width: usize) -> String {
        let mut full = self.escape(text);
        if max_width > 0 {
            let keep = truncate_to_width(&full, max_width).len();
            full.truncate(keep);
        }
        full
    }

    /// Produce all three presentation forms in one pass.
    pub fn render(&self, text: &str, max_width: usize, highlight: bool) -> DisplayText {
        let search = self.search_form(text);
        let abbr = self.abbreviate(text, max_width);
        let highlights =
            if highlight { self.highlight_spans(text, abbr.chars().count()) } else { Vec::new() };
        DisplayText { search, abbr, highlights }
    }

    fn escape(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            if self.is_unprintable(c) {
                let [a, b] = caret_pair(c as u32 as u8);
                out.push(a);
                out.push(b);
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Byte-offset spans bounding every caret pair within the first
    /// `abbr_chars` characters of the abbreviation.
    ///
    /// Walks the raw text, advancing a character counter `len` and a byte
    /// column `col` over the literal runs between unprintable characters.
    /// Adjacent pairs extend the previous span instead of opening a new one,
    /// and a truncation boundary that falls inside a pair shrinks the final
    /// span by the overshoot so no span ever points past the abbreviation.
    fn highlight_spans(&self, text: &str, abbr_chars: usize) -> Vec<HighlightSpan> {
        let mut spans: Vec<HighlightSpan> = Vec::new();
        let mut len = 0usize;
        let mut col = 0usize;
        let mut lit_chars = 0usize;
        let mut lit_bytes = 0usize;
        let mut open = false;

        for c in text.chars() {
            if !self.is_unprintable(c) {
                lit_chars += 1;
                lit_bytes += c.len_utf8();
                continue;
            }

            len += lit_chars;
            col += lit_bytes;
            if lit_chars == 0 && open {
                if let Some(last) = spans.last_mut() {
                    last.width += PAIR_BYTES;
                }
            } else {
                open = false;
                if len >= abbr_chars {
                    break;
                }
                spans.push(HighlightSpan { col, width: PAIR_BYTES });
                open = true;
            }
            lit_chars = 0;
            lit_bytes = 0;

            len += PAIR_CHARS;
            col += PAIR_BYTES;
            if len >= abbr_chars {
                let overshoot = len - abbr_chars;
                if overshoot > 0
                    && let Some(last) = spans.last_mut()
                {
                    last.width -= overshoot;
                }
                break;
            }
        }

        spans
    }
}
