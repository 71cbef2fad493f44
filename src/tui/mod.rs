//! Interactive fuzzy picker over the clipboard history.
//!
//! Entries are listed newest-first as `NN:AGE:` headers followed by the
//! caret-escaped abbreviation with its highlight spans applied, so control
//! characters are visible instead of corrupting the terminal. Typing filters
//! entries by fuzzy-matching against the search form.

pub mod app;
pub mod events;
pub mod rendering;

use std::io;

use anyhow::Result;
use chrono::{DateTime, Utc};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::display::{DisplayText, UnprintableRenderer, to_duration};
use crate::models::HistoryItem;

pub use app::App;

/// One row of the picker: the entry itself plus its precomputed
/// presentation forms.
#[derive(Debug, Clone)]
pub struct PickerEntry {
    pub item: HistoryItem,
    pub header: String,
    pub display: DisplayText,
}

/// Build picker rows from a history snapshot.
///
/// `max_width` bounds the abbreviation in display columns (0 = unlimited);
/// the header is zero-padded so rows line up (`03:21m:`, `12:03d:`).
pub fn build_entries(
    items: &[HistoryItem],
    renderer: &UnprintableRenderer,
    max_width: usize,
    now: DateTime<Utc>,
) -> Vec<PickerEntry> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let age = to_duration(item.age_millis(now));
            let header = format!("{:02}:{:0>3}:", index, age);
            let display = renderer.render(&item.normalized_text(), max_width, true);
            PickerEntry { item: item.clone(), header, display }
        })
        .collect()
}

/// Raw-mode alternate-screen terminal with drop-time cleanup, so a panic in
/// the event loop cannot leave the user's shell in raw mode.
pub struct PickerTerminal {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl PickerTerminal {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
        &mut self.terminal
    }

    pub fn restore(mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for PickerTerminal {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
