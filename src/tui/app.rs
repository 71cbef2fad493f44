//! Picker application state and event loop.
//!
//! The `App` owns the nucleo matcher and all picker state. Typing narrows
//! the list by fuzzy-matching against each entry's search form (control
//! characters already collapsed to placeholders, so they cannot interfere
//! with matching), Enter accepts the selection, Ctrl-Y copies without
//! leaving, Ctrl-R re-reads the history through the cache.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use nucleo::{Config, Nucleo};
use ratatui::Terminal;
use ratatui::backend::Backend;

use super::PickerEntry;
use super::events::{Action, poll_event};
use super::rendering::{RenderState, render_ui};
use crate::clipboard::copy_item;
use crate::models::{HistoryItem, PasteMode};

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;

/// Maximum search query length
const MAX_QUERY_LEN: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

/// Pulls a fresh snapshot through the cache; wired up by the CLI.
pub type RefreshFn<'a> = Box<dyn FnMut() -> Result<Vec<PickerEntry>> + 'a>;

pub struct App<'a> {
    nucleo: Nucleo<PickerEntry>,
    entries: Vec<PickerEntry>,
    search_query: String,
    selected_idx: usize,
    should_quit: bool,
    picked: Option<HistoryItem>,
    refresh: Option<RefreshFn<'a>>,
    status_message: Option<StatusMessage>,
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl<'a> App<'a> {
    pub fn new(entries: Vec<PickerEntry>, refresh: Option<RefreshFn<'a>>) -> Self {
        let mut app = Self {
            nucleo: Nucleo::new(Config::DEFAULT, Arc::new(|| {}), None, 1),
            entries: Vec::new(),
            search_query: String::new(),
            selected_idx: 0,
            should_quit: false,
            picked: None,
            refresh,
            status_message: None,
            needs_redraw: true,
            last_draw_time: Instant::now(),
        };
        app.replace_entries(entries);
        app
    }

    /// Run the event loop until the user accepts or quits. Returns the
    /// accepted entry, if any.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<Option<HistoryItem>> {
        while !self.should_quit {
            let had_status = self.status_message.is_some();
            self.check_and_clear_expired_status();
            if had_status && self.status_message.is_none() {
                self.needs_redraw = true;
            }

            self.nucleo.tick(10);

            let matched_items = self.collect_matched_items();
            let matched_count = matched_items.len();

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            if self.needs_redraw || now.duration_since(self.last_draw_time) >= Duration::from_millis(100)
            {
                terminal.draw(|f| {
                    let state = RenderState {
                        search_query: &self.search_query,
                        matched_count,
                        total_count: self.entries.len(),
                        status_message: self.status_message.as_ref(),
                    };
                    render_ui(f, &matched_items, self.selected_idx, &state);
                })?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100))?;
            self.handle_action(action, matched_count);
        }

        Ok(self.picked.take())
    }

    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    fn check_and_clear_expired_status(&mut self) {
        let expired = self
            .status_message
            .as_ref()
            .map(|msg| Instant::now() >= msg.expires_at)
            .unwrap_or(false);
        if expired {
            self.status_message = None;
        }
    }

    fn collect_matched_items(&self) -> Vec<&PickerEntry> {
        let snapshot = self.nucleo.snapshot();
        snapshot.matched_items(..snapshot.matched_item_count()).map(|item| item.data).collect()
    }

    fn selected_entry(&self) -> Option<PickerEntry> {
        self.collect_matched_items().get(self.selected_idx).map(|entry| (*entry).clone())
    }

    fn handle_action(&mut self, action: Action, total_items: usize) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ClearSearch => {
                if self.search_query.is_empty() {
                    self.should_quit = true;
                } else {
                    self.search_query.clear();
                    self.update_nucleo_pattern();
                    self.selected_idx = 0;
                    self.needs_redraw = true;
                }
            }
            Action::MoveUp => self.move_selection(-1, total_items),
            Action::MoveDown => self.move_selection(1, total_items),
            Action::PageUp => self.move_selection(-10, total_items),
            Action::PageDown => self.move_selection(10, total_items),
            Action::UpdateSearch(c) => self.update_search(c),
            Action::DeleteChar => self.delete_char(),
            Action::Accept => match self.selected_entry() {
                Some(entry) => {
                    self.picked = Some(entry.item);
                    self.should_quit = true;
                }
                None => self.set_status(
                    "✗ No entry selected",
                    MessageType::Error,
                    STATUS_ERROR_DURATION_MS,
                ),
            },
            Action::CopyToClipboard => match self.selected_entry() {
                Some(entry) => match copy_item(&entry.item) {
                    Ok(PasteMode::Linewise) => self.set_status(
                        "✓ Copied (linewise)",
                        MessageType::Success,
                        STATUS_SUCCESS_DURATION_MS,
                    ),
                    Ok(PasteMode::Charwise) => self.set_status(
                        "✓ Copied",
                        MessageType::Success,
                        STATUS_SUCCESS_DURATION_MS,
                    ),
                    Err(e) => self.set_status(
                        format!("✗ Clipboard error: {}", e),
                        MessageType::Error,
                        STATUS_ERROR_DURATION_MS,
                    ),
                },
                None => self.set_status(
                    "✗ No entries to copy",
                    MessageType::Error,
                    STATUS_ERROR_DURATION_MS,
                ),
            },
            Action::Refresh => self.refresh_entries(),
            Action::None => {}
        }
    }

    fn refresh_entries(&mut self) {
        let Some(refresh) = self.refresh.as_mut() else {
            return;
        };
        match refresh() {
            Ok(entries) => {
                self.replace_entries(entries);
                self.set_status("↻ History refreshed", MessageType::Success, STATUS_SUCCESS_DURATION_MS);
            }
            Err(e) => self.set_status(
                format!("✗ Refresh failed: {}", e),
                MessageType::Error,
                STATUS_ERROR_DURATION_MS,
            ),
        }
    }

    fn move_selection(&mut self, delta: isize, total: usize) {
        if total == 0 {
            self.selected_idx = 0;
            return;
        }

        let old_idx = self.selected_idx;
        let new_idx = (self.selected_idx as isize + delta).max(0) as usize;
        self.selected_idx = new_idx.min(total - 1);

        if old_idx != self.selected_idx {
            self.needs_redraw = true;
        }
    }

    fn update_search(&mut self, c: char) {
        if self.search_query.len() < MAX_QUERY_LEN {
            self.search_query.push(c);
            self.update_nucleo_pattern();
            self.selected_idx = 0;
            self.needs_redraw = true;
        }
    }

    fn delete_char(&mut self) {
        if self.search_query.pop().is_some() {
            self.update_nucleo_pattern();
            self.selected_idx = 0;
            self.needs_redraw = true;
        }
    }

    fn update_nucleo_pattern(&mut self) {
        self.nucleo.pattern.reparse(
            0,
            &self.search_query,
            nucleo::pattern::CaseMatching::Smart,
            nucleo::pattern::Normalization::Smart,
            false,
        );
        self.nucleo.tick(10);
    }

    /// Rebuild the matcher around a new entry set, keeping the query.
    fn replace_entries(&mut self, entries: Vec<PickerEntry>) {
        self.entries = entries;
        self.nucleo = Nucleo::new(Config::DEFAULT, Arc::new(|| {}), None, 1);

        let injector = self.nucleo.injector();
        for entry in &self.entries {
            let search = entry.display.search.clone();
            injector.push(entry.clone(), move |_entry, cols| {
                cols[0] = search.clone().into();
            });
        }

        self.update_nucleo_pattern();
        self.selected_idx = 0;
        self.needs_redraw = true;
    }
}
