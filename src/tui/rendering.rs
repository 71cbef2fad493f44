use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use super::PickerEntry;
use super::app::{MessageType, StatusMessage};
use crate::display::HighlightSpan;

const HEADER_FG: Color = Color::Rgb(16, 185, 129);
const CARET_FG: Color = Color::Rgb(250, 204, 21);
const MUTED_FG: Color = Color::Rgb(113, 113, 122);

/// Everything the status bar needs, borrowed from the app.
pub struct RenderState<'a> {
    pub search_query: &'a str,
    pub matched_count: usize,
    pub total_count: usize,
    pub status_message: Option<&'a StatusMessage>,
}

/// Render the entire picker UI
pub fn render_ui(
    frame: &mut Frame,
    entries: &[&PickerEntry],
    selected_idx: usize,
    state: &RenderState,
) {
    let [results_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    render_results_list(frame, results_area, entries, selected_idx);
    render_status_bar(frame, status_area, state);
}

fn render_results_list(
    frame: &mut Frame,
    area: Rect,
    entries: &[&PickerEntry],
    selected_idx: usize,
) {
    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let selected = idx == selected_idx;
            let base = if selected {
                Style::default().fg(Color::Rgb(250, 250, 250)).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let mut spans = vec![
                Span::styled(entry.header.clone(), Style::default().fg(HEADER_FG)),
                Span::raw(" "),
            ];
            spans.extend(abbr_spans(
                &entry.display.abbr,
                &entry.display.highlights,
                base,
                Style::default().fg(CARET_FG).add_modifier(Modifier::BOLD),
            ));

            let style = if selected {
                Style::default().bg(Color::Rgb(39, 39, 42))
            } else {
                Style::default()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(MUTED_FG))
            .title(" Clipboard History "),
    );

    frame.render_widget(list, area);
}

/// Split an abbreviation into styled spans along its highlight ranges.
///
/// Highlight columns are byte offsets, so plain slicing is exact; spans are
/// ordered and non-overlapping by construction.
fn abbr_spans<'a>(
    abbr: &'a str,
    highlights: &[HighlightSpan],
    base: Style,
    caret: Style,
) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(highlights.len() * 2 + 1);
    let mut pos = 0;
    for hl in highlights {
        if hl.col > pos {
            spans.push(Span::styled(&abbr[pos..hl.col], base));
        }
        spans.push(Span::styled(&abbr[hl.col..hl.col + hl.width], caret));
        pos = hl.col + hl.width;
    }
    if pos < abbr.len() {
        spans.push(Span::styled(&abbr[pos..], base));
    }
    spans
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let line = if let Some(message) = state.status_message {
        let color = match message.message_type {
            MessageType::Success => Color::Green,
            MessageType::Error => Color::Red,
        };
        Line::from(Span::styled(message.text.clone(), Style::default().fg(color)))
    } else {
        Line::from(vec![
            Span::styled(
                format!(" {}/{} ", state.matched_count, state.total_count),
                Style::default().fg(MUTED_FG),
            ),
            Span::raw("> "),
            Span::raw(state.search_query.to_string()),
        ])
    };

    frame.render_widget(Paragraph::new(line), area);
}
