//! Console view rendering.
//!
//! Shows the full raw message log, newest first. Payloads that failed to
//! decode carry a `WARN:` prefix.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::App;

/// Render the Console view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let raw_log = app.processor().raw_log();

    let items: Vec<ListItem> = raw_log
        .iter()
        .map(|m| {
            let style = if m.is_malformed() {
                Style::default().fg(app.theme.warning)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", m.received_at()),
                    Style::default().add_modifier(Modifier::DIM),
                ),
                Span::styled(m.to_string(), style),
            ]))
        })
        .collect();

    let title = format!(
        " Console ({}/{}, {} malformed) ",
        raw_log.len(),
        raw_log.capacity(),
        raw_log.malformed_count()
    );

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .highlight_style(app.theme.selected);

    let mut state = ListState::default();
    if !raw_log.is_empty() {
        state.select(Some(app.console_scroll.min(raw_log.len() - 1)));
    }

    frame.render_stateful_widget(list, area, &mut state);
}
