//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use pulsewatch_types::AlertLevel;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::{format_temperature, format_vibration};
use crate::app::{App, View};
use crate::data::duration::format_duration;

/// Render the header bar with the safety indicator.
///
/// Displays: link state, alert banner, latest reading, data source.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let p = app.processor();
    let status = p.status();
    let alert = p.alert_state();

    let (online_label, online_style) = if status.online {
        ("ONLINE", Style::default().fg(app.theme.healthy))
    } else {
        ("OFFLINE", Style::default().fg(app.theme.critical))
    };

    let banner_style = if alert.level == AlertLevel::Critical {
        app.theme.alarm_banner()
    } else {
        app.theme.level_style(alert.level)
    };

    let reading = if p.history().is_empty() {
        Span::styled("no samples yet", Style::default().add_modifier(Modifier::DIM))
    } else {
        let latest = p.latest();
        Span::raw(format!(
            "{}  {}",
            format_temperature(latest.temperature),
            format_vibration(latest.vibration)
        ))
    };

    let mut spans = vec![
        Span::styled(" ● ", online_style),
        Span::styled("PULSEWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(online_label, online_style),
        Span::raw(" "),
        Span::styled(status.link.label(), app.theme.tab_active),
        Span::raw(" │ "),
        Span::styled(format!(" {} ", alert.level.label()), banner_style),
        Span::raw(" │ "),
        reading,
    ];
    if app.simulating() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            "SIMULATOR",
            Style::default().fg(app.theme.warning).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!(" {}:{} ", i + 1, view.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, time since last sample, transport error, available controls.
/// Also displays temporary status messages.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Dashboard => "s:simulate t:theme c:clear e:export Tab:switch ?:help q:quit",
        View::Samples | View::Console => "↑↓:scroll s:simulate c:clear Tab:switch ?:help q:quit",
    };

    let updated = match app.processor().since_last_update() {
        Some(elapsed) => format!("Updated {} ago", format_duration(elapsed)),
        None => "Waiting for data".to_string(),
    };

    let status = match app.source_error() {
        Some(err) if !app.simulating() => format!(
            " {} | Error: {} | {}",
            app.source_description(),
            err,
            controls
        ),
        _ => format!(
            " {} | {} | {}",
            app.source_description(),
            updated,
            controls
        ),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ Tab     Switch views"),
        Line::from("  1-3         Jump to view"),
        Line::from("  ↑/↓ j/k     Scroll list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from(""),
        section(" Telemetry"),
        Line::from("  s         Toggle simulator"),
        Line::from("  c         Clear history and log"),
        Line::from("  e         Export to JSON"),
        Line::from(""),
        section(" General"),
        Line::from("  t         Toggle light/dark theme"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 22u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
