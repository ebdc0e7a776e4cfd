//! Dashboard view rendering.
//!
//! Gauges for the latest reading, a device panel, a rolling chart of the
//! history window, and the most recent raw messages.

use pulsewatch_types::AlertLevel;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph},
    Frame,
};

use super::{format_temperature, format_vibration, render_sparkline};
use crate::app::App;
use crate::data::duration::format_uptime;
use crate::data::payload::{TEMPERATURE_RANGE, VIBRATION_RANGE};
use crate::data::Metric;

/// Raw messages shown under the chart.
const MINI_CONSOLE_LINES: usize = 5;

/// Width of the trend sparklines in the device panel.
const TREND_WIDTH: usize = 16;

/// Render the Dashboard view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Length(7),
        Constraint::Min(6),
        Constraint::Length(MINI_CONSOLE_LINES as u16 + 2),
    ])
    .split(area);

    let top = Layout::horizontal([
        Constraint::Percentage(33),
        Constraint::Percentage(33),
        Constraint::Percentage(34),
    ])
    .split(rows[0]);

    render_gauges(frame, app, top[0], top[1]);
    render_device_panel(frame, app, top[2]);
    render_chart(frame, app, rows[1]);
    render_mini_console(frame, app, rows[2]);
}

fn block<'a>(app: &App, title: impl Into<Line<'a>>, level: AlertLevel) -> Block<'a> {
    let border = if level == AlertLevel::None {
        Style::default().fg(app.theme.border)
    } else {
        app.theme.level_style(level)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(border)
}

fn render_gauges(frame: &mut Frame, app: &App, temp_area: Rect, vib_area: Rect) {
    let p = app.processor();
    let latest = p.latest();
    let alert = p.alert_state();
    let thresholds = p.thresholds();
    let empty = p.history().is_empty();

    let temp_label = if empty {
        "--".to_string()
    } else {
        format_temperature(latest.temperature)
    };
    let temp = Gauge::default()
        .block(block(
            app,
            format!(" Temperature (alarm > {:.0} °C) ", thresholds.temperature),
            alert.temperature,
        ))
        .gauge_style(Style::default().fg(app.theme.level_color(alert.temperature)))
        .ratio(ratio(latest.temperature, TEMPERATURE_RANGE))
        .label(temp_label);
    frame.render_widget(temp, temp_area);

    let vib_label = if empty {
        "--".to_string()
    } else {
        format_vibration(latest.vibration)
    };
    let vib = Gauge::default()
        .block(block(
            app,
            format!(" Vibration (alarm > {:.0} %) ", thresholds.vibration),
            alert.vibration,
        ))
        .gauge_style(Style::default().fg(app.theme.level_color(alert.vibration)))
        .ratio(ratio(latest.vibration, VIBRATION_RANGE))
        .label(vib_label);
    frame.render_widget(vib, vib_area);
}

/// Position of `value` within `range`, clamped to 0..=1.
fn ratio(value: f64, (min, max): (f64, f64)) -> f64 {
    if !value.is_finite() || max <= min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

fn render_device_panel(frame: &mut Frame, app: &App, area: Rect) {
    let p = app.processor();
    let status = p.status();
    let alert = p.alert_state();
    let dim = Style::default().add_modifier(Modifier::DIM);

    let uptime = p
        .uptime()
        .map(format_uptime)
        .unwrap_or_else(|| "00:00:00".to_string());

    let flag = if alert.flagged {
        Span::styled("device alert", app.theme.level_style(AlertLevel::Critical))
    } else {
        Span::styled("clear", dim)
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Device  ", dim),
            Span::raw(status.identity.clone()),
        ]),
        Line::from(vec![
            Span::styled("Signal  ", dim),
            Span::raw(format!("{} dBm", status.signal_strength)),
            Span::styled("  Uptime ", dim),
            Span::raw(uptime),
        ]),
        Line::from(vec![Span::styled("Flag    ", dim), flag]),
        Line::from(vec![
            Span::styled("Temp    ", dim),
            Span::styled(
                render_sparkline(&p.history().trend(Metric::Temperature), TREND_WIDTH),
                Style::default().fg(app.theme.temperature),
            ),
        ]),
        Line::from(vec![
            Span::styled("Vib     ", dim),
            Span::styled(
                render_sparkline(&p.history().trend(Metric::Vibration), TREND_WIDTH),
                Style::default().fg(app.theme.vibration),
            ),
        ]),
    ];
    if let Some(ref err) = status.last_error {
        lines.push(Line::from(Span::styled(
            format!("Error   {}", err),
            Style::default().fg(app.theme.critical),
        )));
    }

    let paragraph = Paragraph::new(lines).block(block(app, " Device ", AlertLevel::None));
    frame.render_widget(paragraph, area);
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let history = app.processor().history();
    let temperature = history.series(Metric::Temperature);
    let vibration = history.series(Metric::Vibration);

    let x_max = (history.capacity().saturating_sub(1)).max(1) as f64;
    let y_max = [Metric::Temperature, Metric::Vibration]
        .iter()
        .filter_map(|m| history.bounds(*m))
        .map(|(_, hi)| hi)
        .fold(VIBRATION_RANGE.1, f64::max);
    let y_min = [Metric::Temperature, Metric::Vibration]
        .iter()
        .filter_map(|m| history.bounds(*m))
        .map(|(lo, _)| lo)
        .fold(0.0, f64::min);

    let datasets = vec![
        Dataset::default()
            .name("temperature °C")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.temperature))
            .data(&temperature),
        Dataset::default()
            .name("vibration %")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.vibration))
            .data(&vibration),
    ];

    let label_style = Style::default().add_modifier(Modifier::DIM);
    let title = format!(
        " History ({}/{}) ",
        history.len(),
        history.capacity()
    );

    let chart = Chart::new(datasets)
        .block(block(app, title, AlertLevel::None))
        .x_axis(
            Axis::default()
                .style(label_style)
                .bounds([0.0, x_max])
                .labels(["oldest".to_string(), "latest".to_string()]),
        )
        .y_axis(
            Axis::default()
                .style(label_style)
                .bounds([y_min, y_max])
                .labels([
                    format!("{:.0}", y_min),
                    format!("{:.0}", (y_min + y_max) / 2.0),
                    format!("{:.0}", y_max),
                ]),
        );

    frame.render_widget(chart, area);
}

fn render_mini_console(frame: &mut Frame, app: &App, area: Rect) {
    let raw_log = app.processor().raw_log();

    let lines: Vec<Line> = if raw_log.is_empty() {
        vec![Line::from(Span::styled(
            "Establishing handshake...",
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        ))]
    } else {
        raw_log
            .iter()
            .take(MINI_CONSOLE_LINES)
            .map(|m| {
                let style = if m.is_malformed() {
                    Style::default().fg(app.theme.warning)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(
                        format!("{} ", m.received_at()),
                        Style::default().add_modifier(Modifier::DIM),
                    ),
                    Span::styled(m.to_string(), style),
                ])
            })
            .collect()
    };

    let title = format!(" Raw messages ({}) ", raw_log.len());
    frame.render_widget(
        Paragraph::new(lines).block(block(app, title, AlertLevel::None)),
        area,
    );
}
