//! Samples view rendering.
//!
//! Displays the history window as a table, newest sample first.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::{format_temperature, format_vibration};
use crate::app::App;
use crate::data::AlertState;

/// Render the Samples view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let p = app.processor();
    let history = p.history();
    let thresholds = p.thresholds();

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Time"),
        Cell::from("Temperature"),
        Cell::from("Vibration"),
        Cell::from("Flag"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let total = history.len();
    let rows: Vec<Row> = history
        .iter()
        .rev()
        .enumerate()
        .map(|(i, sample)| {
            let state = AlertState::evaluate(sample, thresholds);
            Row::new(vec![
                Cell::from((total - i).to_string())
                    .style(Style::default().add_modifier(Modifier::DIM)),
                Cell::from(sample.captured_at.clone()),
                Cell::from(format_temperature(sample.temperature))
                    .style(app.theme.level_style(state.temperature)),
                Cell::from(format_vibration(sample.vibration))
                    .style(app.theme.level_style(state.vibration)),
                Cell::from(if sample.alert_flag { "ALERT" } else { "-" }),
                Cell::from(state.level.symbol()).style(app.theme.level_style(state.level)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(10),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Length(6),
    ];

    let selected = app.selected_sample_index.min(total.saturating_sub(1));
    let position_info = if total > 0 {
        format!(" [{}/{}]", selected + 1, total)
    } else {
        String::new()
    };
    let title = format!(
        " Samples ({}/{}){} ",
        total,
        history.capacity(),
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if total > 0 {
        state.select(Some(selected));
    }

    frame.render_stateful_widget(table, area, &mut state);
}
