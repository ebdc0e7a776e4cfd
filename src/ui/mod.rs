//! Terminal rendering.
//!
//! Every view only reads [`App`](crate::app::App) state; nothing here
//! mutates the processor.

pub mod common;
pub mod console;
pub mod dashboard;
pub mod samples;
pub mod theme;

pub use theme::Theme;

/// Sparkline characters (8 levels of height).
pub const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render normalized 0-7 levels as sparkline glyphs, keeping the last `width`.
pub fn render_sparkline(levels: &[u8], width: usize) -> String {
    if levels.is_empty() {
        return " ".repeat(width);
    }

    let skip = levels.len().saturating_sub(width);
    levels[skip..]
        .iter()
        .map(|&v| SPARKLINE_CHARS[v.min(7) as usize])
        .collect()
}

/// Format a temperature reading for display
pub fn format_temperature(value: f64) -> String {
    format!("{:.1} °C", value)
}

/// Format a vibration reading for display
pub fn format_vibration(value: f64) -> String {
    format!("{:.0} %", value)
}
