//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use pulsewatch_types::AlertLevel;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Whether this is the dark palette.
    pub dark: bool,
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warning-level readings.
    pub warning: Color,
    /// Color for critical readings and the alarm banner.
    pub critical: Color,
    /// Color for readings within limits.
    pub healthy: Color,
    /// Line color for the temperature series.
    pub temperature: Color,
    /// Line color for the vibration series.
    pub vibration: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            dark: true,
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            temperature: Color::LightRed,
            vibration: Color::LightBlue,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            dark: false,
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            temperature: Color::Red,
            vibration: Color::Blue,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// The opposite palette.
    pub fn toggled(&self) -> Self {
        if self.dark {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Foreground color for an alert level
    pub fn level_color(&self, level: AlertLevel) -> Color {
        match level {
            AlertLevel::None => self.healthy,
            AlertLevel::Warning => self.warning,
            AlertLevel::Critical => self.critical,
        }
    }

    /// Get style for an alert level
    pub fn level_style(&self, level: AlertLevel) -> Style {
        match level {
            AlertLevel::Critical => Style::default()
                .fg(self.critical)
                .add_modifier(Modifier::BOLD),
            other => Style::default().fg(self.level_color(other)),
        }
    }

    /// Inverted banner style used while alarming
    pub fn alarm_banner(&self) -> Style {
        Style::default()
            .fg(Color::White)
            .bg(self.critical)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggled_switches_palette() {
        let dark = Theme::dark();
        assert!(!dark.toggled().dark);
        assert!(dark.toggled().toggled().dark);
    }

    #[test]
    fn level_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.level_color(AlertLevel::None), Color::Green);
        assert_eq!(theme.level_color(AlertLevel::Critical), Color::Red);
        assert_eq!(theme.level_style(AlertLevel::Warning).fg, Some(Color::Yellow));
    }
}
