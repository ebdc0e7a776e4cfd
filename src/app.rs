//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{info, warn};

use crate::config::{Settings, SimulatorSettings};
use crate::data::duration::format_uptime;
use crate::data::TelemetryProcessor;
use crate::source::{Inbound, SampleSource, SimulatedSource};
use crate::ui::Theme;

/// Upper bound on events applied per frame so a burst cannot stall drawing.
pub const MAX_EVENTS_PER_TICK: usize = 256;

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Gauges, rolling chart, device panel and the latest raw messages.
    Dashboard,
    /// Table of the history window.
    Samples,
    /// Full raw message log.
    Console,
}

impl View {
    pub const ALL: [View; 3] = [View::Dashboard, View::Samples, View::Console];

    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Dashboard => View::Samples,
            View::Samples => View::Console,
            View::Console => View::Dashboard,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Dashboard => View::Console,
            View::Samples => View::Dashboard,
            View::Console => View::Samples,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Samples => "Samples",
            View::Console => "Console",
        }
    }

    /// Position in the tab bar.
    pub fn index(&self) -> usize {
        match self {
            View::Dashboard => 0,
            View::Samples => 1,
            View::Console => 2,
        }
    }
}

/// Main application state.
///
/// The app is the only writer of the [`TelemetryProcessor`]: every frame it
/// drains the live source (and the simulator, when enabled) and applies the
/// events in order.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    processor: TelemetryProcessor,
    source: Box<dyn SampleSource>,
    simulator: Option<SimulatedSource>,
    simulator_settings: SimulatorSettings,

    // Navigation state
    pub selected_sample_index: usize,
    pub console_scroll: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `source`, with the theme picked from the
    /// terminal background.
    pub fn new(source: Box<dyn SampleSource>, settings: &Settings) -> Self {
        Self::with_theme(source, settings, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme.
    pub fn with_theme(source: Box<dyn SampleSource>, settings: &Settings, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Dashboard,
            show_help: false,
            processor: TelemetryProcessor::new(settings),
            source,
            simulator: None,
            simulator_settings: settings.simulator.clone(),
            selected_sample_index: 0,
            console_scroll: 0,
            theme,
            status_message: None,
        }
    }

    /// Read-only view of the telemetry state.
    pub fn processor(&self) -> &TelemetryProcessor {
        &self.processor
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        match &self.simulator {
            Some(sim) => sim.description(),
            None => self.source.description(),
        }
    }

    /// The live source's current error, if any.
    pub fn source_error(&self) -> Option<&str> {
        self.source.error()
    }

    pub fn simulating(&self) -> bool {
        self.simulator.is_some()
    }

    /// Drain pending events and apply them.
    ///
    /// While the simulator is on, live messages are discarded so that a
    /// single producer feeds the history; live connectivity still applies.
    /// Returns the number of samples accepted.
    pub fn pump(&mut self) -> usize {
        let mut accepted = 0;

        for _ in 0..MAX_EVENTS_PER_TICK {
            let Some(event) = self.source.poll() else {
                break;
            };
            if self.simulator.is_some() && !event.is_connectivity() {
                continue;
            }
            accepted += self.apply(event);
        }

        if let Some(sim) = self.simulator.as_mut() {
            let mut events = Vec::new();
            while let Some(event) = sim.poll() {
                events.push(event);
            }
            for event in events {
                accepted += self.apply(event);
            }
        }

        accepted
    }

    fn apply(&mut self, event: Inbound) -> usize {
        match self.processor.apply(event) {
            Ok(Some(_)) => 1,
            Ok(None) => 0,
            Err(e) => {
                self.set_status_message(format!("Dropped payload: {}", e));
                0
            }
        }
    }

    /// Switch between the live feed and the built-in simulator.
    pub fn toggle_simulator(&mut self) {
        if self.simulator.take().is_some() {
            info!("simulator off, live feed resumed");
            if let Some(err) = self.source.error() {
                let err = err.to_string();
                self.processor.on_error(err);
            }
            self.set_status_message("Simulator off".to_string());
        } else {
            info!("simulator on, live messages suspended");
            self.simulator = Some(SimulatedSource::new(self.simulator_settings.clone()));
            self.set_status_message("Simulator on".to_string());
        }
    }

    /// Swap between the light and dark palettes.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Clear history and raw log.
    pub fn reset(&mut self) {
        self.processor.reset();
        self.selected_sample_index = 0;
        self.console_scroll = 0;
        self.set_status_message("History cleared".to_string());
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    fn list_len(&self) -> usize {
        match self.current_view {
            View::Dashboard => 0,
            View::Samples => self.processor.history().len(),
            View::Console => self.processor.raw_log().len(),
        }
    }

    fn cursor_mut(&mut self) -> Option<&mut usize> {
        match self.current_view {
            View::Dashboard => None,
            View::Samples => Some(&mut self.selected_sample_index),
            View::Console => Some(&mut self.console_scroll),
        }
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.list_len().saturating_sub(1);
        if let Some(cursor) = self.cursor_mut() {
            *cursor = (*cursor + n).min(max);
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        if let Some(cursor) = self.cursor_mut() {
            *cursor = cursor.saturating_sub(n);
        }
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        if let Some(cursor) = self.cursor_mut() {
            *cursor = 0;
        }
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        let last = self.list_len().saturating_sub(1);
        if let Some(cursor) = self.cursor_mut() {
            *cursor = last;
        }
    }

    /// Keep cursors inside their lists after the lists shrink.
    pub fn clamp_selection(&mut self) {
        let samples = self.processor.history().len();
        let raw = self.processor.raw_log().len();
        self.selected_sample_index = self.selected_sample_index.min(samples.saturating_sub(1));
        self.console_scroll = self.console_scroll.min(raw.saturating_sub(1));
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Build the JSON export of the current state.
    pub fn export_value(&self) -> serde_json::Value {
        let p = &self.processor;
        let alert = p.alert_state();

        let raw_log: Vec<serde_json::Value> = p
            .raw_log()
            .iter()
            .map(|m| {
                serde_json::json!({
                    "text": m.text(),
                    "malformed": m.is_malformed(),
                    "received_at": m.received_at(),
                })
            })
            .collect();

        serde_json::json!({
            "exported_at": chrono::Local::now().to_rfc3339(),
            "source": self.source_description(),
            "simulating": self.simulating(),
            "status": p.status(),
            "uptime": p.uptime().map(format_uptime),
            "alert": {
                "level": alert.level,
                "temperature": alert.temperature,
                "vibration": alert.vibration,
                "flagged": alert.flagged,
                "alarming": alert.is_alarming(),
            },
            "counters": {
                "accepted": p.accepted(),
                "rejected": p.rejected(),
            },
            "latest": p.latest(),
            "history": p.snapshot(),
            "raw_log": raw_log,
        })
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        if self.processor.history().is_empty() && self.processor.raw_log().is_empty() {
            anyhow::bail!("No data to export");
        }

        let json = serde_json::to_string_pretty(&self.export_value())?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "exported telemetry state");
        Ok(())
    }

    /// Export to `path`, reporting the outcome in the status bar.
    pub fn export_with_feedback(&mut self, path: &Path) {
        match self.export_state(path) {
            Ok(()) => self.set_status_message(format!("Exported to {}", path.display())),
            Err(e) => {
                warn!(error = %e, "export failed");
                self.set_status_message(format!("Export failed: {}", e));
            }
        }
    }
}
