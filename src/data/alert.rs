//! Alert derivation from the latest sample.
//!
//! Alert state is a pure function of a [`Sample`] and [`Thresholds`]. It is
//! recomputed on every read and never stored.

use pulsewatch_types::{AlertLevel, Sample};
use serde::Deserialize;

/// Thresholds for alert computation.
///
/// A metric strictly above its alarm threshold is critical. The warning
/// thresholds only colour the display; they never make the processor
/// report an alarm.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Temperature (°C) above which the reading is critical.
    pub temperature: f64,
    /// Vibration (%) above which the reading is critical.
    pub vibration: f64,
    /// Temperature (°C) above which the reading is a warning.
    pub temperature_warning: Option<f64>,
    /// Vibration (%) above which the reading is a warning.
    pub vibration_warning: Option<f64>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temperature: 50.0,
            vibration: 80.0,
            temperature_warning: Some(45.0),
            vibration_warning: Some(70.0),
        }
    }
}

impl Thresholds {
    /// Alarm thresholds only, with warnings disabled.
    pub fn alarm_only(temperature: f64, vibration: f64) -> Self {
        Self {
            temperature,
            vibration,
            temperature_warning: None,
            vibration_warning: None,
        }
    }

    /// Level for a temperature reading.
    pub fn temperature_level(&self, value: f64) -> AlertLevel {
        level_for(value, self.temperature, self.temperature_warning)
    }

    /// Level for a vibration reading.
    pub fn vibration_level(&self, value: f64) -> AlertLevel {
        level_for(value, self.vibration, self.vibration_warning)
    }
}

fn level_for(value: f64, critical: f64, warning: Option<f64>) -> AlertLevel {
    if value > critical {
        AlertLevel::Critical
    } else if warning.is_some_and(|w| value > w) {
        AlertLevel::Warning
    } else {
        AlertLevel::None
    }
}

/// Derived alert state for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertState {
    /// Worst of the per-metric levels and the device flag.
    pub level: AlertLevel,
    pub temperature: AlertLevel,
    pub vibration: AlertLevel,
    /// Device-supplied alert flag.
    pub flagged: bool,
}

impl AlertState {
    /// Evaluate a sample against thresholds.
    pub fn evaluate(sample: &Sample, thresholds: &Thresholds) -> Self {
        let temperature = thresholds.temperature_level(sample.temperature);
        let vibration = thresholds.vibration_level(sample.vibration);
        let flag_level = if sample.alert_flag {
            AlertLevel::Critical
        } else {
            AlertLevel::None
        };

        Self {
            level: temperature.max(vibration).max(flag_level),
            temperature,
            vibration,
            flagged: sample.alert_flag,
        }
    }

    /// True when the sample breaches an alarm threshold or carries the device flag.
    pub fn is_alarming(&self) -> bool {
        self.level == AlertLevel::Critical
    }
}
