//! Runtime settings.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `PULSEWATCH_*` environment variables. Nested keys use a double underscore
//! in the environment, e.g. `PULSEWATCH_THRESHOLDS__TEMPERATURE=55`.
//!
//! ```toml
//! [thresholds]
//! temperature = 55.0
//! vibration = 85.0
//!
//! [simulator]
//! interval = "1s"
//!
//! [mqtt]
//! host = "broker.local"
//! topic = "plant/line-1/telemetry"
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::duration::deserialize_duration;
use crate::data::history::DEFAULT_HISTORY_CAPACITY;
use crate::data::raw_log::DEFAULT_RAW_LOG_CAPACITY;
use crate::data::{RangePolicy, Thresholds};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "PULSEWATCH";

/// All tunable constants.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub thresholds: Thresholds,
    pub buffers: BufferSettings,
    pub ingest: IngestSettings,
    pub device: DeviceSettings,
    pub simulator: SimulatorSettings,
    pub mqtt: MqttSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BufferSettings {
    /// Samples kept in the rolling history.
    pub history: usize,
    /// Raw payloads kept in the console log.
    pub raw_log: usize,
}

impl Default for BufferSettings {
    fn default() -> Self {
        Self {
            history: DEFAULT_HISTORY_CAPACITY,
            raw_log: DEFAULT_RAW_LOG_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    pub range_policy: RangePolicy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Label shown for the device in the status panel.
    pub identity: String,
    /// Lower bound of the estimated signal strength (dBm).
    pub signal_base: i32,
    /// Width of the estimate window above `signal_base`.
    pub signal_jitter: u32,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            identity: "10.0.0.x (Wokwi-GUEST)".to_string(),
            signal_base: -55,
            signal_jitter: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    #[serde(deserialize_with = "deserialize_duration")]
    pub interval: Duration,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub vibration_min: u32,
    pub vibration_max: u32,
    /// Probability that a generated sample carries the device alert flag.
    pub alert_probability: f64,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            temperature_min: 20.0,
            temperature_max: 60.0,
            vibration_min: 0,
            vibration_max: 100,
            alert_probability: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MqttSettings {
    pub host: String,
    pub port: u16,
    pub topic: String,
    /// A random 6-hex-digit suffix is appended to build the client id.
    pub client_id_prefix: String,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(deserialize_with = "deserialize_duration")]
    pub keep_alive: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub reconnect: Duration,
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1883,
            topic: "pulsewatch/telemetry".to_string(),
            client_id_prefix: "pulsewatch".to_string(),
            username: None,
            password: None,
            keep_alive: Duration::from_secs(30),
            reconnect: Duration::from_secs(2),
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus `PULSEWATCH_*` overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would make the processor or generator misbehave.
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        ensure!(
            t.temperature.is_finite() && t.vibration.is_finite(),
            "Alarm thresholds must be finite"
        );

        let s = &self.simulator;
        ensure!(
            (s.temperature_max - s.temperature_min).is_finite(),
            "simulator temperature bounds must be finite, got {}..{}",
            s.temperature_min,
            s.temperature_max
        );
        ensure!(
            s.temperature_min <= s.temperature_max,
            "simulator.temperature_min ({}) exceeds temperature_max ({})",
            s.temperature_min,
            s.temperature_max
        );
        ensure!(
            s.vibration_min <= s.vibration_max,
            "simulator.vibration_min ({}) exceeds vibration_max ({})",
            s.vibration_min,
            s.vibration_max
        );
        ensure!(
            (0.0..=1.0).contains(&s.alert_probability),
            "simulator.alert_probability must be within 0..=1, got {}",
            s.alert_probability
        );
        ensure!(!s.interval.is_zero(), "simulator.interval must be positive");
        ensure!(!self.mqtt.topic.is_empty(), "mqtt.topic must not be empty");

        Ok(())
    }
}
