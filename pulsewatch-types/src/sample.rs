//! Sample - one telemetry reading.

use alloc::string::{String, ToString};

/// Label used by [`Sample::empty`] in place of a capture time.
pub const EMPTY_CAPTURE_LABEL: &str = "--:--";

/// One validated telemetry reading.
///
/// `captured_at` is the wall-clock label assigned when the reading was
/// received, not a timestamp supplied by the device.
///
/// # Example
///
/// ```rust
/// use pulsewatch_types::Sample;
///
/// let sample = Sample::builder()
///     .temperature(51.0)
///     .vibration(10.0)
///     .alert(true)
///     .captured_at("09:15:42")
///     .build();
///
/// assert_eq!(sample.temperature, 51.0);
/// assert!(sample.alert_flag);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Sample {
    /// Temperature in degrees Celsius.
    pub temperature: f64,

    /// Vibration as a percentage. Nominally 0-100 but not enforced.
    pub vibration: f64,

    /// Alert flag raised by the device itself.
    pub alert_flag: bool,

    /// Receipt-time label, `HH:MM:SS`.
    pub captured_at: String,
}

impl Sample {
    /// Create a sample from its parts.
    pub fn new(
        temperature: f64,
        vibration: f64,
        alert_flag: bool,
        captured_at: impl Into<String>,
    ) -> Self {
        Self {
            temperature,
            vibration,
            alert_flag,
            captured_at: captured_at.into(),
        }
    }

    /// The sentinel returned when no reading has arrived yet.
    ///
    /// Consumers compare against this value instead of handling an
    /// absent sample.
    pub fn empty() -> Self {
        Self {
            temperature: 0.0,
            vibration: 0.0,
            alert_flag: false,
            captured_at: EMPTY_CAPTURE_LABEL.to_string(),
        }
    }

    /// Returns true if this is the [`Sample::empty`] sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.captured_at == EMPTY_CAPTURE_LABEL
            && self.temperature == 0.0
            && self.vibration == 0.0
            && !self.alert_flag
    }

    /// Create a builder for samples.
    pub fn builder() -> SampleBuilder {
        SampleBuilder::new()
    }
}

impl Default for Sample {
    fn default() -> Self {
        Self::empty()
    }
}

/// Builder for [`Sample`].
///
/// Unset fields take the sentinel values from [`Sample::empty`].
#[derive(Debug, Default)]
pub struct SampleBuilder {
    temperature: f64,
    vibration: f64,
    alert_flag: bool,
    captured_at: Option<String>,
}

impl SampleBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the temperature in degrees Celsius.
    pub fn temperature(mut self, value: f64) -> Self {
        self.temperature = value;
        self
    }

    /// Set the vibration percentage.
    pub fn vibration(mut self, value: f64) -> Self {
        self.vibration = value;
        self
    }

    /// Set the device alert flag.
    pub fn alert(mut self, flag: bool) -> Self {
        self.alert_flag = flag;
        self
    }

    /// Set the capture label.
    pub fn captured_at(mut self, label: impl Into<String>) -> Self {
        self.captured_at = Some(label.into());
        self
    }

    /// Build the sample.
    pub fn build(self) -> Sample {
        Sample {
            temperature: self.temperature,
            vibration: self.vibration,
            alert_flag: self.alert_flag,
            captured_at: self
                .captured_at
                .unwrap_or_else(|| EMPTY_CAPTURE_LABEL.to_string()),
        }
    }
}
