//! Device connectivity metadata.

use alloc::string::String;

/// Freshness of the telemetry link, shown as the "last seen" label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum LinkState {
    /// No reading has been accepted since the link came up.
    #[default]
    Waiting,
    /// At least one reading has been accepted.
    Live,
}

impl LinkState {
    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            LinkState::Waiting => "WAITING",
            LinkState::Live => "LIVE",
        }
    }
}

/// Connectivity and link metadata for the monitored device.
///
/// Kept apart from [`Sample`](crate::Sample) content: transport events
/// change `online` and `last_error`, accepted readings change `link` and
/// `signal_strength`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DeviceStatus {
    /// Whether the transport currently reports a connection.
    pub online: bool,

    /// Link freshness label.
    pub link: LinkState,

    /// Signal strength in dBm. Zero until the first reading.
    pub signal_strength: i32,

    /// Opaque device address or label.
    pub identity: String,

    /// Reason reported by the transport for the last failure.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub last_error: Option<String>,
}

impl DeviceStatus {
    /// Create an offline status for the given identity.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_status_is_offline_and_waiting() {
        let status = DeviceStatus::new("10.0.0.x");
        assert!(!status.online);
        assert_eq!(status.link, LinkState::Waiting);
        assert_eq!(status.signal_strength, 0);
        assert_eq!(status.identity, "10.0.0.x");
        assert!(status.last_error.is_none());
    }

    #[test]
    fn link_labels() {
        assert_eq!(LinkState::Waiting.label(), "WAITING");
        assert_eq!(LinkState::Live.label(), "LIVE");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn link_state_serializes_as_label() {
        let json = serde_json::to_string(&LinkState::Live).unwrap();
        assert_eq!(json, "\"LIVE\"");
    }
}
