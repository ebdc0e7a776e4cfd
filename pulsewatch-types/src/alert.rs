//! Alert severity levels.

/// Severity of the current reading against configured thresholds.
///
/// Ordered so that `max()` picks the worst level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AlertLevel {
    /// All metrics within limits.
    #[default]
    None,
    /// A metric is above its warning threshold.
    Warning,
    /// A metric is above its alarm threshold, or the device raised its flag.
    Critical,
}

impl AlertLevel {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            AlertLevel::None => "OK",
            AlertLevel::Warning => "WARN",
            AlertLevel::Critical => "CRIT",
        }
    }

    /// Returns the banner label for display.
    pub fn label(&self) -> &'static str {
        match self {
            AlertLevel::None => "NORMAL",
            AlertLevel::Warning => "WARNING",
            AlertLevel::Critical => "CRITICAL ALERT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_puts_critical_last() {
        assert!(AlertLevel::None < AlertLevel::Warning);
        assert!(AlertLevel::Warning < AlertLevel::Critical);
        assert_eq!(
            AlertLevel::Warning.max(AlertLevel::Critical),
            AlertLevel::Critical
        );
    }

    #[test]
    fn default_is_none() {
        assert_eq!(AlertLevel::default(), AlertLevel::None);
    }

    #[test]
    fn symbols() {
        assert_eq!(AlertLevel::None.symbol(), "OK");
        assert_eq!(AlertLevel::Warning.symbol(), "WARN");
        assert_eq!(AlertLevel::Critical.symbol(), "CRIT");
    }
}
