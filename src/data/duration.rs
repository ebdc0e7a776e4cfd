use std::time::Duration;

use anyhow::{bail, Result};
use serde::{Deserialize, Deserializer};

/// Suffix to milliseconds multiplier (order matters: "ms" before "m" and "s")
const UNITS: &[(&str, f64)] = &[
    ("ms", 1.0),
    ("s", 1_000.0),
    ("m", 60_000.0),
    ("h", 3_600_000.0),
];

/// Parse interval strings like "2s", "500ms", "1.5m", "1h"
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.trim().parse()?;
            if !val.is_finite() || val < 0.0 {
                bail!("Duration must be a non-negative number: {}", s);
            }
            return Ok(Duration::from_micros((val * multiplier * 1_000.0) as u64));
        }
    }

    bail!("Unknown duration format: {}", s)
}

/// Serde adapter so settings files can write intervals as "2s".
pub fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw).map_err(serde::de::Error::custom)
}

/// Format a short interval for display
pub fn format_duration(d: Duration) -> String {
    let millis = d.as_millis();
    if millis == 0 {
        "0ms".to_string()
    } else if millis < 1_000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{:.1}m", d.as_secs_f64() / 60.0)
    }
}

/// Format a link uptime as `HH:MM:SS`
pub fn format_uptime(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        let d = parse_duration("2s").unwrap();
        assert_eq!(d, Duration::from_secs(2));
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let d = parse_duration("1.5s").unwrap();
        assert_eq!(d.as_millis(), 1500);
    }

    #[test]
    fn test_parse_milliseconds() {
        let d = parse_duration("250ms").unwrap();
        assert_eq!(d.as_millis(), 250);
    }

    #[test]
    fn test_parse_minutes_and_hours() {
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn parse_with_whitespace() {
        let d = parse_duration("  100ms  ").unwrap();
        assert_eq!(d.as_millis(), 100);
    }

    #[test]
    fn parse_unknown_format_fails() {
        assert!(parse_duration("100x").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn parse_invalid_number_fails() {
        assert!(parse_duration("abcms").is_err());
        assert!(parse_duration("-2s").is_err());
    }

    #[test]
    fn format_short_intervals() {
        assert_eq!(format_duration(Duration::ZERO), "0ms");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
    }

    #[test]
    fn format_uptime_pads_fields() {
        assert_eq!(format_uptime(Duration::ZERO), "00:00:00");
        assert_eq!(format_uptime(Duration::from_secs(59)), "00:00:59");
        assert_eq!(format_uptime(Duration::from_secs(3_723)), "01:02:03");
        assert_eq!(format_uptime(Duration::from_secs(100 * 3600)), "100:00:00");
    }

    #[test]
    fn deserialize_from_settings_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(deserialize_with = "deserialize_duration")]
            every: Duration,
        }

        let w: Wrapper = serde_json::from_str(r#"{"every":"750ms"}"#).unwrap();
        assert_eq!(w.every, Duration::from_millis(750));

        let bad = serde_json::from_str::<Wrapper>(r#"{"every":"soon"}"#);
        assert!(bad.is_err());
    }
}
