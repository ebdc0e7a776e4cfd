//! Lenient decoding of device payloads.
//!
//! A payload must be a JSON object. Inside it, decoding is deliberately
//! forgiving so that partial readings still produce a sample:
//!
//! - `temperature` and `vibration` default to `0` when missing, `null`, or not
//!   a number.
//! - `alert` is set when it is a non-zero number or `true`; anything else
//!   clears it.
//! - `rssi`, when numeric, is reported alongside the sample.
//! - Other fields, including any device timestamp, are ignored. The capture
//!   label always comes from the receiver.

use serde::Deserialize;
use serde_json::{Map, Value};

use pulsewatch_types::Sample;

use crate::error::IngestError;

/// Domain range for temperature in °C.
pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 150.0);

/// Domain range for vibration in percent.
pub const VIBRATION_RANGE: (f64, f64) = (0.0, 100.0);

/// What to do with values outside their domain range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Keep the value as received.
    #[default]
    Pass,
    /// Clamp into the domain range.
    Clamp,
    /// Reject the payload with [`IngestError::OutOfRange`].
    Reject,
}

/// A decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPayload {
    pub sample: Sample,
    /// Signal strength reported by the device, if any.
    pub rssi: Option<i32>,
}

/// Decode a raw payload into a sample stamped with `captured_at`.
pub fn decode_payload(
    raw: &[u8],
    captured_at: &str,
    policy: RangePolicy,
) -> Result<DecodedPayload, IngestError> {
    let fields = parse_object(raw)?;

    let temperature = apply_policy(
        "temperature",
        number_or_zero(fields.get("temperature")),
        TEMPERATURE_RANGE,
        policy,
    )?;
    let vibration = apply_policy(
        "vibration",
        number_or_zero(fields.get("vibration")),
        VIBRATION_RANGE,
        policy,
    )?;
    let alert_flag = truthy(fields.get("alert"));
    let rssi = fields.get("rssi").and_then(Value::as_f64).map(|v| v.round() as i32);

    Ok(DecodedPayload {
        sample: Sample::new(temperature, vibration, alert_flag, captured_at),
        rssi,
    })
}

fn parse_object(raw: &[u8]) -> Result<Map<String, Value>, IngestError> {
    let malformed = |reason: String| IngestError::MalformedPayload {
        raw: String::from_utf8_lossy(raw).into_owned(),
        reason,
    };

    match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(malformed(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn number_or_zero(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(0.0)
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    }
}

fn apply_policy(
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
    policy: RangePolicy,
) -> Result<f64, IngestError> {
    let in_range = (min..=max).contains(&value);
    match policy {
        RangePolicy::Pass => Ok(value),
        RangePolicy::Clamp => Ok(value.clamp(min, max)),
        RangePolicy::Reject if in_range => Ok(value),
        RangePolicy::Reject => Err(IngestError::OutOfRange { field, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> Result<DecodedPayload, IngestError> {
        decode_payload(raw.as_bytes(), "12:00:00", RangePolicy::Pass)
    }

    #[test]
    fn test_decode_full_payload() {
        let d = decode(r#"{"temperature":51,"vibration":10,"alert":0}"#).unwrap();
        assert_eq!(d.sample, Sample::new(51.0, 10.0, false, "12:00:00"));
        assert!(d.rssi.is_none());
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let d = decode(r#"{"vibration":85}"#).unwrap();
        assert_eq!(d.sample.temperature, 0.0);
        assert_eq!(d.sample.vibration, 85.0);
        assert!(!d.sample.alert_flag);
    }

    #[test]
    fn test_empty_object_is_all_defaults() {
        let d = decode("{}").unwrap();
        assert_eq!(d.sample, Sample::new(0.0, 0.0, false, "12:00:00"));
    }

    #[test]
    fn test_non_numeric_fields_default_to_zero() {
        let d = decode(r#"{"temperature":"hot","vibration":null,"alert":"yes"}"#).unwrap();
        assert_eq!(d.sample.temperature, 0.0);
        assert_eq!(d.sample.vibration, 0.0);
        assert!(!d.sample.alert_flag);
    }

    #[test]
    fn test_alert_truthiness() {
        assert!(decode(r#"{"alert":1}"#).unwrap().sample.alert_flag);
        assert!(decode(r#"{"alert":true}"#).unwrap().sample.alert_flag);
        assert!(decode(r#"{"alert":2}"#).unwrap().sample.alert_flag);
        assert!(!decode(r#"{"alert":0}"#).unwrap().sample.alert_flag);
        assert!(!decode(r#"{"alert":false}"#).unwrap().sample.alert_flag);
    }

    #[test]
    fn test_payload_timestamp_is_ignored() {
        let d = decode(r#"{"temperature":20.5,"timestamp":"1999-01-01T00:00:00Z"}"#).unwrap();
        assert_eq!(d.sample.captured_at, "12:00:00");
    }

    #[test]
    fn test_rssi_is_extracted() {
        let d = decode(r#"{"temperature":20,"rssi":-61}"#).unwrap();
        assert_eq!(d.rssi, Some(-61));
    }

    #[test]
    fn test_not_json_is_malformed() {
        let err = decode("not json").unwrap_err();
        match err {
            IngestError::MalformedPayload { raw, .. } => assert_eq!(raw, "not json"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_object_json_is_malformed() {
        for raw in ["42", "[1,2]", "null", "\"text\"", "true"] {
            let err = decode(raw).unwrap_err();
            assert_eq!(err.kind(), "MalformedPayload", "payload {}", raw);
        }
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let err = decode_payload(&[0xff, 0xfe, b'{'], "", RangePolicy::Pass).unwrap_err();
        assert_eq!(err.kind(), "MalformedPayload");
    }

    #[test]
    fn test_pass_policy_keeps_out_of_range() {
        let d = decode(r#"{"temperature":-12.5,"vibration":140}"#).unwrap();
        assert_eq!(d.sample.temperature, -12.5);
        assert_eq!(d.sample.vibration, 140.0);
    }

    #[test]
    fn test_clamp_policy_bounds_values() {
        let d = decode_payload(
            br#"{"temperature":400,"vibration":-3}"#,
            "",
            RangePolicy::Clamp,
        )
        .unwrap();
        assert_eq!(d.sample.temperature, 150.0);
        assert_eq!(d.sample.vibration, 0.0);
    }

    #[test]
    fn test_reject_policy_reports_field() {
        let err = decode_payload(br#"{"temperature":20,"vibration":101}"#, "", RangePolicy::Reject)
            .unwrap_err();
        assert_eq!(
            err,
            IngestError::OutOfRange {
                field: "vibration",
                value: 101.0
            }
        );

        let ok = decode_payload(br#"{"temperature":150,"vibration":100}"#, "", RangePolicy::Reject);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_range_policy_deserializes_lowercase() {
        let p: RangePolicy = serde_json::from_str("\"clamp\"").unwrap();
        assert_eq!(p, RangePolicy::Clamp);
        assert_eq!(RangePolicy::default(), RangePolicy::Pass);
    }
}
