//! The telemetry stream processor.
//!
//! Turns one inbound message at a time into updated state: the rolling
//! [`History`], the [`RawLog`], and the [`DeviceStatus`]. Every read is a
//! pure view; alert state is derived on demand from the latest sample.

use std::time::{Duration, Instant};

use pulsewatch_types::{DeviceStatus, LinkState, Sample};
use rand::Rng;
use tracing::{debug, info, warn};

use super::alert::{AlertState, Thresholds};
use super::history::History;
use super::payload::{decode_payload, RangePolicy};
use super::raw_log::{RawLog, RawMessage};
use crate::config::Settings;
use crate::error::IngestError;
use crate::source::Inbound;

/// Current wall-clock time as a capture label (`HH:MM:SS`, 24-hour).
pub fn capture_label() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Single-writer telemetry state.
///
/// Construct one per feed; instances share nothing. Mutations must be
/// serialized by the owner (the TUI applies them from its event loop).
///
/// # Example
///
/// ```
/// use pulsewatch::TelemetryProcessor;
///
/// let mut processor = TelemetryProcessor::default();
/// let sample = processor
///     .ingest(br#"{"temperature":51,"vibration":10,"alert":0}"#)
///     .unwrap();
///
/// assert_eq!(sample.temperature, 51.0);
/// assert!(processor.is_alarming());
/// assert!(processor.ingest(b"not json").is_err());
/// assert_eq!(processor.snapshot().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TelemetryProcessor {
    history: History,
    raw_log: RawLog,
    status: DeviceStatus,
    thresholds: Thresholds,
    range_policy: RangePolicy,
    signal_base: i32,
    signal_jitter: u32,
    connected_at: Option<Instant>,
    last_update: Option<Instant>,
    accepted: u64,
    rejected: u64,
}

impl Default for TelemetryProcessor {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl TelemetryProcessor {
    /// Create an empty processor from settings.
    pub fn new(settings: &Settings) -> Self {
        Self {
            history: History::with_capacity(settings.buffers.history),
            raw_log: RawLog::with_capacity(settings.buffers.raw_log),
            status: DeviceStatus::new(settings.device.identity.clone()),
            thresholds: settings.thresholds.clone(),
            range_policy: settings.ingest.range_policy,
            signal_base: settings.device.signal_base,
            signal_jitter: settings.device.signal_jitter,
            connected_at: None,
            last_update: None,
            accepted: 0,
            rejected: 0,
        }
    }

    /// Ingest a raw payload, stamping it with the current wall-clock label.
    pub fn ingest(&mut self, raw: &[u8]) -> Result<Sample, IngestError> {
        self.ingest_at(raw, &capture_label())
    }

    /// Ingest a raw payload with an explicit capture label.
    ///
    /// The raw text is logged before decoding, so malformed payloads are
    /// recorded too. On error, history and status are unchanged.
    pub fn ingest_at(&mut self, raw: &[u8], captured_at: &str) -> Result<Sample, IngestError> {
        self.raw_log
            .record(String::from_utf8_lossy(raw).into_owned(), captured_at);

        match decode_payload(raw, captured_at, self.range_policy) {
            Ok(decoded) => {
                let signal = decoded.rssi.unwrap_or_else(|| self.estimate_signal());
                self.status.link = LinkState::Live;
                self.status.signal_strength = signal;
                self.accept(decoded.sample.clone());
                Ok(decoded.sample)
            }
            Err(e) => {
                if matches!(e, IngestError::MalformedPayload { .. }) {
                    self.raw_log.mark_latest_malformed();
                }
                self.rejected += 1;
                warn!(kind = e.kind(), error = %e, "dropped inbound payload");
                Err(e)
            }
        }
    }

    /// Append an already-built sample, as produced by the generator.
    pub fn append(&mut self, sample: Sample) {
        self.accept(sample);
    }

    fn accept(&mut self, sample: Sample) {
        debug!(
            temperature = sample.temperature,
            vibration = sample.vibration,
            alert = sample.alert_flag,
            captured_at = %sample.captured_at,
            "accepted sample"
        );
        self.history.append(sample);
        self.accepted += 1;
        self.last_update = Some(Instant::now());
    }

    fn estimate_signal(&self) -> i32 {
        if self.signal_jitter == 0 {
            return self.signal_base;
        }
        let offset = rand::thread_rng().gen_range(0..self.signal_jitter);
        self.signal_base
            .saturating_add(i32::try_from(offset).unwrap_or(i32::MAX))
    }

    /// Apply one inbound event.
    ///
    /// Returns the accepted sample, if the event produced one.
    pub fn apply(&mut self, event: Inbound) -> Result<Option<Sample>, IngestError> {
        match event {
            Inbound::Connected => {
                self.on_connected();
                Ok(None)
            }
            Inbound::Disconnected => {
                self.on_disconnected();
                Ok(None)
            }
            Inbound::Errored(reason) => {
                self.on_error(reason);
                Ok(None)
            }
            Inbound::Message { payload, .. } => self.ingest(&payload).map(Some),
            Inbound::Sample(sample) => {
                self.status.link = LinkState::Live;
                self.append(sample.clone());
                Ok(Some(sample))
            }
        }
    }

    /// The transport reports an established connection.
    pub fn on_connected(&mut self) {
        if !self.status.online {
            info!(identity = %self.status.identity, "telemetry link up");
            self.connected_at = Some(Instant::now());
        }
        self.status.online = true;
        self.status.last_error = None;
    }

    /// The transport reports a clean disconnect. History is kept.
    pub fn on_disconnected(&mut self) {
        if self.status.online {
            info!(identity = %self.status.identity, "telemetry link down");
        }
        self.status.online = false;
        self.connected_at = None;
    }

    /// The transport reports a failure. History is kept.
    pub fn on_error(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(identity = %self.status.identity, error = %reason, "telemetry source unavailable");
        self.status.online = false;
        self.status.last_error = Some(reason);
        self.connected_at = None;
    }

    /// Clear history, raw log and counters. Connectivity is kept.
    pub fn reset(&mut self) {
        self.history.clear();
        self.raw_log.clear();
        self.status.link = LinkState::Waiting;
        self.accepted = 0;
        self.rejected = 0;
        self.last_update = None;
    }

    /// The most recent sample, or the [`Sample::empty`] sentinel.
    pub fn latest(&self) -> &Sample {
        self.history.latest()
    }

    /// Oldest-first copy of the history window.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.history.snapshot()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Newest-first copy of the raw message log.
    pub fn recent_raw(&self) -> Vec<RawMessage> {
        self.raw_log.recent()
    }

    pub fn raw_log(&self) -> &RawLog {
        &self.raw_log
    }

    /// Alert state of the latest sample.
    pub fn alert_state(&self) -> AlertState {
        AlertState::evaluate(self.latest(), &self.thresholds)
    }

    /// Whether the latest sample is alarming. False when empty.
    pub fn is_alarming(&self) -> bool {
        self.alert_state().is_alarming()
    }

    pub fn status(&self) -> &DeviceStatus {
        &self.status
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// How long the link has been up.
    pub fn uptime(&self) -> Option<Duration> {
        self.connected_at.map(|t| t.elapsed())
    }

    /// Time since the last accepted sample.
    pub fn since_last_update(&self) -> Option<Duration> {
        self.last_update.map(|t| t.elapsed())
    }

    /// Number of samples accepted since start or reset.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Number of payloads rejected since start or reset.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use pulsewatch_types::AlertLevel;

    fn processor() -> TelemetryProcessor {
        TelemetryProcessor::default()
    }

    #[test]
    fn test_empty_processor() {
        let p = processor();
        assert!(p.latest().is_sentinel());
        assert!(!p.is_alarming());
        assert!(p.snapshot().is_empty());
        assert!(p.recent_raw().is_empty());
        assert!(!p.status().online);
        assert_eq!(p.status().link, LinkState::Waiting);
    }

    #[test]
    fn test_ingest_above_threshold_is_alarming() {
        let mut p = processor();
        let s = p
            .ingest_at(br#"{"temperature":51,"vibration":10,"alert":0}"#, "10:00:00")
            .unwrap();

        assert_eq!(s.temperature, 51.0);
        assert!(p.is_alarming());
        assert_eq!(p.alert_state().temperature, AlertLevel::Critical);
        assert_eq!(p.latest(), &s);
    }

    #[test]
    fn test_ingest_partial_payload_defaults() {
        let mut p = processor();
        let s = p.ingest_at(br#"{"vibration":85}"#, "10:00:00").unwrap();

        assert_eq!(s, Sample::new(0.0, 85.0, false, "10:00:00"));
        assert!(p.is_alarming());
    }

    #[test]
    fn test_malformed_payload_keeps_history_and_logs_raw() {
        let mut p = processor();
        p.ingest_at(br#"{"temperature":20}"#, "10:00:00").unwrap();
        let before = p.snapshot();

        let err = p.ingest_at(b"not json", "10:00:01").unwrap_err();
        assert_eq!(err.kind(), "MalformedPayload");

        assert_eq!(p.snapshot(), before);
        let raw = p.recent_raw();
        assert_eq!(raw[0].text(), "not json");
        assert!(raw[0].is_malformed());
        assert_eq!(raw[0].to_string(), "WARN: not json");
        assert_eq!(raw[1].text(), r#"{"temperature":20}"#);
        assert_eq!(p.rejected(), 1);
        assert_eq!(p.accepted(), 1);
    }

    #[test]
    fn test_raw_log_bounded_under_volume() {
        let mut p = processor();
        for i in 0..200 {
            let payload = if i % 3 == 0 {
                "garbage".to_string()
            } else {
                format!(r#"{{"temperature":{}}}"#, i)
            };
            let _ = p.ingest_at(payload.as_bytes(), "");
            assert!(p.recent_raw().len() <= 16);
        }
        assert_eq!(p.recent_raw()[0].text(), r#"{"temperature":199}"#);
        assert_eq!(p.snapshot().len(), 40);
    }

    #[test]
    fn test_history_holds_last_n_in_order() {
        let mut p = processor();
        for i in 0..100 {
            p.ingest_at(format!(r#"{{"vibration":{}}}"#, i).as_bytes(), "")
                .unwrap();
        }

        let snap = p.snapshot();
        assert_eq!(snap.len(), 40);
        let vibrations: Vec<f64> = snap.iter().map(|s| s.vibration).collect();
        let expected: Vec<f64> = (60..100).map(|v| v as f64).collect();
        assert_eq!(vibrations, expected);
    }

    #[test]
    fn test_append_then_latest_is_identical() {
        let mut p = processor();
        let s = Sample::new(33.3, 66.6, true, "11:11:11");
        p.append(s.clone());
        assert_eq!(p.latest(), &s);
        assert_eq!(p.latest().temperature.to_bits(), 33.3f64.to_bits());
    }

    #[test]
    fn test_successful_ingest_updates_link_and_signal() {
        let mut p = processor();
        p.ingest_at(br#"{"temperature":20}"#, "").unwrap();

        assert_eq!(p.status().link, LinkState::Live);
        let rssi = p.status().signal_strength;
        assert!((-55..-45).contains(&rssi), "estimated rssi {}", rssi);

        p.ingest_at(br#"{"temperature":20,"rssi":-70}"#, "").unwrap();
        assert_eq!(p.status().signal_strength, -70);
    }

    #[test]
    fn test_failed_ingest_leaves_status_alone() {
        let mut p = processor();
        let _ = p.ingest_at(b"{", "");
        assert_eq!(p.status().link, LinkState::Waiting);
        assert_eq!(p.status().signal_strength, 0);
    }

    #[test]
    fn test_zero_jitter_uses_base_signal() {
        let mut settings = Settings::default();
        settings.device.signal_base = -60;
        settings.device.signal_jitter = 0;
        let mut p = TelemetryProcessor::new(&settings);

        p.ingest_at(b"{}", "").unwrap();
        assert_eq!(p.status().signal_strength, -60);
    }

    #[test]
    fn test_invalid_utf8_is_logged_lossily() {
        let mut p = processor();
        let err = p.ingest_at(&[0xff, 0xfe], "10:00:00").unwrap_err();
        assert_eq!(err.kind(), "MalformedPayload");

        let raw = p.recent_raw();
        assert_eq!(raw[0].text(), "\u{fffd}\u{fffd}");
        assert!(raw[0].is_malformed());
    }

    #[test]
    fn test_signal_estimate_saturates() {
        let mut settings = Settings::default();
        settings.device.signal_base = i32::MAX - 1;
        settings.device.signal_jitter = u32::MAX;
        let mut p = TelemetryProcessor::new(&settings);

        p.ingest_at(b"{}", "").unwrap();
        assert!(p.status().signal_strength >= i32::MAX - 1);
    }

    #[test]
    fn test_generated_sample_leaves_connectivity_alone() {
        let mut p = processor();
        p.apply(Inbound::Errored("broker down".to_string())).unwrap();

        p.apply(Inbound::Sample(Sample::new(30.0, 5.0, false, "09:00:00")))
            .unwrap();
        assert!(!p.status().online);
        assert_eq!(p.status().last_error.as_deref(), Some("broker down"));
        assert_eq!(p.snapshot().len(), 1);
    }

    #[test]
    fn test_reject_policy_leaves_history_unchanged() {
        let mut settings = Settings::default();
        settings.ingest.range_policy = RangePolicy::Reject;
        let mut p = TelemetryProcessor::new(&settings);

        let err = p.ingest_at(br#"{"temperature":200}"#, "").unwrap_err();
        assert_eq!(err.kind(), "OutOfRangeValue");
        assert!(p.snapshot().is_empty());
        assert!(!p.recent_raw()[0].is_malformed());
    }

    #[test]
    fn test_transport_events() {
        let mut p = processor();
        p.ingest_at(br#"{"temperature":20}"#, "").unwrap();

        p.apply(Inbound::Connected).unwrap();
        assert!(p.status().online);
        assert!(p.uptime().is_some());

        p.apply(Inbound::Errored("broker unreachable".to_string()))
            .unwrap();
        assert!(!p.status().online);
        assert_eq!(p.status().last_error.as_deref(), Some("broker unreachable"));
        assert!(p.uptime().is_none());
        assert_eq!(p.snapshot().len(), 1);

        p.apply(Inbound::Connected).unwrap();
        assert!(p.status().online);
        assert!(p.status().last_error.is_none());

        p.apply(Inbound::Disconnected).unwrap();
        assert!(!p.status().online);
        assert_eq!(p.snapshot().len(), 1);
    }

    #[test]
    fn test_apply_message_and_sample() {
        let mut p = processor();
        let accepted = p
            .apply(Inbound::Message {
                topic: "plant/line-1".to_string(),
                payload: br#"{"temperature":30}"#.to_vec(),
            })
            .unwrap();
        assert_eq!(accepted.map(|s| s.temperature), Some(30.0));

        let generated = Sample::new(44.0, 12.0, false, "09:00:00");
        let accepted = p.apply(Inbound::Sample(generated.clone())).unwrap();
        assert_eq!(accepted, Some(generated.clone()));
        assert_eq!(p.latest(), &generated);
        assert_eq!(p.status().link, LinkState::Live);

        let err = p.apply(Inbound::Message {
            topic: "plant/line-1".to_string(),
            payload: b"oops".to_vec(),
        });
        assert!(err.is_err());
        assert_eq!(p.latest(), &generated);
    }

    #[test]
    fn test_reset_clears_buffers() {
        let mut p = processor();
        p.apply(Inbound::Connected).unwrap();
        p.ingest_at(br#"{"temperature":99}"#, "").unwrap();
        p.reset();

        assert!(p.snapshot().is_empty());
        assert!(p.recent_raw().is_empty());
        assert!(!p.is_alarming());
        assert_eq!(p.accepted(), 0);
        assert_eq!(p.status().link, LinkState::Waiting);
        assert!(p.status().online);
    }

    #[test]
    fn test_instances_are_independent() {
        let mut a = processor();
        let b = processor();
        a.ingest_at(br#"{"temperature":70}"#, "").unwrap();

        assert!(a.is_alarming());
        assert!(!b.is_alarming());
        assert!(b.snapshot().is_empty());
    }

    #[test]
    fn test_custom_capacities() {
        let mut settings = Settings::default();
        settings.buffers.history = 3;
        settings.buffers.raw_log = 2;
        let mut p = TelemetryProcessor::new(&settings);

        for i in 0..5 {
            p.ingest_at(format!(r#"{{"temperature":{}}}"#, i).as_bytes(), "")
                .unwrap();
        }
        assert_eq!(p.snapshot().len(), 3);
        assert_eq!(p.recent_raw().len(), 2);
    }

    #[test]
    fn test_capture_label_format() {
        let label = capture_label();
        assert_eq!(label.len(), 8);
        assert_eq!(label.as_bytes()[2], b':');
        assert_eq!(label.as_bytes()[5], b':');
    }
}
