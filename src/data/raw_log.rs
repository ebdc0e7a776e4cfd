//! Diagnostic ring of raw inbound payloads.
//!
//! Unlike [`History`](super::History), which is oldest-first, the raw log
//! is newest-first: index 0 is always the most recent message. Both valid
//! and malformed payloads are recorded.

use std::collections::VecDeque;
use std::fmt;

/// Default number of raw messages kept.
pub const DEFAULT_RAW_LOG_CAPACITY: usize = 16;

/// Prefix shown in front of payloads that failed to decode.
pub const MALFORMED_PREFIX: &str = "WARN: ";

/// One raw inbound message as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    text: String,
    malformed: bool,
    received_at: String,
}

impl RawMessage {
    /// The payload text, untagged.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the payload failed to decode.
    pub fn is_malformed(&self) -> bool {
        self.malformed
    }

    /// Receipt-time label.
    pub fn received_at(&self) -> &str {
        &self.received_at
    }
}

impl fmt::Display for RawMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.malformed {
            write!(f, "{}{}", MALFORMED_PREFIX, self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}

/// Fixed-capacity, newest-first log of raw payload text.
#[derive(Debug, Clone)]
pub struct RawLog {
    entries: VecDeque<RawMessage>,
    capacity: usize,
}

impl Default for RawLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RawLog {
    /// Create an empty log with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RAW_LOG_CAPACITY)
    }

    /// Create an empty log holding at most `capacity` entries (minimum one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a message at the front, evicting the oldest past capacity.
    pub fn record(&mut self, text: impl Into<String>, received_at: impl Into<String>) {
        self.push(RawMessage {
            text: text.into(),
            malformed: false,
            received_at: received_at.into(),
        });
    }

    /// Tag the most recent entry as malformed.
    ///
    /// Decoding happens after recording, so the tag is applied afterwards.
    pub fn mark_latest_malformed(&mut self) {
        if let Some(front) = self.entries.front_mut() {
            front.malformed = true;
        }
    }

    fn push(&mut self, message: RawMessage) {
        self.entries.push_front(message);
        self.entries.truncate(self.capacity);
    }

    /// Newest-first copy of the log.
    pub fn recent(&self) -> Vec<RawMessage> {
        self.entries.iter().cloned().collect()
    }

    /// Iterate newest-first without copying.
    pub fn iter(&self) -> impl Iterator<Item = &RawMessage> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Count of malformed entries currently held.
    pub fn malformed_count(&self) -> usize {
        self.entries.iter().filter(|m| m.malformed).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
