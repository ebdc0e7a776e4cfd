//! Error types for payload ingestion.

use thiserror::Error;

/// Errors returned when an inbound payload cannot become a sample.
///
/// None of these are fatal: the payload is dropped, the raw text stays in
/// the raw log, and previously accepted state is kept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    /// The payload is not a JSON object.
    #[error("malformed payload: {reason}")]
    MalformedPayload {
        /// Payload text as received (lossy UTF-8).
        raw: String,
        /// Decoder message.
        reason: String,
    },

    /// A value fell outside its domain range under the `reject` policy.
    #[error("{field} out of range: {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The value as received.
        value: f64,
    },
}

impl IngestError {
    /// Short kind name for logs and the status bar.
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::MalformedPayload { .. } => "MalformedPayload",
            IngestError::OutOfRange { .. } => "OutOfRangeValue",
        }
    }
}
