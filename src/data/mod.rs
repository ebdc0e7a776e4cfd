//! Telemetry processing core.
//!
//! Everything the dashboard shows is derived here from one inbound message
//! at a time.
//!
//! ## Submodules
//!
//! - [`payload`]: Lenient JSON decoding and range policy
//! - [`history`]: Bounded, oldest-first sample window
//! - [`raw_log`]: Bounded, newest-first log of raw payload text
//! - [`alert`]: Threshold evaluation ([`Thresholds`], [`AlertState`])
//! - [`processor`]: [`TelemetryProcessor`], tying the above together
//! - [`duration`]: Parsing and formatting of duration strings
//!
//! ## Data Flow
//!
//! ```text
//! Inbound::Message (raw bytes)
//!        │
//!        ├──▶ RawLog::record()          (always, before decoding)
//!        ▼
//! decode_payload()  ──Err──▶ RawLog::mark_latest_malformed()
//!        │
//!        ▼
//! History::append()  ──▶  AlertState::evaluate(latest)
//! ```

pub mod alert;
pub mod duration;
pub mod history;
pub mod payload;
pub mod processor;
pub mod raw_log;

pub use alert::{AlertState, Thresholds};
pub use history::{History, Metric};
pub use payload::{decode_payload, DecodedPayload, RangePolicy};
pub use processor::TelemetryProcessor;
pub use raw_log::{RawLog, RawMessage};
