//! Sample source abstraction.
//!
//! A source turns some transport (a broker subscription, a TCP stream, a
//! file, the built-in simulator) into a sequence of [`Inbound`] events. The
//! owner of the [`TelemetryProcessor`](crate::TelemetryProcessor) polls the
//! source and applies each event, so sources never touch processor state.

mod channel;
mod file;
mod simulated;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use simulated::{Generator, SimulatedSource};
pub use stream::StreamSource;

use std::fmt::Debug;

use pulsewatch_types::Sample;

/// One event from a source.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// The transport established its connection.
    Connected,
    /// The transport closed cleanly.
    Disconnected,
    /// The transport failed; the reason is shown to the operator.
    Errored(String),
    /// A raw payload received on a topic.
    Message { topic: String, payload: Vec<u8> },
    /// An already-built sample, as produced by the generator.
    Sample(Sample),
}

impl Inbound {
    /// Build a message event.
    pub fn message(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Inbound::Message {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// Whether this event only reports connectivity.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Inbound::Connected | Inbound::Disconnected | Inbound::Errored(_)
        )
    }
}

/// Trait for receiving telemetry from various sources.
///
/// # Example
///
/// ```
/// use pulsewatch::{Inbound, SampleSource, SimulatedSource};
/// use pulsewatch::config::SimulatorSettings;
///
/// let mut source = SimulatedSource::new(SimulatorSettings::default());
/// assert_eq!(source.poll(), Some(Inbound::Connected));
/// assert!(matches!(source.poll(), Some(Inbound::Sample(_))));
/// ```
pub trait SampleSource: Send + Debug {
    /// Poll for the next event.
    ///
    /// Returns `None` when nothing is pending. Never blocks.
    fn poll(&mut self) -> Option<Inbound>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// The most recent transport error, if the source is currently failing.
    fn error(&self) -> Option<&str>;
}
