//! Channel-based sample source.
//!
//! Receives [`Inbound`] events over a tokio mpsc channel. Transport bridges
//! (the MQTT subscriber, the stream reader) push events from their own tasks
//! and the TUI drains them here.

use tokio::sync::mpsc;

use super::{Inbound, SampleSource};

/// Default queue depth between a producer task and the poller.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// A source fed by a channel of events.
///
/// # Example
///
/// ```
/// use pulsewatch::{ChannelSource, Inbound, SampleSource};
///
/// let (tx, mut source) = ChannelSource::create("mqtt://localhost");
/// tx.try_send(Inbound::Connected).unwrap();
/// assert_eq!(source.poll(), Some(Inbound::Connected));
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<Inbound>,
    description: String,
    last_error: Option<String>,
    /// The last connectivity event reported the link down.
    link_down: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of an mpsc channel
    /// * `source_description` - Where the events come from
    ///   (e.g., "mqtt://broker:1883/plant/line-1")
    pub fn new(receiver: mpsc::Receiver<Inbound>, source_description: &str) -> Self {
        Self::with_description(receiver, format!("channel: {}", source_description))
    }

    pub(crate) fn with_description(receiver: mpsc::Receiver<Inbound>, description: String) -> Self {
        Self {
            receiver,
            description,
            last_error: None,
            link_down: false,
        }
    }

    /// Create a channel pair for sending events to a ChannelSource.
    pub fn create(source_description: &str) -> (mpsc::Sender<Inbound>, Self) {
        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        (tx, Self::new(rx, source_description))
    }

    fn track(&mut self, event: &Inbound) {
        match event {
            Inbound::Connected => {
                self.last_error = None;
                self.link_down = false;
            }
            Inbound::Disconnected => {
                self.last_error = Some("Connection closed".to_string());
                self.link_down = true;
            }
            Inbound::Errored(reason) => {
                self.last_error = Some(reason.clone());
                self.link_down = true;
            }
            Inbound::Message { .. } | Inbound::Sample(_) => {}
        }
    }
}

impl SampleSource for ChannelSource {
    fn poll(&mut self) -> Option<Inbound> {
        match self.receiver.try_recv() {
            Ok(event) => {
                self.track(&event);
                Some(event)
            }
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                // Producer is gone; report the link down once.
                if self.link_down {
                    return None;
                }
                let event = Inbound::Disconnected;
                self.track(&event);
                Some(event)
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
