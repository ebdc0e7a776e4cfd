//! Stream-based sample source.
//!
//! Receives device payloads from an async byte stream, one JSON document per
//! line. This is useful for network-based sources like TCP connections or a
//! serial bridge.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use super::channel::{ChannelSource, DEFAULT_CHANNEL_CAPACITY};
use super::{Inbound, SampleSource};

/// A source that reads newline-delimited payloads on a background task.
///
/// The task reports `Connected` when it starts, one `Message` per non-empty
/// line, then `Disconnected` at end of stream or `Errored` on a read error.
/// Payloads are forwarded untouched; decoding is the processor's job.
///
/// # Example with a byte stream
///
/// ```
/// use std::io::Cursor;
/// use pulsewatch::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"{\"temperature\":21.5}\n";
/// let stream = Cursor::new(data.to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    inner: ChannelSource,
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        let topic = description.to_string();

        tokio::spawn(async move {
            if tx.send(Inbound::Connected).await.is_err() {
                return;
            }

            let mut reader = BufReader::new(reader);
            let mut line = Vec::new();

            loop {
                line.clear();
                let event = match reader.read_until(b'\n', &mut line).await {
                    Ok(0) => {
                        let _ = tx.send(Inbound::Disconnected).await;
                        break;
                    }
                    Ok(_) => {
                        // Bytes are forwarded as-is; invalid UTF-8 is the processor's call
                        let payload = line.trim_ascii();
                        if payload.is_empty() {
                            continue;
                        }
                        Inbound::message(topic.as_str(), payload)
                    }
                    Err(e) => {
                        let _ = tx.send(Inbound::Errored(format!("Read error: {}", e))).await;
                        break;
                    }
                };

                if tx.send(event).await.is_err() {
                    debug!(source = %topic, "receiver dropped, stopping stream reader");
                    break;
                }
            }
        });

        Self {
            inner: ChannelSource::with_description(rx, format!("stream: {}", description)),
        }
    }

    /// Create a StreamSource from a raw bytes channel.
    ///
    /// Each received buffer is one payload. This is useful when another
    /// component already frames messages and only needs to hand over bytes.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let (tx, events) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        let topic = description.to_string();

        tokio::spawn(async move {
            if tx.send(Inbound::Connected).await.is_err() {
                return;
            }
            while let Some(bytes) = rx.recv().await {
                if tx.send(Inbound::message(topic.as_str(), bytes)).await.is_err() {
                    return;
                }
            }
            let _ = tx.send(Inbound::Disconnected).await;
        });

        Self {
            inner: ChannelSource::with_description(events, format!("stream: {}", description)),
        }
    }
}

impl SampleSource for StreamSource {
    fn poll(&mut self) -> Option<Inbound> {
        self.inner.poll()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    fn error(&self) -> Option<&str> {
        self.inner.error()
    }
}
