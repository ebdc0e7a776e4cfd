// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # pulsewatch
//!
//! A terminal dashboard and stream processor for live IoT telemetry.
//!
//! A device publishes JSON readings (`temperature`, `vibration`, `alert`) to a
//! broker topic. pulsewatch receives them, validates and normalizes each
//! payload, keeps a bounded rolling history, derives alert state, and renders
//! gauges, a rolling chart and a raw message console. A built-in simulator
//! stands in for the device on demand.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          Application                             │
//! │  ┌─────────┐    ┌─────────────────────┐    ┌─────────┐           │
//! │  │  app    │───▶│ data                │───▶│   ui    │──▶ Terminal│
//! │  │ (actor) │    │ TelemetryProcessor  │    │(render) │           │
//! │  └────┬────┘    └─────────────────────┘    └─────────┘           │
//! │       │ Inbound events                                           │
//! │  ┌────┴────┐                                                     │
//! │  │ source  │◀── MQTT | StreamSource | FileSource | Simulated     │
//! │  └─────────┘                                                     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: The processor core: lenient payload decoding, the bounded
//!   [`History`] and [`RawLog`], and alert evaluation against [`Thresholds`]
//! - **[`source`]**: The [`SampleSource`] trait and its implementations.
//!   Sources only produce [`Inbound`] events and never touch processor state
//! - **[`app`]**: The single writer. Drains sources every frame and applies
//!   events to the processor
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Layered [`Settings`] (defaults, TOML file, environment)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Simulated device
//! pulsewatch
//!
//! # Newline-delimited payloads over TCP
//! pulsewatch --connect localhost:9090
//!
//! # MQTT broker (requires the "subscribe" feature)
//! pulsewatch --subscribe --topic plant/line-1/telemetry
//! ```
//!
//! ### As a library
//!
//! ```
//! use pulsewatch::{Settings, TelemetryProcessor};
//!
//! let mut processor = TelemetryProcessor::new(&Settings::default());
//! processor.ingest(br#"{"temperature":47.5,"vibration":85,"alert":0}"#).unwrap();
//!
//! assert!(processor.is_alarming());
//! assert_eq!(processor.latest().vibration, 85.0);
//! ```
//!
//! ### Feeding a processor from a channel
//!
//! ```
//! use pulsewatch::{ChannelSource, Inbound, SampleSource, TelemetryProcessor};
//!
//! let (tx, mut source) = ChannelSource::create("bridge");
//! tx.try_send(Inbound::Connected).unwrap();
//! tx.try_send(Inbound::message("plant/line-1", br#"{"temperature":21}"#.to_vec()))
//!     .unwrap();
//!
//! let mut processor = TelemetryProcessor::default();
//! while let Some(event) = source.poll() {
//!     let _ = processor.apply(event);
//! }
//! assert!(processor.status().online);
//! assert_eq!(processor.snapshot().len(), 1);
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod source;
pub mod ui;

// MQTT integration module (requires "subscribe" feature)
#[cfg(feature = "subscribe")]
pub mod subscribe;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::{
    decode_payload, AlertState, History, Metric, RangePolicy, RawLog, RawMessage,
    TelemetryProcessor, Thresholds,
};
pub use error::IngestError;
pub use pulsewatch_types::{AlertLevel, DeviceStatus, LinkState, Sample};
pub use source::{
    ChannelSource, FileSource, Generator, Inbound, SampleSource, SimulatedSource, StreamSource,
};
