//! # pulsewatch-types
//!
//! Data contracts shared between telemetry producers, the pulsewatch stream
//! processor, and anything that renders its output.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature to export samples as JSON
//! - **Transport agnostic**: Samples carry no broker, topic or connection details
//! - **Immutable readings**: A [`Sample`] is built once and never edited in place
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON/MessagePack/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use pulsewatch_types::{AlertLevel, DeviceStatus, LinkState, Sample};
//!
//! let sample = Sample::builder()
//!     .temperature(48.5)
//!     .vibration(72.0)
//!     .captured_at("14:02:11")
//!     .build();
//!
//! assert!(!sample.alert_flag);
//! assert!(!Sample::empty().alert_flag);
//!
//! let status = DeviceStatus::new("10.0.0.12");
//! assert_eq!(status.link, LinkState::Waiting);
//! assert_eq!(AlertLevel::Critical.label(), "CRITICAL ALERT");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod alert;
mod sample;
mod status;

pub use alert::*;
pub use sample::*;
pub use status::*;
