//! `relaypulse-core` — shared types, configuration model, and hardware seams.
//!
//! Everything here is passive: the scheduling engine lives in
//! `relaypulse-scheduler`, cancellation plumbing in `relaypulse-trip`. This
//! crate defines what they exchange — [`TickEvent`] timestamps, the immutable
//! [`Schedule`] configuration constructed once at process start, and the
//! trait contracts ([`Actuator`], [`TouchProbe`]) that real hardware drivers
//! implement elsewhere.

pub mod config;
pub mod error;
pub mod hardware;
pub mod types;

pub use config::{RelayPulseConfig, Schedule, SensorConfig};
pub use error::{CoreError, Result};
pub use hardware::{Actuator, TouchProbe};
pub use types::TickEvent;
