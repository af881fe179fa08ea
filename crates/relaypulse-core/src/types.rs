use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One full wall-clock day; daily schedules cycle on this after anchoring.
pub const DAY: Duration = Duration::from_secs(86_400);
pub const HOUR: Duration = Duration::from_secs(3_600);
pub const MINUTE: Duration = Duration::from_secs(60);

/// A single scheduling event: the instant an actuator-affecting edge occurred
/// (pulse-start, pulse-end, or a plain tick).
///
/// Carries nothing beyond the timestamp; consumers rely on emission order,
/// which producers guarantee within one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvent {
    /// Local wall-clock time of emission.
    pub at: DateTime<Local>,
}

impl TickEvent {
    /// Stamp an event with the current local time.
    pub fn now() -> Self {
        Self { at: Local::now() }
    }
}

impl std::fmt::Display for TickEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.at.to_rfc3339())
    }
}
