use thiserror::Error;

/// Errors that can occur while building a schedule.
///
/// All of them are construction-time and fatal: time itself cannot fail, so
/// a scheduler that starts successfully never errors afterwards.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The clock string does not split into two numeric fields on `:`.
    #[error("Invalid clock format {got:?}, expected HH:MM (e.g. 13:04)")]
    MalformedClock { got: String },

    /// Numeric fields outside the 24-hour clock; rejected rather than
    /// silently wrapped into a schedule nobody asked for.
    #[error("Clock {hour:02}:{minute:02} out of range (hour 0-23, minute 0-59)")]
    ClockOutOfRange { hour: u32, minute: u32 },
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
