use thiserror::Error;

/// Errors surfaced while constructing configuration or talking to hardware.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration sources could not be read or merged.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A tick interval below the relay-protection floor.
    #[error("Interval of {secs}s is too short; cycling faster than 10s wears out the relay")]
    IntervalTooShort { secs: u64 },

    /// A pulse width below the relay-protection floor.
    #[error("Pulse width of {secs}s is too short; anything under 10s wears out the relay")]
    WidthTooShort { secs: u64 },

    /// A pulse must finish before the next cycle begins.
    #[error("Pulse width {width_secs}s must be shorter than the {interval_secs}s interval")]
    WidthBeyondInterval { width_secs: u64, interval_secs: u64 },

    /// The clock string does not have the `HH:MM` shape.
    #[error("Invalid clock format {got:?}, expected HH:MM (e.g. 13:04)")]
    MalformedClock { got: String },

    /// A peripheral read or write failed.
    #[error("Hardware fault: {0}")]
    Hardware(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
