//! `relaypulse-scheduler` — wall-clock tick and pulse scheduling.
//!
//! # Overview
//!
//! Everything here emits [`TickEvent`](relaypulse_core::TickEvent)
//! timestamps over a small mpsc channel; the consumer toggles an actuator
//! per event. Four cadences are offered:
//!
//! | Source                        | Behaviour                                            |
//! |-------------------------------|------------------------------------------------------|
//! | [`tick_every`]                | One tick per fixed interval, forever                 |
//! | [`pulse_every`]               | An on/off pair per fixed interval, `width` apart     |
//! | [`DailyScheduler::single`]    | One tick a day at `HH:MM` local time                 |
//! | [`DailyScheduler::pulsed`]    | One on/off pair a day starting at `HH:MM` local time |
//!
//! Daily schedules anchor themselves on start: whatever "today" should
//! already have produced by now is replayed (or skipped, if a pulse window
//! has fully elapsed) before the steady 24-hour cycle begins, so the relay
//! ends up in the state it would hold had the process been running since
//! midnight.
//!
//! Every wait races the shared [`TripSignal`](relaypulse_trip::TripSignal);
//! a trip at any point closes the stream without emitting further events,
//! and a closed stream is the only termination a consumer ever observes.

pub mod clock;
pub mod engine;
pub mod error;
pub mod sources;

pub use clock::{clock_offset, ClockSpec};
pub use engine::DailyScheduler;
pub use error::{Result, SchedulerError};
pub use sources::{pulse_every, tick_every};
