//! `relaypulse-trip` — cancellation fan-in for the scheduling engine.
//!
//! Borrowing the vocabulary of relay protection: a [`Breaker`] is the shared
//! one-shot shutdown flag, and tripping it is how anything in the process
//! asks everything else to stop. Trip requests come from independent
//! sources, all merged through [`fan_in`]:
//!
//! | Source                  | Provided by                        |
//! |-------------------------|------------------------------------|
//! | OS termination signal   | [`sys::watch_os_signals`]          |
//! | Touch sensor            | [`sensors::watch_touch`]           |
//! | Supervisor decision     | a direct [`Breaker::trip`] call    |
//!
//! Once tripped the breaker stays tripped; raising it again is a no-op, and
//! every [`TripSignal`] waiter observes the same outcome regardless of when
//! it started waiting.

pub mod fanin;
pub mod sensors;
pub mod signal;
pub mod sys;

pub use fanin::fan_in;
pub use sensors::watch_touch;
pub use signal::{Breaker, TripSignal};
pub use sys::watch_os_signals;
