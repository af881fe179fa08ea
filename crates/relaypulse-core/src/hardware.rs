use async_trait::async_trait;

use crate::error::Result;

/// Contract for the binary actuator (relay coil, pump contactor, lamp
/// driver) the scheduler's consumer toggles on every emitted event.
///
/// Implementations must be `Send` so a consumer task can own one across
/// await points. The scheduling engine itself never touches this trait;
/// only the process wiring does.
///
/// Expected lifecycle: drivers boot into the low (safe) state, and callers
/// force [`set_low`](Actuator::set_low) again when the event stream closes,
/// so a cancelled schedule can never leave the load energised.
#[async_trait]
pub trait Actuator: Send {
    /// Energise the output.
    async fn set_high(&mut self) -> Result<()>;

    /// De-energise the output. This is the safe/shutdown state.
    async fn set_low(&mut self) -> Result<()>;

    /// Current output state: `true` when energised.
    async fn read(&mut self) -> Result<bool>;

    /// Flip the output to the opposite state.
    async fn toggle(&mut self) -> Result<()> {
        if self.read().await? {
            self.set_low().await
        } else {
            self.set_high().await
        }
    }
}

/// Contract for a digital touch sensor sampled on a poll interval.
///
/// The watcher in `relaypulse-trip` owns the probe and compares each sample
/// against the configured idle level; anything else counts as a touch.
#[async_trait]
pub trait TouchProbe: Send {
    /// Raw logic level currently on the sensor pin.
    async fn sample(&mut self) -> Result<bool>;
}
