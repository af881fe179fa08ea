//! Bench stand-ins for the hardware seams.
//!
//! Real deployments implement [`Actuator`] and [`TouchProbe`] over their
//! GPIO stack of choice; these versions only log, so the daemon runs — and
//! the wiring can be exercised — on any machine.

use async_trait::async_trait;
use relaypulse_core::{Actuator, Result, TouchProbe};
use tracing::info;

/// Relay stand-in: remembers its coil state and logs every transition.
#[derive(Debug, Default)]
pub struct BenchRelay {
    energised: bool,
}

#[async_trait]
impl Actuator for BenchRelay {
    async fn set_high(&mut self) -> Result<()> {
        self.energised = true;
        info!("relay energised");
        Ok(())
    }

    async fn set_low(&mut self) -> Result<()> {
        self.energised = false;
        info!("relay released");
        Ok(())
    }

    async fn read(&mut self) -> Result<bool> {
        Ok(self.energised)
    }
}

/// Touch probe stand-in that never reports a touch.
#[derive(Debug, Default)]
pub struct InertTouch;

#[async_trait]
impl TouchProbe for InertTouch {
    async fn sample(&mut self) -> Result<bool> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn toggle_alternates_the_coil_state() {
        let mut relay = BenchRelay::default();
        assert!(!relay.read().await.unwrap());

        relay.toggle().await.unwrap();
        assert!(relay.read().await.unwrap());

        relay.toggle().await.unwrap();
        assert!(!relay.read().await.unwrap());
    }
}
