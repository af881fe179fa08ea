use std::time::Duration;

use anyhow::Context;
use relaypulse_core::{Actuator, RelayPulseConfig, Schedule};
use relaypulse_scheduler::{pulse_every, tick_every, DailyScheduler};
use relaypulse_trip::{fan_in, watch_os_signals, watch_touch, Breaker};
use tracing::{debug, error, info, warn};

mod sim;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relaypulse=info".into()),
        )
        .init();

    // config path: explicit RELAYPULSE_CONFIG > ~/.relaypulse/relaypulse.toml.
    // A config that fails to load or validate stops the process here; a
    // schedule nobody asked for must never start driving the relay.
    let config_path = std::env::var("RELAYPULSE_CONFIG").ok();
    let config =
        RelayPulseConfig::load(config_path.as_deref()).context("loading configuration")?;

    info!(app = %config.app_name, schedule = ?config.schedule, "starting");

    // One breaker for the whole process: OS signals and the touch sensor
    // fan into it, and a supervisor could trip it directly.
    let breaker = Breaker::new();
    let os_signals = watch_os_signals(breaker.signal());
    let touches = watch_touch(
        sim::InertTouch,
        Duration::from_millis(config.sensor.poll_ms),
        config.sensor.idle_level,
        breaker.signal(),
    );
    fan_in(&breaker, [os_signals, touches]);

    let mut events = match &config.schedule {
        Schedule::Interval { every_secs } => {
            tick_every(Duration::from_secs(*every_secs), breaker.signal())
        }
        Schedule::IntervalPulse {
            every_secs,
            width_secs,
        } => pulse_every(
            Duration::from_secs(*every_secs),
            Duration::from_secs(*width_secs),
            breaker.signal(),
        ),
        Schedule::DailyAt { at } => DailyScheduler::single(at)
            .context("building daily schedule")?
            .start(breaker.signal()),
        Schedule::DailyPulseAt { at, width_secs } => {
            DailyScheduler::pulsed(at, Duration::from_secs(*width_secs))
                .context("building daily pulse schedule")?
                .start(breaker.signal())
        }
    };

    // One toggle per emitted edge. The stream closing is the only shutdown
    // signal the consumer gets, and it means the relay must go safe.
    let mut relay = sim::BenchRelay::default();
    while let Some(ev) = events.recv().await {
        debug!(at = %ev, "schedule edge");
        if let Err(e) = relay.toggle().await {
            error!(error = %e, "relay toggle failed");
        }
    }

    warn!("event stream closed, forcing relay low");
    if let Err(e) = relay.set_low().await {
        error!(error = %e, "relay did not reach its safe state");
    }
    info!("shutdown complete");
    Ok(())
}
