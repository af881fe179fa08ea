// Shutdown behaviour across the public surface: sources, daily schedules,
// and the trip fan-in working together.

use std::time::Duration;

use relaypulse_core::TickEvent;
use relaypulse_scheduler::{pulse_every, tick_every, DailyScheduler};
use relaypulse_trip::{fan_in, Breaker};
use tokio::sync::mpsc;
use tokio::time::timeout;

#[tokio::test(start_paused = true)]
async fn cancellation_source_brings_down_a_ticking_schedule() {
    let breaker = Breaker::new();
    let (touch_tx, touch_rx) = mpsc::channel(1);
    fan_in(&breaker, [touch_rx]);

    let mut ticks = tick_every(Duration::from_secs(30), breaker.signal());
    ticks.recv().await.unwrap();

    // a touch-style source fires once; the merged signal must end the stream
    touch_tx.send(TickEvent::now()).await.unwrap();
    timeout(Duration::from_secs(120), async {
        while ticks.recv().await.is_some() {}
    })
    .await
    .expect("tick stream did not terminate after the source fired");
    assert!(breaker.is_tripped());
}

#[tokio::test(start_paused = true)]
async fn daily_schedule_started_after_trip_is_born_closed() {
    let breaker = Breaker::new();
    breaker.trip();

    let sched = DailyScheduler::pulsed("09:00", Duration::from_secs(3_600)).unwrap();
    let mut events = sched.start(breaker.signal());
    assert!(events.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn tripping_twice_reads_like_tripping_once() {
    let breaker = Breaker::new();
    let mut pulses = pulse_every(
        Duration::from_secs(60),
        Duration::from_secs(15),
        breaker.signal(),
    );

    pulses.recv().await.unwrap();
    breaker.trip();
    breaker.trip();
    assert!(pulses.recv().await.is_none());
    assert!(breaker.is_tripped());
}
