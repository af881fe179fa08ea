use std::time::Duration;

use relaypulse_core::TickEvent;
use relaypulse_trip::TripSignal;
use tokio::sync::mpsc;
use tokio::time;

/// Hand `ev` to the consumer, racing the trip signal the whole way.
///
/// The channel holds one unread event, so a briefly absent consumer misses
/// nothing; a genuinely slow one back-pressures the producer right here
/// instead of growing a queue or dropping edges. Returns `false` when the
/// producer should stop — trip observed (checked first, so cancellation
/// wins a tie) or consumer gone.
pub(crate) async fn deliver(
    tx: &mpsc::Sender<TickEvent>,
    stop: &TripSignal,
    ev: TickEvent,
) -> bool {
    tokio::select! {
        biased;
        _ = stop.tripped() => false,
        sent = tx.send(ev) => sent.is_ok(),
    }
}

/// Emit one timestamp every `every`, forever, until `stop` trips.
///
/// The wait itself is the cancellation point: a trip mid-interval ends the
/// stream with no partial emission, and the closed channel is what tells
/// the consumer to stop iterating.
pub fn tick_every(every: Duration, stop: TripSignal) -> mpsc::Receiver<TickEvent> {
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = time::sleep(every) => {
                    if !deliver(&tx, &stop, TickEvent::now()).await {
                        return;
                    }
                }
                _ = stop.tripped() => return,
            }
        }
    });
    rx
}

/// Emit an on/off pair every `every`: one timestamp at the interval
/// boundary, a second one `width` later. Requires `width < every`.
///
/// Both waits are independently cancellable. A cycle cut short therefore
/// emits 0 or 1 of its 2 edges and the stream ends there — a cancelled
/// pulse must never be completed into a stale toggle, so the missing
/// off-edge is the consumer's cue to force the actuator safe itself.
pub fn pulse_every(every: Duration, width: Duration, stop: TripSignal) -> mpsc::Receiver<TickEvent> {
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = time::sleep(every) => {
                    if !deliver(&tx, &stop, TickEvent::now()).await {
                        return;
                    }
                    tokio::select! {
                        _ = time::sleep(width) => {
                            if !deliver(&tx, &stop, TickEvent::now()).await {
                                return;
                            }
                        }
                        _ = stop.tripped() => return,
                    }
                }
                _ = stop.tripped() => return,
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaypulse_trip::Breaker;

    #[tokio::test(start_paused = true)]
    async fn ticks_arrive_on_the_interval() {
        let breaker = Breaker::new();
        let start = time::Instant::now();
        let mut ticks = tick_every(Duration::from_secs(60), breaker.signal());

        ticks.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(60));
        ticks.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(120));

        breaker.trip();
        assert!(ticks.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn pulse_edges_are_width_apart() {
        let breaker = Breaker::new();
        let start = time::Instant::now();
        let mut pulses = pulse_every(
            Duration::from_secs(3_600),
            Duration::from_secs(300),
            breaker.signal(),
        );

        pulses.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(3_600));
        pulses.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(3_900));

        // next cycle's on-edge: a full interval after the off-edge
        pulses.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(7_500));

        breaker.trip();
        assert!(pulses.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn trip_before_first_tick_yields_a_closed_empty_stream() {
        let breaker = Breaker::new();
        breaker.trip();
        let mut ticks = tick_every(Duration::from_secs(60), breaker.signal());
        assert!(ticks.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn trip_between_pulse_edges_cuts_the_pair_short() {
        let breaker = Breaker::new();
        let mut pulses = pulse_every(
            Duration::from_secs(60),
            Duration::from_secs(10),
            breaker.signal(),
        );

        // on-edge emitted, then trip inside the width wait
        pulses.recv().await.unwrap();
        breaker.trip();
        assert!(
            pulses.recv().await.is_none(),
            "off-edge must not be emitted after a trip"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_consumer_blocks_the_producer_without_losing_ticks() {
        let breaker = Breaker::new();
        let start = time::Instant::now();
        let mut ticks = tick_every(Duration::from_secs(1), breaker.signal());

        // Consumer away for 10s: the t=1 tick is buffered, the t=2 tick
        // blocks the producer; nothing is dropped or reordered.
        time::sleep(Duration::from_secs(10)).await;
        ticks.recv().await.unwrap();
        ticks.recv().await.unwrap();

        // Producer resumes its cadence only after the blocked send lands.
        ticks.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(11));

        breaker.trip();
        assert!(ticks.recv().await.is_none());
    }
}
