//! Seconds-until-refresh projection.
//!
//! The poll timer for a subject only fires once per interval, so the
//! dashboard's "next update in Ns" display is driven by a separate
//! free-running one-second ticker. The two timers are never merged:
//! their cadences differ and vary independently. The projector reads
//! the latest [`PollState`] on every tick — values may change between
//! ticks when a poll completes — and never drives scheduling.

use crate::poll::PollState;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use std::time::Duration;

/// Tick cadence of the countdown display.
pub const COUNTDOWN_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Whole seconds remaining until the subject's next scheduled poll.
///
/// Clamped at zero: the display may legitimately sit at 0 for up to one
/// tick when a poll is late.
#[must_use]
pub fn seconds_remaining(state: &PollState, now: Instant) -> u64 {
    let elapsed_ms = now.saturating_duration_since(state.last_update).as_millis();
    let remaining_ms = state.poll_interval.as_millis().saturating_sub(elapsed_ms);
    u64::try_from(remaining_ms.div_ceil(1000)).unwrap_or(u64::MAX)
}

/// Handle to one subject's countdown projection task.
pub struct CountdownHandle {
    seconds_rx: watch::Receiver<u64>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Spawn the projection task over a subject's polling state.
    ///
    /// The initial value is computed at spawn time; afterwards the task
    /// recomputes once per second until `stop()`.
    #[must_use]
    pub fn spawn(state_rx: watch::Receiver<PollState>) -> Self {
        let initial = seconds_remaining(&state_rx.borrow(), Instant::now());
        let (seconds_tx, seconds_rx) = watch::channel(initial);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(countdown_loop(state_rx, seconds_tx, cancel.clone()));

        Self {
            seconds_rx,
            cancel,
            task,
        }
    }

    /// Current display value.
    #[must_use]
    pub fn seconds(&self) -> u64 {
        *self.seconds_rx.borrow()
    }

    /// Subscribe to display updates.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<u64> {
        self.seconds_rx.clone()
    }

    /// Stop the ticker. No display updates happen after this returns.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

async fn countdown_loop(
    state_rx: watch::Receiver<PollState>,
    seconds_tx: watch::Sender<u64>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(COUNTDOWN_TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            () = cancel.cancelled() => return,
            _ = ticker.tick() => {
                let seconds = seconds_remaining(&state_rx.borrow(), Instant::now());
                seconds_tx.send_if_modified(|current| {
                    if *current == seconds {
                        false
                    } else {
                        *current = seconds;
                        true
                    }
                });
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::liveness::{OFFLINE_POLL_INTERVAL, ONLINE_POLL_INTERVAL};

    fn online_state(last_update: Instant) -> PollState {
        PollState {
            last_snapshot: None,
            is_online: true,
            last_update,
            poll_interval: ONLINE_POLL_INTERVAL,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_interval_remaining_at_update_time() {
        let now = Instant::now();
        let state = online_state(now);

        assert_eq!(seconds_remaining(&state, now), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_second_rounds_up() {
        let start = Instant::now();
        let state = online_state(start);

        // 1.2s elapsed of 5s: 3.8s left displays as 4
        let now = start + Duration::from_millis(1_200);
        assert_eq!(seconds_remaining(&state, now), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clamped_at_zero_when_poll_is_late() {
        let start = Instant::now();
        let state = online_state(start);

        let now = start + Duration::from_millis(7_500);
        assert_eq!(seconds_remaining(&state, now), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_interval_counts_from_ten() {
        let now = Instant::now();
        let state = PollState {
            poll_interval: OFFLINE_POLL_INTERVAL,
            ..online_state(now)
        };

        assert_eq!(seconds_remaining(&state, now), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_follows_interval_change_between_ticks() {
        let (state_tx, state_rx) = watch::channel(online_state(Instant::now()));
        let handle = CountdownHandle::spawn(state_rx);
        assert_eq!(handle.seconds(), 5);

        tokio::time::advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(handle.seconds(), 4);

        // A poll outcome resets the shared state mid-cycle; the next
        // tick must read the fresh values, not cached ones.
        state_tx.send_modify(|state| {
            state.is_online = false;
            state.last_update = Instant::now();
            state.poll_interval = OFFLINE_POLL_INTERVAL;
        });

        tokio::time::advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(handle.seconds(), 9);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_freezes_display() {
        let (_state_tx, state_rx) = watch::channel(online_state(Instant::now()));
        let handle = CountdownHandle::spawn(state_rx);
        let frozen_rx = handle.watch();

        handle.stop().await;
        let frozen = *frozen_rx.borrow();

        tokio::time::advance(Duration::from_secs(30)).await;
        tokio::task::yield_now().await;
        assert_eq!(*frozen_rx.borrow(), frozen);
    }
}
