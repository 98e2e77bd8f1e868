//! Per-publisher poll scheduling.
//!
//! Each monitored publisher gets one spawned task running a perpetual
//! fetch → classify → publish → sleep cycle. The task is the only
//! writer of its [`PollState`] watch channel; the dashboard and the
//! countdown projector are read-only subscribers.
//!
//! # Teardown
//!
//! The task is owned by a [`PublisherMonitorHandle`]. `stop()` cancels
//! the handle's token and awaits the task, and the in-flight fetch is
//! raced against that token, so after `stop()` returns there are no
//! further fetches and no further `PollState` mutations for the
//! subject. Dropping the handle without calling `stop()` leaks the
//! task until the runtime shuts down.

use crate::liveness::{self, OFFLINE_POLL_INTERVAL};
use crate::source::StatsSource;
use common::types::StatsSnapshot;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// The unit one poll loop monitors: a publisher and the ordered player
/// keys currently mapped to it.
///
/// Any player in the list yields the same stats, since they share one
/// publisher; the loop always fetches through the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    /// Publisher key this subject represents.
    pub publisher: String,
    /// Player keys mapped to the publisher, in dashboard order.
    pub players: Vec<String>,
}

impl Subject {
    /// Create a subject.
    #[must_use]
    pub fn new(publisher: impl Into<String>, players: Vec<String>) -> Self {
        Self {
            publisher: publisher.into(),
            players,
        }
    }
}

/// Mutable polling state for one subject.
///
/// Mutated only by the subject's poll task, exactly once per completed
/// poll.
#[derive(Debug, Clone)]
pub struct PollState {
    /// Snapshot from the most recent successful fetch; superseded by
    /// the next poll and cleared whenever the publisher is offline.
    pub last_snapshot: Option<StatsSnapshot>,
    /// Liveness inferred from the most recent poll.
    pub is_online: bool,
    /// When the most recent poll completed.
    pub last_update: Instant,
    /// Delay until the next poll; always one of the two values from
    /// [`liveness::poll_interval`].
    pub poll_interval: Duration,
}

impl PollState {
    /// State before the first poll outcome: liveness unknown, which
    /// renders as offline at the slow interval until the first poll
    /// corrects it.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            last_snapshot: None,
            is_online: false,
            last_update: Instant::now(),
            poll_interval: OFFLINE_POLL_INTERVAL,
        }
    }
}

/// Handle to one publisher's poll task.
///
/// This is the only owner of the task's timers; `stop()` is the only
/// legal way to silence them.
pub struct PublisherMonitorHandle {
    publisher: String,
    state_rx: watch::Receiver<PollState>,
    players_tx: watch::Sender<Vec<String>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PublisherMonitorHandle {
    /// Spawn the poll task for `subject`.
    ///
    /// The first poll happens immediately; until it completes the
    /// published state is [`PollState::unknown`].
    #[must_use]
    pub fn spawn(subject: Subject, source: Arc<dyn StatsSource>) -> Self {
        let Subject { publisher, players } = subject;
        let (state_tx, state_rx) = watch::channel(PollState::unknown());
        let (players_tx, players_rx) = watch::channel(players);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(poll_loop(
            publisher.clone(),
            players_rx,
            source,
            state_tx,
            cancel.clone(),
        ));

        Self {
            publisher,
            state_rx,
            players_tx,
            cancel,
            task,
        }
    }

    /// Publisher key this handle monitors.
    #[must_use]
    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    /// Current polling state (cloned out of the watch channel).
    #[must_use]
    pub fn state(&self) -> PollState {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to polling state updates.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<PollState> {
        self.state_rx.clone()
    }

    /// Replace the subject's player list.
    ///
    /// A sleeping poll task wakes immediately and restarts its cycle
    /// against the new list; accumulated liveness/snapshot state is
    /// kept. Sending an identical list is a no-op.
    pub fn update_players(&self, players: Vec<String>) {
        self.players_tx.send_if_modified(|current| {
            if *current == players {
                false
            } else {
                *current = players;
                true
            }
        });
    }

    /// Stop polling.
    ///
    /// Cancels the pending timer (or the in-flight fetch) and awaits
    /// the task. After this returns, no further fetches or state
    /// mutations are attributable to this subject.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

/// The poll cycle for one subject.
///
/// Outcome processing (classify → publish state → compute next delay)
/// is fully applied before the next fetch begins; a single sequential
/// loop means fetches for one subject can never overlap.
#[instrument(skip_all, name = "monitor.poll", fields(publisher = %publisher))]
async fn poll_loop(
    publisher: String,
    mut players_rx: watch::Receiver<Vec<String>>,
    source: Arc<dyn StatsSource>,
    state_tx: watch::Sender<PollState>,
    cancel: CancellationToken,
) {
    loop {
        let next_player = players_rx.borrow_and_update().first().cloned();
        let player = match next_player {
            Some(player) => player,
            None => {
                // Empty subject: the registry tears this monitor down;
                // park until the list changes or we are cancelled.
                tokio::select! {
                    () = cancel.cancelled() => return,
                    changed = players_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
                continue;
            }
        };

        // Race the fetch against cancellation so a torn-down subject
        // never observes a late outcome.
        let outcome = tokio::select! {
            () = cancel.cancelled() => return,
            outcome = source.fetch_stats(&player) => outcome,
        };

        if let Err(ref error) = outcome {
            debug!(
                target: "monitor.poll",
                publisher = %publisher,
                player = %player,
                error = %error,
                "Stats fetch failed; treating publisher as offline"
            );
        }

        let verdict = liveness::classify(outcome);
        let interval = liveness::poll_interval(verdict.is_online);

        counter!(
            "watchtower_polls_total",
            "result" => if verdict.is_online { "online" } else { "offline" }
        )
        .increment(1);

        debug!(
            target: "monitor.poll",
            publisher = %publisher,
            player = %player,
            online = verdict.is_online,
            next_poll_ms = %interval.as_millis(),
            "Poll completed"
        );

        state_tx.send_modify(|state| {
            state.last_snapshot = verdict.snapshot;
            state.is_online = verdict.is_online;
            state.last_update = Instant::now();
            state.poll_interval = interval;
        });

        // Exactly one pending timer per subject: this sleep is ended by
        // teardown, by a subject change (immediate re-poll), or by
        // expiring into the next cycle.
        tokio::select! {
            () = cancel.cancelled() => return,
            () = tokio::time::sleep(interval) => {}
            changed = players_rx.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_new() {
        let subject = Subject::new("live_a", vec!["play_1".to_string(), "play_2".to_string()]);

        assert_eq!(subject.publisher, "live_a");
        assert_eq!(subject.players.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_state_is_offline_at_slow_interval() {
        let state = PollState::unknown();

        assert!(!state.is_online);
        assert!(state.last_snapshot.is_none());
        assert_eq!(state.poll_interval, OFFLINE_POLL_INTERVAL);
    }
}
