//! Publisher grouping and monitor ownership.
//!
//! Stream identities sharing one publisher key are a single monitoring
//! subject: exactly one poll loop and one in-flight fetch exist per
//! distinct on-screen publisher, never one per player key. The
//! [`MonitorRegistry`] owns those loops and diffs them against each new
//! identity list.

use crate::countdown::CountdownHandle;
use crate::poll::{PublisherMonitorHandle, Subject};
use crate::source::StatsSource;
use crate::view::PublisherCard;
use common::types::StreamIdentity;
use metrics::gauge;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// The identities sharing one publisher key, in dashboard order.
///
/// Derived, never persisted; recomputed whenever the identity list
/// changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherGroup {
    /// The shared publisher key.
    pub publisher: String,
    /// Member identities, in first-seen order.
    pub members: Vec<StreamIdentity>,
}

/// Partition `identities` into publisher groups.
///
/// Publishers appear in first-seen order, as do the members inside each
/// group, so repeated grouping of an unchanged list is stable.
#[must_use]
pub fn group_by_publisher(identities: &[StreamIdentity]) -> Vec<PublisherGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut members: HashMap<String, Vec<StreamIdentity>> = HashMap::new();

    for identity in identities {
        let group = members.entry(identity.publisher.clone()).or_insert_with(|| {
            order.push(identity.publisher.clone());
            Vec::new()
        });
        group.push(identity.clone());
    }

    order
        .into_iter()
        .filter_map(|publisher| {
            members.remove(&publisher).map(|members| PublisherGroup {
                publisher,
                members,
            })
        })
        .collect()
}

struct MonitorEntry {
    members: Vec<StreamIdentity>,
    monitor: PublisherMonitorHandle,
    countdown: CountdownHandle,
}

enum SyncAction {
    Spawn,
    UpdatePlayers,
    Respawn,
}

/// Owns one poll loop and one countdown projector per publisher group.
///
/// `sync` is the only way groups start or stop: callers hand it the
/// full current identity list and the registry converges on it.
pub struct MonitorRegistry {
    source: Arc<dyn StatsSource>,
    entries: HashMap<String, MonitorEntry>,
    /// First-seen publisher order, for stable card output.
    order: Vec<String>,
}

impl MonitorRegistry {
    /// Create an empty registry polling through `source`.
    #[must_use]
    pub fn new(source: Arc<dyn StatsSource>) -> Self {
        Self {
            source,
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Converge the running monitors on `identities`.
    ///
    /// - A publisher key that keeps at least one of its player keys
    ///   keeps its monitor and its accumulated poll state; the monitor
    ///   just receives the new player list.
    /// - A publisher key whose player set was fully replaced is a
    ///   genuinely new subject: its monitor restarts from the unknown
    ///   state.
    /// - New keys start a monitor; removed keys tear one down, poll
    ///   timer and countdown ticker together.
    pub async fn sync(&mut self, identities: &[StreamIdentity]) {
        let groups = group_by_publisher(identities);
        let keep: HashSet<String> = groups.iter().map(|g| g.publisher.clone()).collect();

        let removed: Vec<String> = self
            .order
            .iter()
            .filter(|publisher| !keep.contains(*publisher))
            .cloned()
            .collect();
        for publisher in removed {
            if let Some(entry) = self.entries.remove(&publisher) {
                info!(
                    target: "monitor.registry",
                    publisher = %publisher,
                    "Publisher group removed; stopping monitor"
                );
                entry.countdown.stop().await;
                entry.monitor.stop().await;
            }
        }
        self.order.retain(|publisher| keep.contains(publisher));

        for group in groups {
            let players: Vec<String> = group.members.iter().map(|m| m.player.clone()).collect();

            let action = match self.entries.get(&group.publisher) {
                None => SyncAction::Spawn,
                Some(entry) => {
                    let survives = entry
                        .members
                        .iter()
                        .any(|old| players.contains(&old.player));
                    if survives {
                        SyncAction::UpdatePlayers
                    } else {
                        SyncAction::Respawn
                    }
                }
            };

            match action {
                SyncAction::Spawn => {
                    debug!(
                        target: "monitor.registry",
                        publisher = %group.publisher,
                        players = players.len(),
                        "New publisher group; starting monitor"
                    );
                    self.order.push(group.publisher.clone());
                    let entry = Self::spawn_entry(&self.source, group);
                    self.entries.insert(entry.monitor.publisher().to_string(), entry);
                }
                SyncAction::UpdatePlayers => {
                    if let Some(entry) = self.entries.get_mut(&group.publisher) {
                        entry.monitor.update_players(players);
                        entry.members = group.members;
                    }
                }
                SyncAction::Respawn => {
                    debug!(
                        target: "monitor.registry",
                        publisher = %group.publisher,
                        "Player set fully replaced; restarting monitor"
                    );
                    if let Some(old) = self.entries.remove(&group.publisher) {
                        old.countdown.stop().await;
                        old.monitor.stop().await;
                    }
                    let entry = Self::spawn_entry(&self.source, group);
                    self.entries.insert(entry.monitor.publisher().to_string(), entry);
                }
            }
        }

        #[allow(clippy::cast_precision_loss)]
        gauge!("watchtower_publisher_groups").set(self.entries.len() as f64);
    }

    fn spawn_entry(source: &Arc<dyn StatsSource>, group: PublisherGroup) -> MonitorEntry {
        let players = group.members.iter().map(|m| m.player.clone()).collect();
        let monitor = PublisherMonitorHandle::spawn(
            Subject::new(group.publisher, players),
            Arc::clone(source),
        );
        let countdown = CountdownHandle::spawn(monitor.watch_state());
        MonitorEntry {
            members: group.members,
            monitor,
            countdown,
        }
    }

    /// Render one dashboard card per publisher group, in first-seen
    /// order.
    #[must_use]
    pub fn cards(&self) -> Vec<PublisherCard> {
        self.order
            .iter()
            .filter_map(|publisher| self.entries.get(publisher))
            .map(|entry| {
                PublisherCard::assemble(
                    entry.monitor.publisher(),
                    &entry.members,
                    &entry.monitor.state(),
                    entry.countdown.seconds(),
                )
            })
            .collect()
    }

    /// Number of running publisher monitors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any monitors are running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a monitor exists for `publisher`.
    #[must_use]
    pub fn contains(&self, publisher: &str) -> bool {
        self.entries.contains_key(publisher)
    }

    /// Stop every monitor. Used during service shutdown.
    pub async fn shutdown(&mut self) {
        for publisher in std::mem::take(&mut self.order) {
            if let Some(entry) = self.entries.remove(&publisher) {
                entry.countdown.stop().await;
                entry.monitor.stop().await;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn identity(publisher: &str, player: &str) -> StreamIdentity {
        StreamIdentity::new(publisher, player)
    }

    #[test]
    fn test_grouping_partitions_by_publisher() {
        let identities = vec![
            identity("live_a", "play_1"),
            identity("live_b", "play_2"),
            identity("live_a", "play_3"),
        ];

        let groups = group_by_publisher(&identities);

        assert_eq!(groups.len(), 2);
        let first = groups.first().unwrap();
        assert_eq!(first.publisher, "live_a");
        assert_eq!(first.members.len(), 2);
        let second = groups.get(1).unwrap();
        assert_eq!(second.publisher, "live_b");
        assert_eq!(second.members.len(), 1);
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let identities = vec![
            identity("live_z", "play_1"),
            identity("live_a", "play_2"),
            identity("live_z", "play_3"),
        ];

        let groups = group_by_publisher(&identities);

        let order: Vec<&str> = groups.iter().map(|g| g.publisher.as_str()).collect();
        assert_eq!(order, vec!["live_z", "live_a"]);

        let members: Vec<&str> = groups
            .first()
            .unwrap()
            .members
            .iter()
            .map(|m| m.player.as_str())
            .collect();
        assert_eq!(members, vec!["play_1", "play_3"]);
    }

    #[test]
    fn test_grouping_empty_list() {
        assert!(group_by_publisher(&[]).is_empty());
    }
}
