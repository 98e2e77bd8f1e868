//! Watchtower publisher monitoring library.
//!
//! This library provides the adaptive statistics-polling core of the
//! Watchtower dashboard:
//!
//! - One self-rescheduling poll loop per distinct publisher
//! - Liveness inference from stats-fetch outcomes
//! - Adaptive poll cadence (5s while online, 10s while offline)
//! - A free-running 1s countdown projection for "next update in Ns"
//! - Group-preserving resynchronization when the identity list changes
//!
//! # Architecture
//!
//! ```text
//! MonitorRegistry (one per dashboard)
//! ├── owns one entry per distinct publisher key
//! │   ├── PublisherMonitorHandle (poll task, watch<PollState>)
//! │   └── CountdownHandle (1s projection task, watch<u64>)
//! └── sync() diffs the identity list against the running entries
//! ```
//!
//! The poll task is the only writer of its `PollState`; the countdown
//! task and the dashboard views are read-only watch subscribers. Every
//! task is owned by a handle whose `stop()` cancels a token and awaits
//! the task, so no timer can fire against a torn-down subject.
//!
//! # Modules
//!
//! - [`source`] - The stats-fetch contract the poll loop consumes
//! - [`liveness`] - Outcome classification and the two-value interval policy
//! - [`poll`] - The per-publisher poll scheduler
//! - [`countdown`] - Seconds-until-refresh projection
//! - [`group`] - Publisher grouping and the monitor registry
//! - [`view`] - Serializable dashboard card models

#![warn(clippy::pedantic)]

pub mod countdown;
pub mod group;
pub mod liveness;
pub mod poll;
pub mod source;
pub mod view;

pub use countdown::CountdownHandle;
pub use group::{group_by_publisher, MonitorRegistry, PublisherGroup};
pub use liveness::{ONLINE_POLL_INTERVAL, OFFLINE_POLL_INTERVAL};
pub use poll::{PollState, PublisherMonitorHandle, Subject};
pub use source::{StatsFetchError, StatsSource};
pub use view::PublisherCard;
