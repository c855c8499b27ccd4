//! Tracks whether a follower in a leader/follower replicated log is in sync
//! with its leader.
//!
//! A follower's replication loop reports, for every heartbeat or append it
//! processes, which node is leading, the leader's commit index and the
//! follower's own commit index. The [`SyncStatusTracker`] turns that stream of
//! reports into a boolean _in sync_ / _not in sync_ classification and tells a
//! [`NotificationSink`] whenever the classification changes.
//!
//! ```
//! use sync_status::sink::FnSink;
//! use sync_status::SyncStatusTracker;
//!
//! let mut notifications = Vec::new();
//! let mut tracker = SyncStatusTracker::new(
//!     "follower-1",
//!     FnSink(|_: &&str, in_sync: bool| notifications.push(in_sync)),
//!     2u64,
//! )
//! .unwrap();
//!
//! tracker.update("A", 10, 10);
//! tracker.update("A", 12, 11);
//! drop(tracker);
//!
//! assert_eq!(notifications, vec![false, true]);
//! ```
//!
//! # Rules
//!
//! 1. The first report from a leader, i.e. any report whose leader differs
//!    from the previous one, always yields a _not in sync_ notification. The
//!    leader's commit index from that report becomes the _minimum expected
//!    index_.
//! 2. Subsequent reports from the same leader are judged by lag, the
//!    difference between the two commit indices.
//!    - A lag above the threshold makes the follower _not in sync_.
//!    - A lag within the threshold makes the follower _in sync_, provided its
//!      commit index reached the minimum expected index. Until then no
//!      judgement is made.
//! 3. Except for rule 1, notifications are only sent when the status flips.
//!
//! # Concurrency
//!
//! A tracker is a plain value and [`update`][SyncStatusTracker::update] takes
//! `&mut self`. When updates originate from multiple tasks, either guard the
//! tracker with a mutex or move it into a [mailbox][crate::mailbox], which
//! applies updates strictly in the order they were enqueued.
#![warn(clippy::wildcard_imports)]

pub mod config;
pub mod error;
#[cfg(feature = "mailbox")]
pub mod executor;
#[cfg(feature = "mailbox")]
pub mod mailbox;
pub mod sink;
pub mod status;
pub mod tracker;

use std::fmt::Debug;
use std::fmt::Display;

pub use config::Config;
pub use error::InvalidArgument;
#[cfg(feature = "mailbox")]
pub use mailbox::TrackerHandle;
#[doc(inline)]
pub use sink::NotificationSink;
pub use status::SyncStatus;
pub use status::SyncStatusChange;
#[doc(inline)]
pub use tracker::SyncStatusTracker;

/// Trait bound of commit indices and sync thresholds.
///
/// Both signed and unsigned primitive integers qualify.
pub trait CommitIndex: 'static + num_traits::PrimInt + Send + Sync + Debug + Display {}

impl<T> CommitIndex for T where T: 'static + num_traits::PrimInt + Send + Sync + Debug + Display {}

/// Trait bound of follower and leader identities.
pub trait Identifier: 'static + Clone + Debug + Eq + Send + Sync {}

impl<T: 'static + Clone + Debug + Eq + Send + Sync> Identifier for T {}
