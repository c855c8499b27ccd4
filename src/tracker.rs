//! Defines the [`SyncStatusTracker`].

use tracing::debug;
use tracing::trace;

use crate::config::Config;
use crate::error::InvalidArgument;
use crate::sink::NotificationSink;
use crate::status::SyncStatus;
use crate::CommitIndex;
use crate::Identifier;

/// Tracks whether a follower is in sync with whichever leader is currently
/// updating it.
///
/// When an update is the first one from a leader, the follower is reported as
/// not in sync and stays that way until its commit index reaches the commit
/// index the leader sent in that first update. From then on the follower is
/// considered out of sync whenever it trails the leader by more than
/// `sync_threshold` entries.
pub struct SyncStatusTracker<I, N, S> {
    id: I,
    sink: S,
    sync_threshold: N,
    leader: Option<TrackedLeader<I, N>>,
    status: SyncStatus,
}

struct TrackedLeader<I, N> {
    id: I,
    minimum_expected_index: N,
}

impl<I, N, S> SyncStatusTracker<I, N, S>
where
    I: Identifier,
    N: CommitIndex,
    S: NotificationSink<I>,
{
    /// Creates a tracker for follower `id` that notifies `sink`.
    ///
    /// Fails if `sync_threshold` is negative. No notification is sent.
    pub fn new(id: I, sink: S, sync_threshold: N) -> Result<Self, InvalidArgument> {
        if sync_threshold < N::zero() {
            return Err(InvalidArgument::NegativeThreshold(
                sync_threshold.to_string(),
            ));
        }

        Ok(Self {
            id,
            sink,
            sync_threshold,
            leader: None,
            status: SyncStatus::NotInSync,
        })
    }

    pub fn from_config(id: I, sink: S, config: &Config) -> Result<Self, InvalidArgument> {
        Self::new(id, sink, config.sync_threshold_as()?)
    }

    /// Processes a report from `leader`.
    ///
    /// `leader_commit_index` is the commit index the leader claims,
    /// `local_commit_index` the one this follower has reached. Indices are
    /// compared as given; they need not increase from one call to the next.
    pub fn update(&mut self, leader: I, leader_commit_index: N, local_commit_index: N) {
        let minimum_expected_index = match &self.leader {
            Some(tracked) if tracked.id == leader => tracked.minimum_expected_index,
            _ => {
                debug!(
                    "Last sync leader {:?} does not match current leader {:?}, need to catch up to {}.",
                    self.tracked_leader(),
                    leader,
                    leader_commit_index
                );

                self.change_status(SyncStatus::NotInSync, true);
                self.leader = Some(TrackedLeader {
                    id: leader,
                    minimum_expected_index: leader_commit_index,
                });

                return;
            }
        };

        if self.exceeds_threshold(leader_commit_index, local_commit_index) {
            debug!(
                "Lagging behind leader {:?}, at {} of {}.",
                leader, local_commit_index, leader_commit_index
            );

            self.change_status(SyncStatus::NotInSync, false);
        } else if local_commit_index >= minimum_expected_index {
            debug!(
                "Within {} entries of leader {:?} and reached {} (of expected {}).",
                self.sync_threshold, leader, local_commit_index, minimum_expected_index
            );

            self.change_status(SyncStatus::InSync, false);
        } else {
            trace!(
                "Within {} entries of leader {:?} but still short of {} at {}.",
                self.sync_threshold,
                leader,
                minimum_expected_index,
                local_commit_index
            );
        }
    }

    // A lag too large for `N` to represent is above any threshold, a negative
    // one below.
    fn exceeds_threshold(&self, leader_commit_index: N, local_commit_index: N) -> bool {
        match leader_commit_index.checked_sub(&local_commit_index) {
            Some(lag) => lag > self.sync_threshold,
            None => local_commit_index < leader_commit_index,
        }
    }

    fn change_status(&mut self, new_status: SyncStatus, force: bool) {
        if force || new_status != self.status {
            self.sink.notify(&self.id, new_status.is_in_sync());
            self.status = new_status;
        } else {
            trace!(
                "No change in sync status of {:?}, dampening notification.",
                self.id
            );
        }
    }
}

impl<I, N: Copy, S> SyncStatusTracker<I, N, S> {
    /// The follower this tracker describes.
    pub fn id(&self) -> &I {
        &self.id
    }

    pub fn sync_threshold(&self) -> N {
        self.sync_threshold
    }

    /// Status as of the latest notification.
    ///
    /// Before the first update this is `NotInSync` even though that was never
    /// notified.
    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn is_in_sync(&self) -> bool {
        self.status.is_in_sync()
    }

    /// The leader updates are currently attributed to, if any.
    pub fn tracked_leader(&self) -> Option<&I> {
        self.leader.as_ref().map(|l| &l.id)
    }

    /// The commit index the follower must reach before it may be considered in
    /// sync with the tracked leader.
    pub fn minimum_expected_index(&self) -> Option<N> {
        self.leader.as_ref().map(|l| l.minimum_expected_index)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<I: std::fmt::Debug, N: std::fmt::Debug, S> std::fmt::Debug for SyncStatusTracker<I, N, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncStatusTracker")
            .field("id", &self.id)
            .field("sync_threshold", &self.sync_threshold)
            .field("leader", &self.leader.as_ref().map(|l| &l.id))
            .field(
                "minimum_expected_index",
                &self.leader.as_ref().map(|l| &l.minimum_expected_index),
            )
            .field("status", &self.status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::SyncStatusTracker;
    use crate::config::Config;
    use crate::error::InvalidArgument;
    use crate::sink::NotificationSink;
    use crate::status::SyncStatus;

    const FOLLOWER: &str = "follower";

    #[derive(Default)]
    struct Recorder(Vec<bool>);

    impl NotificationSink<&'static str> for Recorder {
        fn notify(&mut self, follower: &&'static str, in_sync: bool) {
            assert_eq!(*follower, FOLLOWER);
            self.0.push(in_sync);
        }
    }

    type Tracker<N> = SyncStatusTracker<&'static str, N, Recorder>;

    fn tracker<N: crate::CommitIndex>(sync_threshold: N) -> Tracker<N> {
        SyncStatusTracker::new(FOLLOWER, Recorder::default(), sync_threshold).unwrap()
    }

    fn notifications<N: crate::CommitIndex>(tracker: &Tracker<N>) -> &[bool] {
        &tracker.sink().0
    }

    #[test]
    fn construction_does_not_notify() {
        let tracker = tracker(5u64);

        assert!(notifications(&tracker).is_empty());
        assert_eq!(tracker.status(), SyncStatus::NotInSync);
        assert_eq!(tracker.tracked_leader(), None);
        assert_eq!(tracker.minimum_expected_index(), None);
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let result = SyncStatusTracker::new(FOLLOWER, Recorder::default(), -1i64);

        assert_eq!(
            result.err(),
            Some(InvalidArgument::NegativeThreshold("-1".to_string()))
        );
    }

    #[test]
    fn zero_threshold_is_accepted() {
        let mut tracker = tracker(0i64);

        tracker.update("L", 7, 3);
        tracker.update("L", 7, 7);

        assert_eq!(notifications(&tracker), &[false, true]);
    }

    #[test]
    fn threshold_from_config() {
        let tracker = SyncStatusTracker::<_, u32, _>::from_config(
            FOLLOWER,
            Recorder::default(),
            &Config::default().with_sync_threshold(4),
        )
        .unwrap();

        assert_eq!(tracker.sync_threshold(), 4u32);
    }

    #[test]
    fn threshold_from_config_must_fit() {
        let result = SyncStatusTracker::<_, u8, _>::from_config(
            FOLLOWER,
            Recorder::default(),
            &Config::default().with_sync_threshold(256),
        );

        assert_eq!(
            result.err(),
            Some(InvalidArgument::ThresholdOutOfRange(256))
        );
    }

    #[test]
    fn first_contact_forces_not_in_sync() {
        let mut tracker = tracker(5u64);

        tracker.update("L1", 100, 100);

        assert_eq!(notifications(&tracker), &[false]);
        assert_eq!(tracker.status(), SyncStatus::NotInSync);
        assert_eq!(tracker.tracked_leader(), Some(&"L1"));
        assert_eq!(tracker.minimum_expected_index(), Some(100));
    }

    #[test]
    fn leader_change_forces_not_in_sync_again() {
        let mut tracker = tracker(5u64);

        tracker.update("L1", 100, 100);
        tracker.update("L2", 200, 50);

        assert_eq!(notifications(&tracker), &[false, false]);
        assert_eq!(tracker.tracked_leader(), Some(&"L2"));
        assert_eq!(tracker.minimum_expected_index(), Some(200));
    }

    #[test]
    fn leader_change_from_in_sync() {
        let mut tracker = tracker(5u64);

        tracker.update("L1", 100, 100);
        tracker.update("L1", 100, 100);
        assert!(tracker.is_in_sync());

        tracker.update("L2", 100, 100);

        assert_eq!(notifications(&tracker), &[false, true, false]);
        assert!(!tracker.is_in_sync());
    }

    #[test]
    fn leader_change_does_not_evaluate_lag() {
        let mut tracker = tracker(5u64);

        tracker.update("L1", 10, 10);
        tracker.update("L1", 10, 10);
        tracker.update("L2", 10, 10);

        assert_eq!(tracker.status(), SyncStatus::NotInSync);

        tracker.update("L2", 10, 10);

        assert_eq!(notifications(&tracker), &[false, true, false, true]);
    }

    #[test]
    fn threshold_boundary() {
        let mut tracker = tracker(5u64);

        tracker.update("L", 100, 100);
        tracker.update("L", 110, 105);
        assert_eq!(tracker.status(), SyncStatus::InSync);

        tracker.update("L", 111, 105);
        assert_eq!(tracker.status(), SyncStatus::NotInSync);

        assert_eq!(notifications(&tracker), &[false, true, false]);
    }

    #[test]
    fn repeated_in_sync_is_debounced() {
        let mut tracker = tracker(5u64);

        tracker.update("L", 100, 100);
        tracker.update("L", 101, 100);
        tracker.update("L", 102, 101);

        assert_eq!(notifications(&tracker), &[false, true]);
    }

    #[test]
    fn repeated_lagging_is_debounced() {
        let mut tracker = tracker(1u64);

        tracker.update("L", 10, 10);
        tracker.update("L", 20, 10);
        tracker.update("L", 30, 10);

        assert_eq!(notifications(&tracker), &[false]);
        assert_eq!(tracker.status(), SyncStatus::NotInSync);
    }

    #[test]
    fn pending_catch_up_makes_no_decision() {
        let mut tracker = tracker(5u64);

        tracker.update("L1", 100, 100);
        tracker.update("L2", 200, 50);
        tracker.update("L2", 205, 150);

        assert_eq!(notifications(&tracker), &[false, false]);
        assert_eq!(tracker.status(), SyncStatus::NotInSync);
    }

    #[test]
    fn pending_catch_up_keeps_in_sync_status() {
        let mut tracker = tracker(5i64);

        tracker.update("L", 100, 100);
        tracker.update("L", 100, 100);

        // leader's index regressed, local one even more so but within threshold
        tracker.update("L", 90, 86);

        assert_eq!(notifications(&tracker), &[false, true]);
        assert!(tracker.is_in_sync());
    }

    #[test]
    fn follower_ahead_of_leader_is_within_threshold() {
        let mut tracker = tracker(0u64);

        tracker.update("L", 10, 10);
        tracker.update("L", 10, 12);

        assert_eq!(notifications(&tracker), &[false, true]);
    }

    #[test]
    fn regressing_indices_are_judged_per_call() {
        let mut tracker = tracker(2u64);

        tracker.update("L", 50, 50);
        tracker.update("L", 60, 50);
        tracker.update("L", 55, 54);
        tracker.update("L", 40, 30);

        assert_eq!(notifications(&tracker), &[false, true, false]);
    }

    #[test]
    fn unrepresentable_lag_exceeds_threshold() {
        let mut tracker = tracker(i64::MAX);

        tracker.update("L", i64::MIN, i64::MIN);
        tracker.update("L", i64::MAX, i64::MIN);
        assert_eq!(tracker.status(), SyncStatus::NotInSync);

        tracker.update("L", i64::MIN, i64::MAX);
        assert_eq!(tracker.status(), SyncStatus::InSync);

        assert_eq!(notifications(&tracker), &[false, true]);
    }

    #[test]
    fn end_to_end() {
        let mut tracker = tracker(2u64);

        tracker.update("A", 10, 10);
        assert_eq!(notifications(&tracker), &[false]);

        tracker.update("A", 12, 10);
        assert_eq!(notifications(&tracker), &[false]);
        assert_eq!(tracker.status(), SyncStatus::NotInSync);

        tracker.update("A", 12, 11);
        assert_eq!(notifications(&tracker), &[false, true]);

        tracker.update("B", 20, 11);
        assert_eq!(notifications(&tracker), &[false, true, false]);
        assert_eq!(tracker.minimum_expected_index(), Some(20));

        tracker.update("B", 20, 20);
        assert_eq!(notifications(&tracker), &[false, true, false, true]);
    }
}
