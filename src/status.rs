//! Defines [`SyncStatus`] and the [`SyncStatusChange`] notification.

use serde::Deserialize;
use serde::Serialize;

/// Whether a follower is keeping up with its leader.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum SyncStatus {
    /// The follower's lag is within the threshold and it has caught up to
    /// the index its leader reported when it was first observed.
    InSync,

    /// The follower is lagging or has not yet caught up after a leader change.
    NotInSync,
}

impl SyncStatus {
    pub fn is_in_sync(self) -> bool {
        self == SyncStatus::InSync
    }
}

impl Default for SyncStatus {
    fn default() -> Self {
        SyncStatus::NotInSync
    }
}

impl From<bool> for SyncStatus {
    fn from(in_sync: bool) -> Self {
        if in_sync {
            SyncStatus::InSync
        } else {
            SyncStatus::NotInSync
        }
    }
}

impl From<SyncStatus> for bool {
    fn from(status: SyncStatus) -> Self {
        status.is_in_sync()
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStatus::InSync => f.write_str("in sync"),
            SyncStatus::NotInSync => f.write_str("not in sync"),
        }
    }
}

/// Sent to a [`NotificationSink`][crate::NotificationSink] whenever a
/// follower's status changes or its leader changes.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct SyncStatusChange<I> {
    /// The follower the notification is about.
    pub follower: I,

    /// The follower's new status.
    pub status: SyncStatus,
}

impl<I> SyncStatusChange<I> {
    pub fn new(follower: I, in_sync: bool) -> Self {
        Self {
            follower,
            status: in_sync.into(),
        }
    }

    pub fn in_sync(&self) -> bool {
        self.status.is_in_sync()
    }
}
