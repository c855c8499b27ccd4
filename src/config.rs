//! Defines the tracker [`Config`].

use serde::Deserialize;
use serde::Serialize;

use crate::error::InvalidArgument;
use crate::CommitIndex;

/// Tracker configuration as supplied by the embedding system.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of entries a follower may trail its leader's commit
    /// index by while still being considered in sync.
    pub sync_threshold: u64,
}

impl Config {
    pub const DEFAULT_SYNC_THRESHOLD: u64 = 10;

    pub fn with_sync_threshold(self, sync_threshold: u64) -> Self {
        Self { sync_threshold }
    }

    /// The threshold converted into the commit index type `N`.
    pub fn sync_threshold_as<N: CommitIndex>(&self) -> Result<N, InvalidArgument> {
        num_traits::cast(self.sync_threshold)
            .ok_or(InvalidArgument::ThresholdOutOfRange(self.sync_threshold))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sync_threshold: Self::DEFAULT_SYNC_THRESHOLD,
        }
    }
}
