//! Error types.
//!
//! Falling behind the leader is not an error, it's reported as a
//! [`NotInSync`][crate::SyncStatus::NotInSync] notification. The errors here
//! are either programming errors or the result of a mailbox having gone away.

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A tracker was constructed with an argument it cannot work with.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum InvalidArgument {
    #[error("sync threshold must be greater than or equal to 0, was {0}")]
    NegativeThreshold(String),

    #[error("sync threshold {0} is not representable as a commit index")]
    ThresholdOutOfRange(u64),
}

/// The mailbox task owning a tracker is no longer running.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("tracker was shut down")]
pub struct ShutDown;

/// The mailbox task could not be started.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("executor refused to run the tracker")]
    ExecutorError(#[source] BoxError),
}
