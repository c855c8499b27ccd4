//! Runs a [`SyncStatusTracker`] as a task that owns it exclusively.
//!
//! A tracker relies on seeing updates one at a time and in order. When more
//! than one task reports on behalf of a follower, move its tracker into a
//! mailbox with [`spawn_in`] and report through the returned
//! [`TrackerHandle`]s instead. Updates are applied in the order in which they
//! were enqueued.

use futures::channel::mpsc;
use futures::channel::oneshot;
use futures::stream::StreamExt;

use crate::error::ShutDown;
use crate::error::SpawnError;
use crate::executor::Executor;
use crate::sink::NotificationSink;
use crate::status::SyncStatus;
use crate::tracker::SyncStatusTracker;
use crate::CommitIndex;
use crate::Identifier;

enum Request<I, N> {
    Update {
        leader: I,
        leader_commit_index: N,
        local_commit_index: N,
    },
    Status(oneshot::Sender<SyncStatus>),
    ShutDown(oneshot::Sender<()>),
}

/// Enqueues updates for a tracker running in a mailbox.
///
/// Handles are cheap to clone. The mailbox stops once all handles have been
/// dropped or one of them calls [`shut_down`][TrackerHandle::shut_down].
pub struct TrackerHandle<I, N> {
    sender: mpsc::UnboundedSender<Request<I, N>>,
}

impl<I, N> std::fmt::Debug for TrackerHandle<I, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerHandle")
            .field("shut_down", &self.sender.is_closed())
            .finish()
    }
}

impl<I, N> Clone for TrackerHandle<I, N> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Moves `tracker` into a task spawned on `executor`.
pub fn spawn_in<I, N, S, E>(
    tracker: SyncStatusTracker<I, N, S>,
    executor: E,
) -> Result<TrackerHandle<I, N>, SpawnError>
where
    I: Identifier,
    N: CommitIndex,
    S: NotificationSink<I> + 'static,
    E: Executor,
{
    let (sender, receiver) = mpsc::unbounded();

    executor
        .execute(run(tracker, receiver))
        .map_err(|err| SpawnError::ExecutorError(err.into()))?;

    Ok(TrackerHandle { sender })
}

async fn run<I, N, S>(
    mut tracker: SyncStatusTracker<I, N, S>,
    mut receiver: mpsc::UnboundedReceiver<Request<I, N>>,
) where
    I: Identifier,
    N: CommitIndex,
    S: NotificationSink<I>,
{
    while let Some(request) = receiver.next().await {
        match request {
            Request::Update {
                leader,
                leader_commit_index,
                local_commit_index,
            } => tracker.update(leader, leader_commit_index, local_commit_index),
            Request::Status(send) => {
                let _ = send.send(tracker.status());
            }
            Request::ShutDown(send) => {
                receiver.close();
                tracing::info!("Shutting down sync status tracker of {:?}.", tracker.id());
                let _ = send.send(());
                return;
            }
        }
    }

    tracing::info!(
        "All handles to sync status tracker of {:?} dropped, shutting down.",
        tracker.id()
    );
}

impl<I, N> TrackerHandle<I, N> {
    /// Enqueues an update without waiting for it to be applied.
    ///
    /// See [`SyncStatusTracker::update`].
    pub fn update(
        &self,
        leader: I,
        leader_commit_index: N,
        local_commit_index: N,
    ) -> Result<(), ShutDown> {
        self.sender
            .unbounded_send(Request::Update {
                leader,
                leader_commit_index,
                local_commit_index,
            })
            .map_err(|_| ShutDown)
    }

    /// Resolves to the tracker's status once all previously enqueued updates
    /// have been applied.
    pub fn status(&self) -> impl std::future::Future<Output = Result<SyncStatus, ShutDown>> {
        let (send, recv) = oneshot::channel();
        let enqueued = self.sender.unbounded_send(Request::Status(send));

        async move {
            enqueued.map_err(|_| ShutDown)?;
            recv.await.map_err(|_| ShutDown)
        }
    }

    /// Stops the mailbox after all previously enqueued updates have been
    /// applied.
    pub fn shut_down(&self) -> impl std::future::Future<Output = Result<(), ShutDown>> {
        let (send, recv) = oneshot::channel();
        let enqueued = self.sender.unbounded_send(Request::ShutDown(send));

        async move {
            enqueued.map_err(|_| ShutDown)?;
            recv.await.map_err(|_| ShutDown)
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.sender.is_closed()
    }
}
