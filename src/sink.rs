//! Defines the [`NotificationSink`] trait and implementations for common
//! transports.

use futures::channel::mpsc;

use crate::status::SyncStatusChange;

/// Receives the notifications issued by a
/// [`SyncStatusTracker`][crate::SyncStatusTracker].
///
/// `notify` is called synchronously from within
/// [`update`][crate::SyncStatusTracker::update]. Implementations must not
/// block; delivery guarantees beyond that are up to the implementation.
pub trait NotificationSink<I>: Send {
    fn notify(&mut self, follower: &I, in_sync: bool);
}

impl<I, S: NotificationSink<I> + ?Sized> NotificationSink<I> for Box<S> {
    fn notify(&mut self, follower: &I, in_sync: bool) {
        (**self).notify(follower, in_sync)
    }
}

/// Sink that calls a closure.
pub struct FnSink<F>(pub F);

impl<I, F> NotificationSink<I> for FnSink<F>
where
    F: FnMut(&I, bool) + Send,
{
    fn notify(&mut self, follower: &I, in_sync: bool) {
        (self.0)(follower, in_sync)
    }
}

impl<F> std::fmt::Debug for FnSink<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FnSink").finish()
    }
}

impl<I> NotificationSink<I> for mpsc::UnboundedSender<SyncStatusChange<I>>
where
    I: Clone + std::fmt::Debug + Send,
{
    fn notify(&mut self, follower: &I, in_sync: bool) {
        if let Err(err) = self.unbounded_send(SyncStatusChange::new(follower.clone(), in_sync)) {
            tracing::debug!(
                "Dropping sync status of {:?}, receiver is gone: {:?}.",
                follower,
                err.into_inner().status
            );
        }
    }
}

impl<I> NotificationSink<I> for mpsc::Sender<SyncStatusChange<I>>
where
    I: Clone + std::fmt::Debug + Send,
{
    fn notify(&mut self, follower: &I, in_sync: bool) {
        if let Err(err) = self.try_send(SyncStatusChange::new(follower.clone(), in_sync)) {
            if err.is_full() {
                tracing::warn!(
                    "Dropping sync status of {:?}, channel is full: {:?}.",
                    follower,
                    err.into_inner().status
                );
            } else {
                tracing::debug!(
                    "Dropping sync status of {:?}, receiver is gone: {:?}.",
                    follower,
                    err.into_inner().status
                );
            }
        }
    }
}
