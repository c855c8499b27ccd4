//! Defines the [`Executor`] trait the [mailbox][crate::mailbox] task is
//! spawned on.

use futures::FutureExt;

use crate::error::BoxError;

/// Runs the task that owns a tracker.
pub trait Executor: 'static {
    /// Type of error yielded when the task cannot be started.
    type Error: Into<BoxError>;

    fn execute<F: std::future::Future<Output = ()> + Send + 'static>(
        self,
        task: F,
    ) -> Result<(), Self::Error>;
}

impl<S: futures::task::Spawn + 'static> Executor for S {
    type Error = futures::task::SpawnError;

    fn execute<F: std::future::Future<Output = ()> + Send + 'static>(
        self,
        task: F,
    ) -> Result<(), Self::Error> {
        self.spawn_obj(futures::task::FutureObj::from(task.boxed()))
    }
}

/// Executor which runs the task on a thread of its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdThread;

impl Executor for StdThread {
    type Error = std::io::Error;

    fn execute<F: std::future::Future<Output = ()> + Send + 'static>(
        self,
        task: F,
    ) -> Result<(), Self::Error> {
        std::thread::Builder::new()
            .name("sync-status".to_string())
            .spawn(|| futures::executor::block_on(task))
            .map(|_| ())
    }
}
