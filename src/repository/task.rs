use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::error::{PersistenceError, Result};

/// Handle to a repository operation running on the tokio runtime.
///
/// Awaiting yields the operation's result. Dropping the handle detaches the
/// operation; it keeps running to completion.
#[must_use = "a SyncTask reports its outcome only when awaited"]
pub struct SyncTask<T> {
    handle: JoinHandle<Result<T>>,
}

impl<T: Send + 'static> SyncTask<T> {
    /// Spawns `work` onto the current runtime.
    ///
    /// # Panics
    ///
    /// Outside a tokio runtime.
    pub(super) fn spawn<F>(work: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(work),
        }
    }
}

impl<T> SyncTask<T> {
    /// Stops the operation at its next suspension point; already-committed
    /// remote writes stay.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T> Future for SyncTask<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.get_mut().handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(err)) if err.is_cancelled() => {
                Poll::Ready(Err(PersistenceError::Cancelled))
            }
            Poll::Ready(Err(err)) => Poll::Ready(Err(PersistenceError::Background(err.to_string()))),
        }
    }
}
