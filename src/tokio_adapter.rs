//! An [`Executor`] adapter around a [`tokio::runtime::Handle`].
//!
//! Grounded in the bounded-executor wrappers found throughout the wider
//! example pack (e.g. the Tari `BoundedExecutor`, the Aptos
//! `bounded-executor` crate): both wrap a `tokio::runtime::Handle` and an
//! admission primitive in front of `spawn`. BYOL's admission primitive is
//! the [`Scheduler`](crate::Scheduler)'s atomic counter rather than a
//! blocking `Semaphore`, so only the executor-adapter shape is borrowed
//! here.

use crate::executor::Executor;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

/// [`Executor`] implementation backed by a tokio runtime handle.
#[derive(Clone, Debug)]
pub struct TokioExecutor {
    handle: tokio::runtime::Handle,
}

impl TokioExecutor {
    /// Adapt an existing tokio runtime handle.
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Adapt the handle of the tokio runtime the caller is currently
    /// executing on.
    ///
    /// # Panics
    /// Panics outside of a tokio runtime context, mirroring
    /// [`tokio::runtime::Handle::current`].
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }
}

/// Adapts `tokio::task::JoinHandle<T>` (`Future<Output = Result<T, JoinError>>`)
/// down to `Future<Output = T>`.
///
/// A `JoinError` can only mean the task panicked or was cancelled; BYOL
/// never cancels a task it spawned, so in practice only the panic case is
/// reachable, and it is propagated by resuming the original panic rather
/// than being folded into [`TaskError`](crate::TaskError).
#[derive(Debug)]
pub struct JoinHandle<T>(tokio::task::JoinHandle<T>);

impl<T: Send + 'static> Future for JoinHandle<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let this = self.get_mut();
        match Pin::new(&mut this.0).poll(cx) {
            Poll::Ready(Ok(value)) => Poll::Ready(value),
            Poll::Ready(Err(join_err)) => {
                if join_err.is_panic() {
                    std::panic::resume_unwind(join_err.into_panic());
                }
                panic!("byol: spawned task was cancelled before completion");
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Executor for TokioExecutor {
    type JoinHandle<T: Send + 'static> = JoinHandle<T>;

    fn spawn<T: Send + 'static>(&self, fut: impl Future<Output = T> + Send + 'static) -> Self::JoinHandle<T> {
        JoinHandle(self.handle.spawn(fut))
    }

    fn yield_now(&self) -> impl Future<Output = ()> + Send {
        tokio::task::yield_now()
    }
}
