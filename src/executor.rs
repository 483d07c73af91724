//! The host executor capability consumed by BYOL.
//!
//! This is the Rust shape of §6's "host executor interface (consumed)".
//! BYOL never drives an executor's run loop itself, it only ever calls
//! [`Executor::spawn`] (the realization of the source specification's
//! `run_detached`) and [`Executor::yield_now`].

use core::future::Future;

/// A host async executor that BYOL can hand admitted tasks to.
///
/// Implement this for whatever runtime the application already uses. A
/// [`TokioExecutor`](crate::tokio_adapter::TokioExecutor) adapter ships
/// behind the `tokio` feature.
pub trait Executor: Clone + Send + Sync + 'static {
    /// Whatever the executor hands back for a spawned task so its result can
    /// later be awaited. Unlike raw `tokio::task::JoinHandle<T>` (whose
    /// output is `Result<T, JoinError>`), this associated type's `Output` is
    /// `T` directly (cancellation/panic translation is the adapter's job,
    /// not `Handle::finish`'s).
    type JoinHandle<T: Send + 'static>: Future<Output = T> + Send + Unpin;

    /// Hand `fut` to the executor so it runs independently of the caller.
    /// This is the Rust realization of the source specification's
    /// `run_detached`.
    fn spawn<T: Send + 'static>(&self, fut: impl Future<Output = T> + Send + 'static) -> Self::JoinHandle<T>;

    /// Cooperatively give up the current worker; the calling task is
    /// resumed later, possibly on another worker.
    fn yield_now(&self) -> impl Future<Output = ()> + Send;
}
