//! The Task Handle (§4.3): the dual-mode value returned by
//! [`Scheduler::spawn`](crate::Scheduler::spawn) and consumed by
//! [`Handle::finish`].

use crate::alloc::FrameAllocator;
use crate::error::TaskError;
use crate::executor::Executor;
use core::future::Future;
use core::pin::Pin;
use std::sync::Arc;

/// Releases a [`FrameAllocator`] reservation when dropped.
///
/// Deliberately the *only* `Drop` impl in [`Handle`]'s field list: keeping
/// `Drop` off `Handle` itself means `Handle::finish` can move its `inner`
/// field out via pattern matching (destructuring a type that implements
/// `Drop` directly is rejected by the compiler, but destructuring one of
/// its non-`Drop` fields is fine). The allocator is released exactly once,
/// whether `finish` was called or the handle was simply dropped (see
/// DESIGN.md for why that is a safe strengthening of the specification's
/// "dropping a handle is a programmer error" stance rather than a
/// relaxation of it).
struct FrameGuard(Arc<dyn FrameAllocator>);

impl Drop for FrameGuard {
    fn drop(&mut self) {
        self.0.release();
    }
}

/// The two shapes a spawned task can take, discriminated once at `spawn`
/// time and never changed afterwards.
enum Inner<T, E, X: Executor> {
    /// Admitted: the wrapper is already running on the host executor;
    /// retrieving the result just means awaiting its join mechanism.
    Admitted(X::JoinHandle<Result<T, TaskError<E>>>),
    /// Deferred: the wrapper has not been polled even once yet. It is
    /// driven to completion by [`Handle::finish`] itself, on the caller's
    /// own execution context.
    Deferred(Pin<Box<dyn Future<Output = Result<T, TaskError<E>>> + Send>>),
}

/// An opaque token produced by [`Scheduler::spawn`](crate::Scheduler::spawn),
/// bound to exactly one future [`finish`](Handle::finish) call.
///
/// `finish` takes `self` by value, so the type system (not a runtime
/// check) enforces Invariant C ("a handle is consumed by at most one
/// `finish`"): calling `finish` twice on the same handle is a compile
/// error, because the handle no longer exists after the first call.
pub struct Handle<T, E, X: Executor> {
    inner: Inner<T, E, X>,
    resumed: bool,
    frame: FrameGuard,
}

impl<T, E, X> Handle<T, E, X>
where
    T: Send + 'static,
    E: Send + 'static,
    X: Executor,
{
    pub(crate) fn admitted(join_handle: X::JoinHandle<Result<T, TaskError<E>>>, allocator: Arc<dyn FrameAllocator>) -> Self {
        Self {
            inner: Inner::Admitted(join_handle),
            resumed: true,
            frame: FrameGuard(allocator),
        }
    }

    pub(crate) fn deferred(
        fut: Pin<Box<dyn Future<Output = Result<T, TaskError<E>>> + Send>>,
        allocator: Arc<dyn FrameAllocator>,
    ) -> Self {
        Self {
            inner: Inner::Deferred(fut),
            resumed: false,
            frame: FrameGuard(allocator),
        }
    }

    /// `true` iff this task was admitted: the scheduler's counter absorbed
    /// it and it was handed to the host executor. `false` means the task is
    /// deferred and has performed no user-observable work yet.
    pub fn resumed(&self) -> bool {
        self.resumed
    }

    /// Retrieve the spawned task's result.
    ///
    /// For an admitted task this awaits the executor's own join mechanism.
    /// For a deferred task this is what actually *starts* the work: the
    /// wrapper future is polled for the first time right here, on the
    /// caller's own execution context, exactly as if it had been running on
    /// the executor all along (§4.1, "result retrieval").
    pub async fn finish(self) -> Result<T, TaskError<E>> {
        match self.inner {
            Inner::Admitted(join_handle) => join_handle.await,
            Inner::Deferred(fut) => fut.await,
        }
        // `self.frame` drops here regardless of which arm ran, releasing
        // the activation-frame reservation exactly once (Invariant:
        // "storage ... freed in finish, always").
    }
}
