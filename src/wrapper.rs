//! The Immediate-Suspend Wrapper (§4.2): the adapter interposed around
//! every user future passed to [`Scheduler::spawn`](crate::Scheduler::spawn).

use crate::alloc::FrameAllocator;
use crate::error::{AllocError, TaskError};
use crate::executor::Executor;
use core::future::Future;
use core::pin::Pin;
use core::sync::atomic::{AtomicUsize, Ordering};
use core::task::{Context, Poll};
use std::sync::Arc;

/// A future that is `Pending` exactly once, then `Ready`.
///
/// Realizes step 1 of §4.2, "initial suspend": the wrapper suspends before
/// observing any of its arguments, so that `spawn` can publish the `Handle`
/// before any user-visible work happens. Named and shaped after the
/// teacher's own single-poll `Yield` future.
struct Suspend(bool);

impl Suspend {
    fn once() -> Self {
        Self(false)
    }
}

impl Future for Suspend {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// Decrements `active_tasks` exactly once when dropped.
///
/// Realizes step 4 of §4.2, "completion bookkeeping": by tying the
/// decrement to `Drop` rather than to the end of a code path, the
/// accounting stays correct even if the user future's poll unwinds (panics)
/// instead of merely returning `Err`.
struct DecrementGuard<'a>(&'a AtomicUsize);

impl Drop for DecrementGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
        tracing::trace!(target: "byol", "admitted task completed, active_tasks decremented");
    }
}

/// Runs the Immediate-Suspend Wrapper around `fut`.
///
/// `should_yield` is the admission flag (`resumed` in the specification's
/// vocabulary): `true` for admitted tasks, `false` for deferred ones. When
/// `true`, `active_tasks` is guaranteed decremented exactly once before this
/// function returns or unwinds, matching Invariant B (conservation).
pub(crate) async fn immediate_suspend<X, Fut, T, E>(
    should_yield: bool,
    executor: Option<X>,
    active_tasks: Arc<AtomicUsize>,
    fut: Fut,
) -> Result<T, TaskError<E>>
where
    X: Executor,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    // Step 1: initial suspend.
    Suspend::once().await;

    // Step 2: conditional yield. Only admitted tasks with an installed
    // executor actually yield; deferred tasks run straight through, which
    // is what keeps a saturated recursion depth-first rather than bouncing
    // through the executor on every level.
    if should_yield {
        if let Some(executor) = &executor {
            executor.yield_now().await;
        }
    }

    // Step 4 is armed here so it covers every remaining exit path,
    // including a panic raised out of `fut`.
    let _decrement = should_yield.then(|| DecrementGuard(&active_tasks));

    // Step 3: invocation, via a scratch activation frame for `f` itself.
    // This allocation is not routed through the scheduler's `FrameAllocator`
    // (see `alloc.rs` and DESIGN.md): the outer reservation taken in
    // `Scheduler::spawn` already accounts for "one allocation per spawn"
    // (Testable Scenario 3), and boxing the already-erased user future here
    // is an implementation detail of polling it, not a second
    // scheduler-visible frame. The reservation itself is released by
    // `Handle`'s `FrameGuard`, not by this wrapper.
    let scratch: Pin<Box<dyn Future<Output = Result<T, E>> + Send>> = Box::pin(fut);
    let result = scratch.await;

    result.map_err(TaskError::User)
}

/// Reserves one activation-frame allocation from `allocator`, translating a
/// reservation failure into [`AllocError`] before any admission bookkeeping
/// is exposed to the caller.
pub(crate) fn reserve_frame<A: FrameAllocator + ?Sized>(allocator: &A) -> Result<(), AllocError> {
    allocator.reserve()
}
