//! The Scheduler (§4.1): admission bound, atomic counter, and the `spawn`
//! decision that is the heart of BYOL.

use crate::alloc::FrameAllocator;
use crate::error::AllocError;
use crate::executor::Executor;
use crate::handle::Handle;
use crate::wrapper::{immediate_suspend, reserve_frame};
use core::future::Future;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A marker [`Executor`] used by [`Scheduler::without_executor`].
///
/// It can never be constructed (its only field is [`core::convert::Infallible`]),
/// so its methods are dead code by construction: a `Scheduler` built without
/// an executor never admits a task, and therefore never calls into its
/// (absent) executor. This is the Rust realization of §6's "if the executor
/// is absent ... every spawn behaves as if rejected."
#[derive(Clone, Debug)]
pub struct NoExecutor(core::convert::Infallible);

impl Executor for NoExecutor {
    type JoinHandle<T: Send + 'static> = core::future::Pending<T>;

    fn spawn<T: Send + 'static>(&self, _fut: impl Future<Output = T> + Send + 'static) -> Self::JoinHandle<T> {
        match self.0 {}
    }

    fn yield_now(&self) -> impl Future<Output = ()> + Send {
        async move { match self.0 {} } }
}

/// The cooperative task-admission layer itself.
///
/// Immutable after construction except for the shared `active_tasks`
/// counter, which every outstanding task (admitted or not) may touch
/// concurrently. Cloning a `Scheduler` is cheap and shares the same
/// counter; build one with [`Config`](crate::Config).
pub struct Scheduler<X: Executor> {
    max_tasks: NonZeroUsize,
    active_tasks: Arc<AtomicUsize>,
    executor: Option<X>,
    allocator: Arc<dyn FrameAllocator>,
}

impl<X: Executor> Clone for Scheduler<X> {
    fn clone(&self) -> Self {
        Self {
            max_tasks: self.max_tasks,
            active_tasks: Arc::clone(&self.active_tasks),
            executor: self.executor.clone(),
            allocator: Arc::clone(&self.allocator),
        }
    }
}

impl Scheduler<NoExecutor> {
    /// Build a scheduler with no host executor installed. Every `spawn` is
    /// deferred; all work runs inline when its handle is finished. Useful
    /// for unit tests that want BYOL's admission bookkeeping without
    /// pulling in an async runtime.
    pub fn without_executor(max_tasks: NonZeroUsize) -> Self {
        Self::from_config(max_tasks, None, Arc::new(crate::alloc::System))
    }
}

impl<X: Executor> Scheduler<X> {
    pub(crate) fn from_config(max_tasks: NonZeroUsize, executor: Option<X>, allocator: Arc<dyn FrameAllocator>) -> Self {
        Self {
            max_tasks,
            active_tasks: Arc::new(AtomicUsize::new(0)),
            executor,
            allocator,
        }
    }

    /// The admission bound configured at construction.
    pub fn max_tasks(&self) -> usize {
        self.max_tasks.get()
    }

    /// The number of tasks currently admitted (i.e. handles with
    /// `resumed() == true` whose `finish` has not yet completed). Advisory
    /// only, since the specification's counter is relaxed-ordered and exists to
    /// bound resource use, not to gate correctness of shared data.
    pub fn active_tasks(&self) -> usize {
        self.active_tasks.load(Ordering::Relaxed)
    }

    /// Spawn a task.
    ///
    /// Tests `active_tasks < max_tasks` against the shared counter
    /// (Invariant A) and, based on the outcome, either hands `fut` to the
    /// installed executor (admitted) or defers it to run inline when its
    /// [`Handle`] is [`finish`](Handle::finish)ed (deferred). Either way the
    /// returned handle looks the same to the caller: that symmetry is the
    /// entire point of the Immediate-Suspend Wrapper (§4.2).
    ///
    /// # Errors
    /// Returns [`AllocError`] if the activation frame for this task could
    /// not be reserved from the configured [`FrameAllocator`]. The counter
    /// is left exactly as it was found; no handle is produced.
    pub fn spawn<Fut, T, E>(&self, fut: Fut) -> Result<Handle<T, E, X>, AllocError>
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        reserve_frame(self.allocator.as_ref())?;

        let should_yield = self.try_admit();
        tracing::trace!(target: "byol", should_yield, active_tasks = self.active_tasks(), max_tasks = self.max_tasks(), "spawn");

        let wrapped = immediate_suspend(
            should_yield,
            self.executor.clone(),
            Arc::clone(&self.active_tasks),
            fut,
        );

        if should_yield {
            // `should_yield` can only be true if `try_admit` found the
            // executor installed, so this is always present.
            let executor = self
                .executor
                .as_ref()
                .expect("admitted task requires an installed executor");
            let join_handle = executor.spawn(wrapped);
            Ok(Handle::admitted(join_handle, Arc::clone(&self.allocator)))
        } else {
            Ok(Handle::deferred(Box::pin(wrapped), Arc::clone(&self.allocator)))
        }
    }

    /// The admission decision of §4.1: increment-then-compare-then-undo.
    fn try_admit(&self) -> bool {
        if self.executor.is_none() {
            // No host executor to hand the work to: every spawn behaves as
            // if rejected (§6).
            return false;
        }
        let prev = self.active_tasks.fetch_add(1, Ordering::Relaxed);
        if prev < self.max_tasks.get() {
            true
        } else {
            self.active_tasks.fetch_sub(1, Ordering::Relaxed);
            false
        }
    }
}
