//! The configuration/builder surface for [`Scheduler`](crate::Scheduler).
//!
//! BYOL is a library, not an application: there is no config file, no
//! environment variable, and no persisted state (§6). What a real crate
//! still needs is an ergonomic way to gather a scheduler's construction
//! parameters, in the spirit of a `SpawnParams`-style builder (chained
//! setters, sensible defaults, built once).

use crate::alloc::{FrameAllocator, System};
use crate::executor::Executor;
use crate::scheduler::Scheduler;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Gathers the parameters needed to build a [`Scheduler`].
///
/// ```
/// use byol::Config;
/// # use std::num::NonZeroUsize;
/// # #[derive(Clone)] struct MyExecutor;
/// # impl byol::Executor for MyExecutor {
/// #     type JoinHandle<T: Send + 'static> = std::future::Pending<T>;
/// #     fn spawn<T: Send + 'static>(&self, _: impl std::future::Future<Output = T> + Send + 'static) -> Self::JoinHandle<T> { unimplemented!() }
/// #     fn yield_now(&self) -> impl std::future::Future<Output = ()> + Send { std::future::ready(()) }
/// # }
/// let scheduler = Config::new(NonZeroUsize::new(64).unwrap())
///     .executor(MyExecutor)
///     .build();
/// assert_eq!(scheduler.max_tasks(), 64);
/// ```
pub struct Config<X: Executor> {
    max_tasks: NonZeroUsize,
    executor: Option<X>,
    allocator: Arc<dyn FrameAllocator>,
}

impl<X: Executor> Config<X> {
    /// Start a configuration with the given admission bound and no
    /// executor installed (all work runs inline until
    /// [`executor`](Self::executor) is called).
    pub fn new(max_tasks: NonZeroUsize) -> Self {
        Self {
            max_tasks,
            executor: None,
            allocator: Arc::new(System),
        }
    }

    /// Install the host executor that admitted tasks are handed to.
    pub fn executor(mut self, executor: X) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Override the [`FrameAllocator`] used to gate activation-frame
    /// allocations. Defaults to [`System`], which never fails.
    pub fn allocator(mut self, allocator: impl FrameAllocator + 'static) -> Self {
        self.allocator = Arc::new(allocator);
        self
    }

    /// Build the [`Scheduler`].
    pub fn build(self) -> Scheduler<X> {
        Scheduler::from_config(self.max_tasks, self.executor, self.allocator)
    }
}
