//! Bring-your-own-loop cooperative task admission.
//!
//! BYOL bounds fine-grained, recursively-spawned parallelism on top of an
//! executor the caller already has running. It does not run tasks itself:
//! every [`Scheduler`] is built around an optional [`Executor`] the host
//! application supplies, and BYOL's only job is deciding, at each `spawn`,
//! whether a task is handed to that executor (*admitted*) or deferred to
//! run inline, depth-first, when its [`Handle`] is finished.
//!
//! The admission decision is driven by a single atomic counter compared
//! against a configured bound (`max_tasks`). No locks, no queues, no
//! background threads: a saturated scheduler turns would-be-parallel
//! recursion back into ordinary sequential recursion, at exactly the depth
//! where the bound is hit.
//!
//! ```
//! # use std::num::NonZeroUsize;
//! # use byol::Config;
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use byol::tokio_adapter::TokioExecutor;
//!
//! let scheduler = Config::new(NonZeroUsize::new(4).unwrap())
//!     .executor(TokioExecutor::current())
//!     .build();
//!
//! let handle = scheduler
//!     .spawn(async { Ok::<u32, std::convert::Infallible>(21 * 2) })
//!     .unwrap();
//! assert_eq!(handle.finish().await.unwrap(), 42);
//! # }
//! ```
#![warn(missing_docs)]

mod alloc;
mod config;
mod error;
mod executor;
mod handle;
mod scheduler;
mod wrapper;

#[cfg(feature = "tokio")]
pub mod tokio_adapter;

pub use crate::alloc::{FrameAllocator, System};
pub use crate::config::Config;
pub use crate::error::{AllocError, TaskError};
pub use crate::executor::Executor;
pub use crate::handle::Handle;
pub use crate::scheduler::{NoExecutor, Scheduler};
