//! The allocator capability consumed by the [`Scheduler`](crate::Scheduler).
//!
//! The source specification models activation frames as allocator-provided
//! byte regions with explicit `allocate`/`free` calls that "must tolerate
//! concurrent calls from multiple workers." Rust's `Box` already gives us an
//! owned, aligned, individually-freed region for the wrapper future, so
//! [`FrameAllocator`] is deliberately thin: it is a fallible *reservation*
//! taken immediately before that `Box` is created, and released when it is
//! dropped, rather than a raw byte-allocation API. See `DESIGN.md` for why.

use crate::error::AllocError;

/// Gates the one activation-frame allocation that
/// [`Scheduler::spawn`](crate::Scheduler::spawn) performs per call.
///
/// Implementations must tolerate concurrent calls from multiple worker
/// threads: `reserve` and `release` are called without any external
/// synchronization.
pub trait FrameAllocator: Send + Sync {
    /// Reserve capacity for one activation frame.
    ///
    /// On success, the caller must call [`release`](Self::release) exactly
    /// once when that frame is freed. On failure, the caller must not
    /// allocate the frame and must not call `release`.
    fn reserve(&self) -> Result<(), AllocError>;

    /// Release a reservation previously granted by [`reserve`](Self::reserve).
    fn release(&self);
}

/// The default [`FrameAllocator`]: reservations always succeed, backed by
/// the ordinary global allocator.
///
/// This mirrors the fact that `Box::new` is infallible on stable Rust,
/// since there is no fallible path to model here beyond the trait boundary itself,
/// which exists so that test code and embedders with a genuine bounded pool
/// have a seam to plug into (see [`FailingAllocator`] in the test suite for
/// the former).
#[derive(Debug, Default, Clone, Copy)]
pub struct System;

impl FrameAllocator for System {
    fn reserve(&self) -> Result<(), AllocError> {
        Ok(())
    }

    fn release(&self) {}
}
