use byol::{AllocError, FrameAllocator};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts every reservation and release so tests can assert allocation
/// counts exactly, never just "it didn't crash".
#[derive(Default)]
pub struct CountingAllocator {
    pub reserved: AtomicUsize,
    pub released: AtomicUsize,
}

impl FrameAllocator for CountingAllocator {
    fn reserve(&self) -> Result<(), AllocError> {
        self.reserved.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Fails the Nth `reserve` call (1-indexed), succeeds on every other call.
pub struct FailingAllocator {
    calls: AtomicUsize,
    fail_at: usize,
}

impl FailingAllocator {
    pub fn failing_at(fail_at: usize) -> Self {
        Self { calls: AtomicUsize::new(0), fail_at }
    }
}

impl FrameAllocator for FailingAllocator {
    fn reserve(&self) -> Result<(), AllocError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_at {
            Err(AllocError)
        } else {
            Ok(())
        }
    }

    fn release(&self) {}
}

/// A user-function error distinct from `AllocError`, used to exercise P5.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct UserFailure;

impl std::fmt::Display for UserFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("user function always fails")
    }
}

impl std::error::Error for UserFailure {}

/// Recursively sums `lo..hi`, spawning a child task for the upper half
/// whenever the range is wider than `threshold`. Mirrors the parallel-sum
/// workload used to validate the admission policy end to end.
pub fn quicksum<X>(
    scheduler: byol::Scheduler<X>,
    lo: u64,
    hi: u64,
    threshold: u64,
) -> Pin<Box<dyn Future<Output = Result<u64, Infallible>> + Send>>
where
    X: byol::Executor,
{
    Box::pin(async move {
        if hi - lo <= threshold {
            return Ok((lo..hi).sum());
        }
        let mid = lo + (hi - lo) / 2;
        let child_scheduler = scheduler.clone();
        let handle = scheduler
            .spawn(async move { quicksum(child_scheduler, mid, hi, threshold).await })
            .expect("system allocator never fails");
        let left: u64 = (lo..mid).sum();
        let right = handle.finish().await.expect("quicksum never produces a TaskError");
        Ok(left + right)
    })
}
