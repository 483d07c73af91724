use core::fmt::{self, Display, Formatter};

/// The activation frame for a spawned task could not be allocated.
///
/// Returned directly by [`Scheduler::spawn`](crate::Scheduler::spawn) when the
/// outer reservation fails, and wrapped in [`TaskError::Alloc`] when the inner
/// scratch allocation for the user future fails instead. Either way the
/// scheduler's admission counter has already been rebalanced by the time this
/// error is observed: a failed allocation never leaves `active_tasks`
/// incremented.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct AllocError;

impl Display for AllocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("failed to allocate a task activation frame")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AllocError {}

/// The widened error type surfaced by [`Handle::finish`](crate::Handle::finish).
///
/// `E` is whatever error type the spawned user future produces. BYOL widens
/// it with exactly one case of its own, [`TaskError::Alloc`], matching the
/// contract in §7 of the specification: "the return type of every user
/// function is widened to an error union whose error set includes at least
/// the allocator's."
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TaskError<E> {
    /// The scratch activation frame for the user future could not be
    /// allocated; the user future never ran.
    Alloc(AllocError),
    /// The user future ran to completion and produced this error. Surfaced
    /// unchanged, never wrapped further (testable property P5).
    User(E),
}

impl<E: Display> Display for TaskError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Alloc(e) => Display::fmt(e, f),
            TaskError::User(e) => Display::fmt(e, f),
        }
    }
}

#[cfg(feature = "std")]
impl<E: std::error::Error + 'static> std::error::Error for TaskError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaskError::Alloc(e) => Some(e),
            TaskError::User(e) => Some(e),
        }
    }
}

impl<E> From<AllocError> for TaskError<E> {
    fn from(e: AllocError) -> Self {
        TaskError::Alloc(e)
    }
}
