//! Frame and timer scheduling.

use std::time::Duration;

pub type Task = Box<dyn FnOnce()>;

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Single-threaded scheduler shared by every preview on a host page.
///
/// Tasks must never run from inside the call that scheduled them. Cancelling a handle whose
/// task already ran, or was already cancelled, is a no-op.
pub trait Scheduler {
    /// Run `task` once on the next animation frame.
    fn request_frame(&self, task: Task) -> FrameHandle;
    fn cancel_frame(&self, handle: FrameHandle);

    /// Run `task` once after `delay`.
    fn set_timeout(&self, delay: Duration, task: Task) -> TimerHandle;
    fn clear_timeout(&self, handle: TimerHandle);
}
