//! Real-time scheduler backed by tokio's current-thread `LocalSet`.
//!
//! Frames are emulated with a fixed interval. Every scheduling call must happen inside a
//! `LocalSet` context, since tasks are spawned with `tokio::task::spawn_local`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use tokio::task::AbortHandle;

use crate::core::scheduler::{FrameHandle, Scheduler, Task, TimerHandle};

/// Roughly one display refresh at 60 Hz.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct LocalScheduler {
    frame_interval: Duration,
    next_id: Cell<u64>,
    in_flight: Rc<RefCell<HashMap<u64, AbortHandle>>>,
}

impl Default for LocalScheduler {
    fn default() -> Self {
        Self::with_frame_interval(DEFAULT_FRAME_INTERVAL)
    }
}

impl LocalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame_interval(frame_interval: Duration) -> Self {
        Self {
            frame_interval,
            next_id: Cell::new(0),
            in_flight: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Number of spawned tasks that have neither run nor been cancelled.
    pub fn in_flight(&self) -> usize {
        self.in_flight.borrow().len()
    }

    fn spawn_after(&self, delay: Duration, task: Task) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let in_flight = Rc::clone(&self.in_flight);
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            in_flight.borrow_mut().remove(&id);
            task();
        });
        self.in_flight
            .borrow_mut()
            .insert(id, handle.abort_handle());
        id
    }

    fn abort(&self, id: u64) {
        if let Some(handle) = self.in_flight.borrow_mut().remove(&id) {
            handle.abort();
        }
    }
}

impl Scheduler for LocalScheduler {
    fn request_frame(&self, task: Task) -> FrameHandle {
        FrameHandle::from_raw(self.spawn_after(self.frame_interval, task))
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.abort(handle.raw());
    }

    fn set_timeout(&self, delay: Duration, task: Task) -> TimerHandle {
        TimerHandle::from_raw(self.spawn_after(delay, task))
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.abort(handle.raw());
    }
}

impl Drop for LocalScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.in_flight.borrow_mut().drain() {
            handle.abort();
        }
    }
}
