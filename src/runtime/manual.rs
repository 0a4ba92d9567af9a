//! Deterministic scheduler driven by explicit frame and clock steps.
//!
//! Hosts without their own event loop (and tests) step frames with [`ManualScheduler::run_frame`]
//! and move the virtual clock with [`ManualScheduler::advance`]. Nothing runs between steps.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::core::scheduler::{FrameHandle, Scheduler, Task, TimerHandle};

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    frames: Vec<(u64, Task)>,
    timers: BTreeMap<(Duration, u64), Task>,
}

impl ManualState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn pop_due_timer(&mut self, until: Duration) -> Option<(Duration, Task)> {
        let key = *self.timers.keys().next()?;
        if key.0 > until {
            return None;
        }
        self.timers.remove(&key).map(|task| (key.0, task))
    }
}

#[derive(Default)]
pub struct ManualScheduler {
    state: RefCell<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since construction.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Runs every frame task queued before this call. Frames requested while running wait
    /// for the next call.
    pub fn run_frame(&self) -> usize {
        let frames = std::mem::take(&mut self.state.borrow_mut().frames);
        let count = frames.len();
        for (_, task) in frames {
            task();
        }
        count
    }

    /// Moves the clock forward, firing due timers in deadline order. Returns the number fired.
    pub fn advance(&self, by: Duration) -> usize {
        let until = self.state.borrow().now + by;
        let mut fired = 0;

        loop {
            let due = self.state.borrow_mut().pop_due_timer(until);
            let Some((deadline, task)) = due else {
                break;
            };
            self.state.borrow_mut().now = deadline;
            task();
            fired += 1;
        }

        self.state.borrow_mut().now = until;
        fired
    }

    /// Alternates `advance(interval)` and `run_frame()` `count` times.
    pub fn step_frames(&self, count: usize, interval: Duration) {
        for _ in 0..count {
            self.advance(interval);
            self.run_frame();
        }
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&self, task: Task) -> FrameHandle {
        let mut state = self.state.borrow_mut();
        let id = state.allocate_id();
        state.frames.push((id, task));
        FrameHandle::from_raw(id)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.state
            .borrow_mut()
            .frames
            .retain(|(id, _)| *id != handle.raw());
    }

    fn set_timeout(&self, delay: Duration, task: Task) -> TimerHandle {
        let mut state = self.state.borrow_mut();
        let id = state.allocate_id();
        let deadline = state.now + delay;
        state.timers.insert((deadline, id), task);
        TimerHandle::from_raw(id)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.state
            .borrow_mut()
            .timers
            .retain(|(_, id), _| *id != handle.raw());
    }
}
