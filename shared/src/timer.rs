//! Deferred one-shot tasks driven by frame time
//!
//! A [`TaskTimer`] lives inside the object it serves and is advanced by that
//! object's own update. Dropping the owner drops the timer, so a task can never
//! fire against state that no longer exists.

/// A once-firing scheduled task
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskTimer {
    duration: f32,
    elapsed: f32,
    active: bool,
}

impl TaskTimer {
    /// (Re)start the task. An already running task starts over.
    pub fn schedule(&mut self, duration: f32) {
        self.duration = duration;
        self.elapsed = 0.0;
        self.active = true;
    }

    /// Drop the pending task without firing it
    pub fn cancel(&mut self) {
        self.active = false;
        self.elapsed = 0.0;
    }

    /// Advance the task by `dt` seconds.
    ///
    /// Returns true exactly once, on the tick that reaches the duration.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.active = false;
            return true;
        }
        false
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Seconds since the task was scheduled (0 when idle)
    pub fn elapsed(&self) -> f32 {
        if self.active {
            self.elapsed
        } else {
            0.0
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}
