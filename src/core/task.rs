//! Suspended operations: timed work that advances a little every tick.
//!
//! Nothing here blocks. An owner ticks its tasks once per frame and reacts to
//! whatever they hand back.

use super::countdown::Countdown;

/// A one-shot delayed action carrying `T` until it fires.
///
/// The payload is handed out exactly once, on the tick the delay runs out.
/// After that (or after [`Delayed::cancel`]) the task is idle and further ticks
/// do nothing.
#[derive(Debug, Clone)]
pub struct Delayed<T> {
    countdown: Countdown,
    payload: Option<T>,
}

impl<T> Default for Delayed<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> Delayed<T> {
    pub fn new(delay: f32, payload: T) -> Self {
        Self {
            countdown: Countdown::new(delay),
            payload: Some(payload),
        }
    }

    /// A task with nothing scheduled.
    pub fn idle() -> Self {
        Self {
            countdown: Countdown::new(0.0),
            payload: None,
        }
    }

    /// Replace whatever is pending with a fresh schedule.
    pub fn restart(&mut self, delay: f32, payload: T) {
        *self = Self::new(delay, payload);
    }

    /// Advance by `dt`. Returns the payload on the tick the delay elapses.
    pub fn tick(&mut self, dt: f32) -> Option<T> {
        self.payload.as_ref()?;
        self.countdown.tick(dt);
        if self.countdown.expired() {
            self.payload.take()
        } else {
            None
        }
    }

    /// Drop the pending payload. Returns whether anything was pending.
    pub fn cancel(&mut self) -> bool {
        self.payload.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.payload.is_some()
    }

    /// Fraction of the delay still left, `0.0` when idle.
    pub fn fraction_remaining(&self) -> f32 {
        if self.is_pending() {
            self.countdown.fraction()
        } else {
            0.0
        }
    }

    pub fn remaining(&self) -> f32 {
        if self.is_pending() {
            self.countdown.remaining()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delayed_fires_once_when_elapsed() {
        let mut task = Delayed::new(2.0, "spawn");
        assert_eq!(task.tick(1.0), None);
        assert!(task.is_pending());
        assert_eq!(task.tick(1.0), Some("spawn"));
        assert!(!task.is_pending());
        assert_eq!(task.tick(1.0), None);
    }

    #[test]
    fn overshooting_tick_still_fires_exactly_once() {
        let mut task = Delayed::new(0.5, 7);
        assert_eq!(task.tick(3.0), Some(7));
        assert_eq!(task.tick(3.0), None);
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut task = Delayed::new(1.0, ());
        assert!(task.cancel());
        assert!(!task.cancel());
        assert_eq!(task.tick(5.0), None);
        assert_eq!(task.fraction_remaining(), 0.0);
    }

    #[test]
    fn restart_replaces_pending_schedule() {
        let mut task = Delayed::new(1.0, 1);
        task.tick(0.5);
        task.restart(2.0, 2);
        assert_eq!(task.tick(1.0), None);
        assert_eq!(task.tick(1.0), Some(2));
    }
}
