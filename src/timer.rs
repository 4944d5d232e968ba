//! One-shot deferred task used for blur reconciliation.
//!
//! The host polls pending tasks on its tick. Nothing runs on another thread.

use std::time::{Duration, Instant};

/// A cancellable one-shot deadline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeferredTask {
    deadline: Option<Instant>,
}

impl DeferredTask {
    /// Create an idle task.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the task to fire `delay` after `now`.
    ///
    /// Scheduling again replaces the previous deadline.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Drop the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Check whether the task is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the deadline if it has passed.
    ///
    /// Returns true exactly once per scheduled deadline.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_never_fires() {
        let mut task = DeferredTask::new();
        assert!(!task.is_pending());
        assert!(!task.fire_if_due(Instant::now()));
    }

    #[test]
    fn test_fires_once_after_delay() {
        let start = Instant::now();
        let mut task = DeferredTask::new();
        task.schedule(start, Duration::from_millis(100));

        assert!(task.is_pending());
        assert!(!task.fire_if_due(start + Duration::from_millis(50)));
        assert!(task.fire_if_due(start + Duration::from_millis(100)));
        assert!(!task.fire_if_due(start + Duration::from_millis(200)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut task = DeferredTask::new();
        task.schedule(start, Duration::from_millis(10));
        task.cancel();
        assert!(!task.fire_if_due(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_reschedule_replaces_deadline() {
        let start = Instant::now();
        let mut task = DeferredTask::new();
        task.schedule(start, Duration::from_millis(10));
        task.schedule(start + Duration::from_millis(5), Duration::from_millis(10));
        assert_eq!(task.deadline(), Some(start + Duration::from_millis(15)));
    }
}
