//! Deferred initialization for containers that are not render-ready.
//!
//! Some engines (Firefox, see bugzilla 548397) report no computed style for an
//! element inside an invisible iframe, and the editor crashes if it is
//! initialized against such a container. The gate checks readiness and, when
//! the container is not ready, retries once after a fixed delay.
//!
//! This is a workaround, not a protocol: the delay is a tunable constant and
//! a deferred action may find the container still not ready, in which case
//! the caller defers again.

use std::time::Duration;

/// Delay before retrying initialization on a container without layout.
pub const DEFAULT_INIT_DELAY: Duration = Duration::from_millis(200);

/// Answers whether the platform can compute layout for a container.
pub trait ReadinessProbe {
    fn is_ready(&self, container_id: &str) -> bool;
}

impl<F> ReadinessProbe for F
where
    F: Fn(&str) -> bool,
{
    fn is_ready(&self, container_id: &str) -> bool {
        self(container_id)
    }
}

/// One-shot timers on the host event loop.
pub trait Scheduler {
    /// Handle for a scheduled action, used to cancel it.
    type Handle;

    fn schedule(&self, delay: Duration, action: Box<dyn FnOnce()>) -> Self::Handle;

    /// Cancel a scheduled action. Cancelling one that already ran is a no-op.
    fn cancel(&self, handle: Self::Handle);
}

/// Readiness check plus at most one outstanding deferred action.
pub struct VisibilityGate<P, S: Scheduler> {
    probe: P,
    scheduler: S,
    delay: Duration,
    pending: Option<S::Handle>,
}

impl<P: ReadinessProbe, S: Scheduler> VisibilityGate<P, S> {
    pub fn new(probe: P, scheduler: S) -> Self {
        Self::with_delay(probe, scheduler, DEFAULT_INIT_DELAY)
    }

    pub fn with_delay(probe: P, scheduler: S, delay: Duration) -> Self {
        Self {
            probe,
            scheduler,
            delay,
            pending: None,
        }
    }

    pub fn is_ready(&self, container_id: &str) -> bool {
        self.probe.is_ready(container_id)
    }

    /// Run `action` once after the delay, replacing any pending deferral.
    pub fn defer_init(&mut self, action: Box<dyn FnOnce()>) {
        self.cancel();
        self.pending = Some(self.scheduler.schedule(self.delay, action));
    }

    /// Drop the pending deferral, if any, without running it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Forget the pending handle after its action has started running.
    pub(crate) fn mark_fired(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::testing::{FlagProbe, ManualScheduler};

    fn counter_action(counter: &Rc<Cell<u32>>) -> Box<dyn FnOnce()> {
        let counter = counter.clone();
        Box::new(move || counter.set(counter.get() + 1))
    }

    #[test]
    fn test_probe_closure() {
        let gate = VisibilityGate::new(|id: &str| id == "ready", ManualScheduler::new());
        assert!(gate.is_ready("ready"));
        assert!(!gate.is_ready("hidden"));
    }

    #[test]
    fn test_defer_runs_once_after_delay() {
        let scheduler = ManualScheduler::new();
        let mut gate = VisibilityGate::new(FlagProbe::new(false), scheduler.clone());
        let runs = Rc::new(Cell::new(0));

        gate.defer_init(counter_action(&runs));
        assert!(gate.has_pending());
        assert_eq!(scheduler.pending_delays(), vec![DEFAULT_INIT_DELAY]);
        assert_eq!(runs.get(), 0);

        scheduler.run_due();
        assert_eq!(runs.get(), 1);
        scheduler.run_due();
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_second_defer_replaces_first() {
        let scheduler = ManualScheduler::new();
        let mut gate = VisibilityGate::with_delay(
            FlagProbe::new(false),
            scheduler.clone(),
            Duration::from_millis(10),
        );
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        gate.defer_init(counter_action(&first));
        gate.defer_init(counter_action(&second));
        assert_eq!(scheduler.pending_count(), 1);

        scheduler.run_due();
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn test_cancel_prevents_run() {
        let scheduler = ManualScheduler::new();
        let mut gate = VisibilityGate::new(FlagProbe::new(false), scheduler.clone());
        let runs = Rc::new(Cell::new(0));

        gate.defer_init(counter_action(&runs));
        gate.cancel();
        assert!(!gate.has_pending());
        // Cancelling twice is harmless.
        gate.cancel();

        scheduler.run_due();
        assert_eq!(runs.get(), 0);
    }
}
