//! `setTimeout`-backed scheduler.

use std::time::Duration;

use gloo_timers::callback::Timeout;
use tinymce_embed_core::Scheduler;

/// Schedules on the browser event loop with `gloo_timers`.
///
/// Dropping a [`Timeout`] also clears it, so the handle must be kept for as
/// long as the action should stay scheduled.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay: Duration, action: Box<dyn FnOnce()>) -> Timeout {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, action)
    }

    fn cancel(&self, handle: Timeout) {
        // Returns the unrun callback; dropping it is all there is to do.
        let _ = handle.cancel();
    }
}
