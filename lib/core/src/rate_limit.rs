use std::cell::Cell;
use std::rc::{Rc, Weak};

use scrollsy_utils::constants::FALLBACK_RATE_LIMIT_MS;

use crate::scheduler::{Scheduler, TimerHandle};

struct RateLimiterInner {
    callback: Box<dyn Fn()>,
    threshold_ms: i32,
    scheduler: Rc<dyn Scheduler>,
    last_call_ms: Cell<Option<f64>>,
    pending: Cell<Option<TimerHandle>>,
    is_disposed: Cell<bool>,
}

/// Trailing-edge limiter: a call arriving less than `threshold_ms` after the last execution is
/// deferred by `threshold_ms`, replacing any call already deferred. Other calls run immediately.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Rc<RateLimiterInner>,
}

impl RateLimiter {
    pub fn new(callback: impl Fn() + 'static, threshold_ms: i32, scheduler: Rc<dyn Scheduler>) -> Self {
        let threshold_ms = match threshold_ms {
            0 => FALLBACK_RATE_LIMIT_MS,
            threshold_ms => threshold_ms,
        };
        Self {
            inner: Rc::new(RateLimiterInner {
                callback: Box::new(callback),
                threshold_ms,
                scheduler,
                last_call_ms: Cell::new(None),
                pending: Cell::new(None),
                is_disposed: Cell::new(false),
            }),
        }
    }

    pub fn threshold_ms(&self) -> i32 {
        self.inner.threshold_ms
    }

    pub fn has_pending_call(&self) -> bool {
        self.inner.pending.get().is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed.get()
    }

    pub fn call(&self) {
        let inner = &self.inner;
        if inner.is_disposed.get() {
            return;
        }
        let now_ms = inner.scheduler.now_ms();
        match inner.last_call_ms.get() {
            Some(last_call_ms) if now_ms < last_call_ms + f64::from(inner.threshold_ms) => {
                if let Some(handle) = inner.pending.take() {
                    inner.scheduler.cancel(handle);
                }
                let weak_inner = Rc::downgrade(inner);
                match inner.scheduler.schedule_deferred(
                    Box::new(move || run_deferred(weak_inner, now_ms)),
                    inner.threshold_ms,
                ) {
                    Ok(handle) => {
                        log::trace!("Deferred rate-limited call by {}ms", inner.threshold_ms);
                        inner.pending.set(Some(handle));
                    }
                    Err(e) => log::error!("Failed to defer rate-limited call: {}", e.error_detail()),
                }
            }
            _ => {
                inner.last_call_ms.set(Some(now_ms));
                (inner.callback)();
            }
        }
    }

    /// Cancels the deferred call, if any, and turns further calls into no-ops
    pub fn dispose(&self) {
        let inner = &self.inner;
        inner.is_disposed.set(true);
        if let Some(handle) = inner.pending.take() {
            inner.scheduler.cancel(handle);
        }
    }
}

/// The window restarts at the time of the deferred attempt, not at the time the timer fires
fn run_deferred(weak_inner: Weak<RateLimiterInner>, attempt_ms: f64) {
    if let Some(inner) = weak_inner.upgrade() {
        inner.pending.set(None);
        if !inner.is_disposed.get() {
            inner.last_call_ms.set(Some(attempt_ms));
            (inner.callback)();
        }
    }
}
