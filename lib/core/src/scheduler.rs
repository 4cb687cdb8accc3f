use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use chrono::Utc;
use leptos::prelude::{set_timeout, set_timeout_with_handle, TimeoutHandle};

use scrollsy_utils::errors::ScrollsyError;

pub type Task = Box<dyn FnOnce()>;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimerHandle(u64);

/// Host services needed to rate limit evaluations and to run the handler outside the scroll event
pub trait Scheduler {
    /// Current time in milliseconds
    fn now_ms(&self) -> f64;
    /// Runs `task` after `delay_ms`, unless cancelled first
    fn schedule_deferred(&self, task: Task, delay_ms: i32) -> Result<TimerHandle, ScrollsyError>;
    fn cancel(&self, handle: TimerHandle);
    /// Runs `task` on the next turn of the host's task queue
    fn schedule_next_tick(&self, task: Task);
}

fn to_duration(delay_ms: i32) -> Duration {
    Duration::from_millis(u64::try_from(delay_ms).unwrap_or_default())
}

/// Scheduler backed by the browser's timers
#[derive(Clone, Default)]
pub struct BrowserScheduler {
    next_id: Rc<Cell<u64>>,
    timeout_map: Rc<RefCell<HashMap<TimerHandle, TimeoutHandle>>>,
}

impl BrowserScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for BrowserScheduler {
    fn now_ms(&self) -> f64 {
        Utc::now().timestamp_millis() as f64
    }

    fn schedule_deferred(&self, task: Task, delay_ms: i32) -> Result<TimerHandle, ScrollsyError> {
        let handle = TimerHandle(self.next_id.get());
        self.next_id.set(handle.0 + 1);
        let timeout_map = self.timeout_map.clone();
        let timeout = set_timeout_with_handle(
            move || {
                timeout_map.borrow_mut().remove(&handle);
                task();
            },
            to_duration(delay_ms),
        )?;
        self.timeout_map.borrow_mut().insert(handle, timeout);
        Ok(handle)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(timeout) = self.timeout_map.borrow_mut().remove(&handle) {
            timeout.clear();
        }
    }

    fn schedule_next_tick(&self, task: Task) {
        set_timeout(task, Duration::ZERO);
    }
}

struct VirtualTimer {
    handle: TimerHandle,
    due_ms: f64,
    task: Task,
}

#[derive(Default)]
struct VirtualClock {
    now_ms: f64,
    next_id: u64,
    timer_vec: Vec<VirtualTimer>,
}

/// Deterministic scheduler whose clock only moves when advanced explicitly.
/// Next tick tasks are timers due at the current time, so they run on the next `advance` or `flush`.
#[derive(Clone, Default)]
pub struct VirtualScheduler {
    clock: Rc<RefCell<VirtualClock>>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_ms: f64) -> Self {
        let scheduler = Self::default();
        scheduler.clock.borrow_mut().now_ms = now_ms;
        scheduler
    }

    pub fn pending_count(&self) -> usize {
        self.clock.borrow().timer_vec.len()
    }

    /// Runs the tasks that are already due without moving the clock
    pub fn flush(&self) {
        self.advance(0.0);
    }

    /// Moves the clock forward by `delta_ms`, running due tasks in order of due time then scheduling order
    pub fn advance(&self, delta_ms: f64) {
        let target_ms = self.clock.borrow().now_ms + delta_ms;
        while let Some(timer) = self.pop_due_timer(target_ms) {
            self.clock.borrow_mut().now_ms = timer.due_ms;
            (timer.task)();
        }
        self.clock.borrow_mut().now_ms = target_ms;
    }

    fn pop_due_timer(&self, target_ms: f64) -> Option<VirtualTimer> {
        let mut clock = self.clock.borrow_mut();
        let index = clock.timer_vec
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due_ms <= target_ms)
            .min_by(|(_, l), (_, r)| l.due_ms.total_cmp(&r.due_ms).then(l.handle.cmp(&r.handle)))
            .map(|(index, _)| index)?;
        Some(clock.timer_vec.remove(index))
    }

    fn push_timer(&self, task: Task, delay_ms: i32) -> TimerHandle {
        let mut clock = self.clock.borrow_mut();
        let handle = TimerHandle(clock.next_id);
        clock.next_id += 1;
        let due_ms = clock.now_ms + f64::from(delay_ms.max(0));
        clock.timer_vec.push(VirtualTimer { handle, due_ms, task });
        handle
    }
}

impl Scheduler for VirtualScheduler {
    fn now_ms(&self) -> f64 {
        self.clock.borrow().now_ms
    }

    fn schedule_deferred(&self, task: Task, delay_ms: i32) -> Result<TimerHandle, ScrollsyError> {
        Ok(self.push_timer(task, delay_ms))
    }

    fn cancel(&self, handle: TimerHandle) {
        self.clock.borrow_mut().timer_vec.retain(|timer| timer.handle != handle);
    }

    fn schedule_next_tick(&self, task: Task) {
        self.push_timer(task, 0);
    }
}
