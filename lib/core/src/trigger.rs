use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub use scrollsy_utils::node_utils::ScrollGeometry;

use crate::config::ScrollTriggerConfig;
use crate::rate_limit::RateLimiter;
use crate::scheduler::Scheduler;

/// What the trigger remembers between two evaluations
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TriggerState {
    pub last_scroll_top: Option<i32>,
    pub last_invocation_ms: Option<f64>,
}

/// Element whose scroll position drives a [`ScrollTrigger`]
pub trait ScrollContainer {
    fn geometry(&self) -> ScrollGeometry;
    /// Registers `listener` for the container's scroll events until the returned binding is released
    fn bind_scroll(&self, listener: Rc<dyn Fn()>) -> ScrollBinding;
}

/// Registration of a scroll listener, released on `unbind` or drop
pub struct ScrollBinding {
    unbind: Option<Box<dyn FnOnce()>>,
}

impl ScrollBinding {
    pub fn new(unbind: impl FnOnce() + 'static) -> Self {
        Self {
            unbind: Some(Box::new(unbind)),
        }
    }

    pub fn unbind(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unbind) = self.unbind.take() {
            unbind();
        }
    }
}

impl Drop for ScrollBinding {
    fn drop(&mut self) {
        self.release();
    }
}

/// Decides whether the handler should fire for the given geometry.
/// Without a previous scroll top, any positive offset counts as scrolling down.
/// Without a previous invocation, the idle window is considered elapsed.
pub fn should_trigger(
    state: &TriggerState,
    geometry: &ScrollGeometry,
    config: &ScrollTriggerConfig,
    now_ms: f64,
) -> bool {
    let distance_to_bottom = geometry.distance_to_bottom();
    let is_scrolling_down = geometry.scroll_top > state.last_scroll_top.unwrap_or_default();
    let is_near_bottom = distance_to_bottom < config.effective_threshold() || distance_to_bottom <= 0;
    let is_idle = state.last_invocation_ms.is_none_or(|last_invocation_ms| now_ms - last_invocation_ms >= f64::from(config.idle_ms));
    is_scrolling_down && is_near_bottom && is_idle
}

struct TriggerInner {
    container: Rc<dyn ScrollContainer>,
    config: ScrollTriggerConfig,
    skip: Box<dyn Fn() -> bool>,
    handler: Rc<dyn Fn()>,
    scheduler: Rc<dyn Scheduler>,
    state: Cell<TriggerState>,
    is_disposed: Cell<bool>,
}

impl TriggerInner {
    fn evaluate(&self) {
        if self.is_disposed.get() || (self.skip)() {
            return;
        }
        let geometry = self.container.geometry();
        let now_ms = self.scheduler.now_ms();
        let mut state = self.state.get();
        let is_triggered = should_trigger(&state, &geometry, &self.config, now_ms);
        state.last_scroll_top = Some(geometry.scroll_top);
        if is_triggered {
            state.last_invocation_ms = Some(now_ms);
        }
        self.state.set(state);

        if is_triggered {
            log::debug!("Scroll trigger fired, distance to bottom: {}px", geometry.distance_to_bottom());
            let handler = self.handler.clone();
            self.scheduler.schedule_next_tick(Box::new(move || handler()));
        }
    }
}

/// Calls a handler whenever a scroll container is scrolled down close to its bottom.
///
/// Scroll events are rate limited by `throttle_ms` before being evaluated and successive handler
/// invocations are at least `idle_ms` apart. The handler always runs on the next tick of the
/// scheduler, never inside the scroll event. The listener is released by [`ScrollTrigger::dispose`]
/// or when the trigger is dropped.
pub struct ScrollTrigger {
    inner: Rc<TriggerInner>,
    limiter: RateLimiter,
    binding: RefCell<Option<ScrollBinding>>,
}

impl ScrollTrigger {
    /// Binds the rate-limited listener to `container` and evaluates once right away,
    /// so content shorter than its container still gets the handler called.
    pub fn attach(
        container: impl ScrollContainer + 'static,
        config: ScrollTriggerConfig,
        skip: impl Fn() -> bool + 'static,
        handler: impl Fn() + 'static,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        let inner = Rc::new(TriggerInner {
            container: Rc::new(container),
            config,
            skip: Box::new(skip),
            handler: Rc::new(handler),
            scheduler: scheduler.clone(),
            state: Cell::new(TriggerState::default()),
            is_disposed: Cell::new(false),
        });

        let weak_inner = Rc::downgrade(&inner);
        let limiter = RateLimiter::new(
            move || if let Some(inner) = weak_inner.upgrade() {
                inner.evaluate();
            },
            config.throttle_ms,
            scheduler,
        );
        let listener_limiter = limiter.clone();
        let binding = inner.container.bind_scroll(Rc::new(move || listener_limiter.call()));
        log::debug!("Scroll trigger attached with {config:?}");

        inner.evaluate();

        Self {
            inner,
            limiter,
            binding: RefCell::new(Some(binding)),
        }
    }

    pub fn state(&self) -> TriggerState {
        self.inner.state.get()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed.get()
    }

    /// Entry point of scroll events, rate limited by the throttle threshold
    pub fn on_scroll(&self) {
        self.limiter.call();
    }

    /// Evaluates the current scroll position right away, bypassing the rate limiter
    pub fn evaluate(&self) {
        self.inner.evaluate();
    }

    /// Unbinds the scroll listener and cancels the deferred evaluation.
    /// A handler invocation already scheduled still runs.
    pub fn dispose(&self) {
        if self.inner.is_disposed.replace(true) {
            return;
        }
        self.limiter.dispose();
        if let Some(binding) = self.binding.borrow_mut().take() {
            binding.unbind();
        }
        log::debug!("Scroll trigger disposed");
    }
}

impl Drop for ScrollTrigger {
    fn drop(&mut self) {
        self.dispose();
    }
}
