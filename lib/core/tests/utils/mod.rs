#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use scrollsy_core::config::ScrollTriggerConfig;
use scrollsy_core::scheduler::VirtualScheduler;
use scrollsy_core::trigger::{ScrollBinding, ScrollContainer, ScrollGeometry, ScrollTrigger};

/// In-memory scroll container whose scroll events are dispatched by the test
#[derive(Clone, Default)]
pub struct TestContainer {
    geometry: Rc<Cell<ScrollGeometry>>,
    listener: Rc<RefCell<Option<Rc<dyn Fn()>>>>,
    bind_count: Rc<Cell<usize>>,
}

impl TestContainer {
    pub fn new(client_height: i32, scroll_height: i32) -> Self {
        let container = Self::default();
        container.geometry.set(ScrollGeometry::new(0, client_height, scroll_height));
        container
    }

    pub fn is_bound(&self) -> bool {
        self.listener.borrow().is_some()
    }

    pub fn bind_count(&self) -> usize {
        self.bind_count.get()
    }

    pub fn set_scroll_height(&self, scroll_height: i32) {
        let mut geometry = self.geometry.get();
        geometry.scroll_height = scroll_height;
        self.geometry.set(geometry);
    }

    /// Moves the scroll offset and dispatches a scroll event to the bound listener, if any
    pub fn scroll_to(&self, scroll_top: i32) {
        let mut geometry = self.geometry.get();
        geometry.scroll_top = scroll_top;
        self.geometry.set(geometry);
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}

impl ScrollContainer for TestContainer {
    fn geometry(&self) -> ScrollGeometry {
        self.geometry.get()
    }

    fn bind_scroll(&self, listener: Rc<dyn Fn()>) -> ScrollBinding {
        self.bind_count.set(self.bind_count.get() + 1);
        *self.listener.borrow_mut() = Some(listener);
        let listener_slot = self.listener.clone();
        ScrollBinding::new(move || {
            listener_slot.borrow_mut().take();
        })
    }
}

/// Trigger attached to a [`TestContainer`] with a handler counting its invocations
pub struct TestTrigger {
    pub trigger: ScrollTrigger,
    pub container: TestContainer,
    pub scheduler: VirtualScheduler,
    pub skip: Rc<Cell<bool>>,
    pub invocation_count: Rc<Cell<usize>>,
}

impl TestTrigger {
    pub fn invocation_count(&self) -> usize {
        self.invocation_count.get()
    }
}

pub fn attach_test_trigger(
    container: TestContainer,
    config: ScrollTriggerConfig,
    scheduler: VirtualScheduler,
) -> TestTrigger {
    let skip = Rc::new(Cell::new(false));
    let invocation_count = Rc::new(Cell::new(0));
    let skip_clone = skip.clone();
    let invocation_count_clone = invocation_count.clone();
    let trigger = ScrollTrigger::attach(
        container.clone(),
        config,
        move || skip_clone.get(),
        move || invocation_count_clone.set(invocation_count_clone.get() + 1),
        Rc::new(scheduler.clone()),
    );
    TestTrigger {
        trigger,
        container,
        scheduler,
        skip,
        invocation_count,
    }
}
