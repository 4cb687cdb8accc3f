use std::rc::Rc;

use leptos::html;
use leptos::html::ElementType;
use leptos::prelude::*;
use leptos::wasm_bindgen::JsCast;
use leptos_use::{use_window_size, UseWindowSizeReturn};
use web_sys::HtmlElement;

use crate::config::ScrollOptions;
use crate::scheduler::{BrowserScheduler, Scheduler};
use crate::trigger::{ScrollContainer, ScrollTrigger};

/// Attaches a [`ScrollTrigger`] to the element of `node_ref` once it is mounted and disposes of it
/// with the current reactive owner. Options set in the element's `infinite-scrollsy-*` attributes
/// are used where `options` leaves a value unset.
pub fn use_infinite_scroll<E>(
    node_ref: NodeRef<E>,
    options: ScrollOptions,
    skip: Signal<bool>,
    handler: Callback<()>,
)
where
    E: ElementType,
    E::Output: JsCast + Clone + 'static,
{
    let UseWindowSizeReturn { height, .. } = use_window_size();
    let scroll_trigger = use_scroll_trigger_slot();

    Effect::new(move |_| {
        let Some(node) = node_ref.get() else {
            return;
        };
        let element = match node.dyn_into::<HtmlElement>() {
            Ok(element) => element,
            Err(_) => {
                log::warn!("Infinite scroll container is not an html element.");
                return;
            }
        };
        let element_options = options.clone().or(ScrollOptions::from_element(&element));
        attach_scroll_trigger(
            scroll_trigger,
            element,
            element_options,
            height.get_untracked() as i32,
            skip,
            handler,
            Rc::new(BrowserScheduler::new()),
        );
    });
}

/// Creates the slot holding the [`ScrollTrigger`] of the current owner.
/// The trigger in the slot is disposed of when the owner is cleaned up.
pub fn use_scroll_trigger_slot() -> StoredValue<Option<ScrollTrigger>, LocalStorage> {
    let scroll_trigger = StoredValue::new_local(None::<ScrollTrigger>);
    on_cleanup(move || {
        scroll_trigger.try_update_value(|trigger| {
            if let Some(trigger) = trigger.take() {
                trigger.dispose();
            }
        });
    });
    scroll_trigger
}

/// Resolves `options` against `viewport_height`, attaches a trigger to `container` and stores it in
/// `scroll_trigger`. A trigger already in the slot is dropped, which disposes of it.
pub fn attach_scroll_trigger(
    scroll_trigger: StoredValue<Option<ScrollTrigger>, LocalStorage>,
    container: impl ScrollContainer + 'static,
    options: ScrollOptions,
    viewport_height: i32,
    skip: Signal<bool>,
    handler: Callback<()>,
    scheduler: Rc<dyn Scheduler>,
) {
    let trigger = ScrollTrigger::attach(
        container,
        options.resolve(viewport_height),
        move || skip.get_untracked(),
        move || handler.run(()),
        scheduler,
    );
    scroll_trigger.set_value(Some(trigger));
}

/// Scrollable container calling `handler` when its content is scrolled close to the bottom
#[component]
pub fn InfiniteScroll(
    /// callback to load more content
    handler: Callback<()>,
    /// signal preventing any call to `handler` while true, e.g. while content is loading
    #[prop(into, default = Signal::stored(false))]
    skip: Signal<bool>,
    /// minimum time in ms between two evaluations of the scroll position
    #[prop(into, optional)]
    throttle: Option<String>,
    /// minimum time in ms between two calls to `handler`
    #[prop(into, optional)]
    idle: Option<String>,
    /// distance in px to the bottom under which `handler` is called
    #[prop(into, optional)]
    distance: Option<String>,
    /// if set, the distance is measured from the window height instead
    #[prop(into, optional)]
    flex: Option<String>,
    #[prop(default = "")]
    class: &'static str,
    children: Children,
) -> impl IntoView {
    let container_ref = NodeRef::<html::Div>::new();
    let options = ScrollOptions {
        throttle,
        idle,
        distance,
        flex,
    };
    use_infinite_scroll(container_ref, options, skip, handler);

    view! {
        <div class=format!("overflow-y-auto {class}") node_ref=container_ref>
            {children()}
        </div>
    }
}
