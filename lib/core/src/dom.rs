use std::rc::Rc;

use leptos::wasm_bindgen::closure::Closure;
use leptos::wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement};

use scrollsy_utils::constants::SCROLL_EVENT;
use scrollsy_utils::node_utils::get_scroll_geometry;

use crate::trigger::{ScrollBinding, ScrollContainer, ScrollGeometry};

impl ScrollContainer for HtmlElement {
    fn geometry(&self) -> ScrollGeometry {
        get_scroll_geometry(self)
    }

    fn bind_scroll(&self, listener: Rc<dyn Fn()>) -> ScrollBinding {
        let scroll_callback = Closure::wrap(Box::new(move |_: Event| {
            listener();
        }) as Box<dyn FnMut(Event)>);

        if let Err(e) = self.add_event_listener_with_callback(SCROLL_EVENT, scroll_callback.as_ref().unchecked_ref()) {
            log::error!("Failed to bind scroll listener: {e:?}");
        }

        let element = self.clone();
        ScrollBinding::new(move || {
            if let Err(e) = element.remove_event_listener_with_callback(SCROLL_EVENT, scroll_callback.as_ref().unchecked_ref()) {
                log::warn!("Failed to unbind scroll listener: {e:?}");
            }
        })
    }
}
