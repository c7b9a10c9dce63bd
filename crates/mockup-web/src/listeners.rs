//! DOM event listener registrations that remove themselves

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

/// Canvas events the viewer listens to
pub const CANVAS_EVENTS: [&str; 7] = [
    "mousedown",
    "mousemove",
    "mouseup",
    "mouseleave",
    "touchstart",
    "touchmove",
    "touchend",
];

/// Window events the viewer listens to
pub const WINDOW_EVENTS: [&str; 1] = ["resize"];

struct Registration {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// Owns every listener the viewer registered
///
/// Clearing (or dropping) the set removes each listener from its target and
/// frees the closures.
#[derive(Default)]
pub struct ListenerSet {
    registrations: Vec<Registration>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event` on `target`
    ///
    /// Non-passive listeners may call `preventDefault`.
    pub fn add(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        self.registrations.push(Registration {
            target: target.clone(),
            event,
            closure,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Remove every listener
    pub fn clear(&mut self) {
        let count = self.registrations.len();
        for registration in self.registrations.drain(..) {
            if let Err(e) = registration.target.remove_event_listener_with_callback(
                registration.event,
                registration.closure.as_ref().unchecked_ref(),
            ) {
                tracing::warn!(event = registration.event, "Failed to remove listener: {:?}", e);
            }
        }
        if count > 0 {
            tracing::debug!("Removed {} event listeners", count);
        }
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn target() -> EventTarget {
        web_sys::window()
            .unwrap()
            .document()
            .unwrap()
            .create_element("div")
            .unwrap()
            .into()
    }

    fn counting(set: &mut ListenerSet, target: &EventTarget, event: &'static str) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        set.add(target, event, true, move |_| inner.set(inner.get() + 1))
            .unwrap();
        count
    }

    fn fire(target: &EventTarget, event: &str) {
        target.dispatch_event(&Event::new(event).unwrap()).unwrap();
    }

    #[wasm_bindgen_test]
    fn test_clear_removes_every_listener() {
        let target = target();
        let mut set = ListenerSet::new();
        let clicks = counting(&mut set, &target, "click");
        let moves = counting(&mut set, &target, "mousemove");
        assert_eq!(set.len(), 2);

        fire(&target, "click");
        fire(&target, "mousemove");
        assert_eq!((clicks.get(), moves.get()), (1, 1));

        set.clear();
        assert!(set.is_empty());
        // A listener left behind would call a freed closure and throw
        fire(&target, "click");
        fire(&target, "mousemove");
        assert_eq!((clicks.get(), moves.get()), (1, 1));
    }

    #[wasm_bindgen_test]
    fn test_drop_removes_listeners() {
        let target = target();
        let mut set = ListenerSet::new();
        let clicks = counting(&mut set, &target, "click");
        drop(set);

        fire(&target, "click");
        assert_eq!(clicks.get(), 0);
    }
}
