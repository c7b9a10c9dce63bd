//! `requestAnimationFrame` loop

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

type FrameClosure = Closure<dyn FnMut(f64)>;

/// Calls a callback once per animation frame until stopped
///
/// The scheduled closure only holds a weak reference to itself, so
/// dropping the loop frees it.
pub struct AnimationLoop {
    closure: Rc<RefCell<Option<FrameClosure>>>,
    handle: Rc<Cell<Option<i32>>>,
}

impl AnimationLoop {
    /// Schedule `on_frame` for the next frame and every frame after
    pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let closure: Rc<RefCell<Option<FrameClosure>>> = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));

        let closure_weak = Rc::downgrade(&closure);
        let handle_inner = handle.clone();
        let frame = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            handle_inner.set(None);
            on_frame(timestamp);

            let Some(slot) = closure_weak.upgrade() else {
                return;
            };
            if let Some(next) = slot.borrow().as_ref() {
                match request_frame(next) {
                    Ok(id) => handle_inner.set(Some(id)),
                    Err(e) => tracing::warn!("Failed to schedule frame: {:?}", e),
                }
            }
        });

        handle.set(Some(request_frame(&frame)?));
        *closure.borrow_mut() = Some(frame);
        tracing::debug!("Animation loop started");

        Ok(Self { closure, handle })
    }

    pub fn is_running(&self) -> bool {
        self.handle.get().is_some()
    }

    /// Cancel the pending frame and free the callback
    pub fn stop(&mut self) {
        if let Some(id) = self.handle.take()
            && let Some(window) = web_sys::window()
            && let Err(e) = window.cancel_animation_frame(id)
        {
            tracing::warn!("Failed to cancel animation frame: {:?}", e);
        }
        if self.closure.borrow_mut().take().is_some() {
            tracing::debug!("Animation loop stopped");
        }
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(closure: &FrameClosure) -> Result<i32, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    window.request_animation_frame(closure.as_ref().unchecked_ref())
}
