//! The `BoxViewer` component exposed to JavaScript
//!
//! Shared state lives in an `Rc<RefCell<..>>`. DOM callbacks and the
//! animation loop hold weak references to it, and no borrow is held across
//! an await or while calling back into JavaScript.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use mockup_core::{BoxOptions, BoxPreview, PointerPosition, RebuildTicket, Rotation, ViewerConfig};
use mockup_core::{ViewportSize, load_face_textures};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{Event, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent};

use crate::animation::AnimationLoop;
use crate::error::ViewerError;
use crate::fetch::FetchTextureLoader;
use crate::layout::physical_size;
use crate::listeners::{CANVAS_EVENTS, ListenerSet, WINDOW_EVENTS};
use crate::surface::{CanvasExporter, GpuSurface};

struct ViewerState {
    preview: BoxPreview,
    container: Option<HtmlElement>,
    canvas: Option<HtmlCanvasElement>,
    gpu: Option<GpuSurface>,
    on_rotate: Option<js_sys::Function>,
    listeners: ListenerSet,
    animation: Option<AnimationLoop>,
    mounting: bool,
    disposed: bool,
}

impl ViewerState {
    /// Stop the loop, drop listeners, release the scene and the GPU, and
    /// detach the canvas
    fn teardown(&mut self) {
        if let Some(mut animation) = self.animation.take() {
            animation.stop();
        }
        self.listeners.clear();

        if let Err(e) = self.preview.unmount() {
            tracing::warn!("Failed to release scene resources: {}", e);
        }
        if let Some(mut gpu) = self.gpu.take() {
            gpu.release();
        }
        if let Some(canvas) = self.canvas.take() {
            canvas.remove();
        }
        self.container = None;
    }

    /// Physical size of the container, or `None` without one
    fn container_size(&self) -> Option<ViewportSize> {
        let container = self.container.as_ref()?;
        let rect = container.get_bounding_client_rect();
        let ratio = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        Some(physical_size(rect.width(), rect.height(), ratio))
    }

    fn handle_resize(&mut self) {
        let Some(size) = self.container_size() else {
            return;
        };
        if !self.preview.resize(Some(size)) {
            return;
        }
        if let Some(canvas) = &self.canvas {
            size_canvas(canvas, self.container.as_ref(), size);
        }
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(size.width, size.height);
        }
    }

    fn draw(&mut self) {
        let Self { preview, gpu, .. } = self;
        if let Some(gpu) = gpu.as_mut()
            && let Some(mut frame) = preview.frame()
            && let Err(e) = gpu.draw(&mut frame)
        {
            tracing::warn!("Frame failed: {}", e);
        }
    }
}

impl Drop for ViewerState {
    fn drop(&mut self) {
        if !self.disposed {
            self.teardown();
        }
    }
}

/// Interactive 3D box preview rendered into a container element
#[wasm_bindgen]
pub struct BoxViewer {
    state: Rc<RefCell<ViewerState>>,
}

#[wasm_bindgen]
impl BoxViewer {
    /// Create a viewer from a JSON options snapshot and an optional RON
    /// config
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: &str, config_ron: Option<String>) -> Result<BoxViewer, JsValue> {
        crate::logging::init(None);
        let options = BoxOptions::from_json(options_json).map_err(ViewerError::from)?;
        let config = match config_ron {
            Some(source) => ViewerConfig::from_ron_str(&source).map_err(ViewerError::from)?,
            None => ViewerConfig::default(),
        };
        let state = ViewerState {
            preview: BoxPreview::new(options, config),
            container: None,
            canvas: None,
            gpu: None,
            on_rotate: None,
            listeners: ListenerSet::new(),
            animation: None,
            mounting: false,
            disposed: false,
        };
        Ok(Self {
            state: Rc::new(RefCell::new(state)),
        })
    }

    /// Mount into `container`: create the canvas and GPU surface, register
    /// listeners, start the render loop and build the box
    ///
    /// Resolves immediately when no container is given.
    pub fn mount(&self, container: Option<HtmlElement>) -> js_sys::Promise {
        let state = self.state.clone();
        future_to_promise(async move {
            mount(state, container).await?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Apply a new options snapshot
    #[wasm_bindgen(js_name = "setOptions")]
    pub fn set_options(&self, options_json: &str) -> Result<(), JsValue> {
        let options = BoxOptions::from_json(options_json).map_err(ViewerError::from)?;
        let ticket = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return Err(ViewerError::Disposed.into());
            }
            state
                .preview
                .set_options(options)
                .map_err(ViewerError::from)?
        };
        if let Some(ticket) = ticket {
            spawn_rebuild(Rc::downgrade(&self.state), ticket);
        }
        Ok(())
    }

    /// Register `callback(rotationX, rotationY)`, called after each drag step
    #[wasm_bindgen(js_name = "onRotate")]
    pub fn on_rotate(&self, callback: Option<js_sys::Function>) {
        self.state.borrow_mut().on_rotate = callback;
    }

    /// Render one frame and return it as a PNG data URL, or `null` before
    /// the viewer is mounted
    #[wasm_bindgen(js_name = "exportPng")]
    pub fn export_png(&self) -> Option<String> {
        let mut state = self.state.borrow_mut();
        let ViewerState {
            preview,
            gpu,
            canvas,
            ..
        } = &mut *state;
        let (Some(gpu), Some(canvas)) = (gpu.as_mut(), canvas.as_ref()) else {
            return None;
        };
        preview.export_png(&mut CanvasExporter { gpu, canvas })
    }

    #[wasm_bindgen(js_name = "isMounted")]
    pub fn is_mounted(&self) -> bool {
        let state = self.state.borrow();
        state.preview.is_mounted() && state.gpu.is_some()
    }

    /// Current options as JSON
    pub fn options(&self) -> Result<String, JsValue> {
        let json = self.state.borrow().preview.options().to_json();
        json.map_err(|e| ViewerError::from(e).into())
    }

    /// Tear everything down; the viewer cannot be mounted again
    pub fn dispose(&self) {
        let mut state = self.state.borrow_mut();
        if state.disposed {
            return;
        }
        state.disposed = true;
        state.on_rotate = None;
        state.teardown();
        tracing::info!("Box viewer disposed");
    }
}

async fn mount(
    state: Rc<RefCell<ViewerState>>,
    container: Option<HtmlElement>,
) -> Result<(), ViewerError> {
    let Some(container) = container else {
        tracing::debug!("No container, skipping mount");
        return Ok(());
    };

    let (canvas, size, samples) = {
        let mut s = state.borrow_mut();
        if s.disposed {
            return Err(ViewerError::Disposed);
        }
        if s.mounting || s.preview.is_mounted() {
            tracing::warn!("Box viewer is already mounted");
            return Ok(());
        }
        s.mounting = true;
        s.container = Some(container.clone());
        let size = s.container_size().unwrap_or(ViewportSize::new(1, 1));
        let canvas = match create_canvas(&container, size) {
            Ok(canvas) => canvas,
            Err(e) => {
                s.mounting = false;
                s.container = None;
                return Err(e);
            }
        };
        s.canvas = Some(canvas.clone());
        (canvas, size, s.preview.config().render.msaa_sample_count)
    };

    let gpu = GpuSurface::new(canvas.clone(), size.width, size.height, samples).await;

    let ticket = {
        let mut s = state.borrow_mut();
        s.mounting = false;
        if s.disposed {
            // Disposed while the device was being created
            canvas.remove();
            return Err(ViewerError::Disposed);
        }
        let gpu = match gpu {
            Ok(gpu) => gpu,
            Err(e) => {
                s.teardown();
                return Err(e.into());
            }
        };
        s.gpu = Some(gpu);

        let ticket = match s.preview.mount(Some(size)) {
            Ok(ticket) => ticket,
            Err(e) => {
                s.teardown();
                return Err(e.into());
            }
        };
        if let Err(e) = attach(&state, &mut s, &canvas) {
            s.teardown();
            return Err(ViewerError::dom(e));
        }
        tracing::info!("Box viewer mounted with {} listeners", s.listeners.len());
        ticket
    };

    if let Some(ticket) = ticket {
        spawn_rebuild(Rc::downgrade(&state), ticket);
    }
    Ok(())
}

/// Register input listeners and start the frame loop
fn attach(
    state: &Rc<RefCell<ViewerState>>,
    s: &mut ViewerState,
    canvas: &HtmlCanvasElement,
) -> Result<(), JsValue> {
    let weak = Rc::downgrade(state);
    register_listeners(&mut s.listeners, canvas, &weak)?;
    s.animation = Some(AnimationLoop::start(move |_| {
        if let Some(state) = weak.upgrade() {
            state.borrow_mut().draw();
        }
    })?);
    Ok(())
}

/// Load the ticket's textures, then assemble the box if the ticket is
/// still current
fn spawn_rebuild(state: Weak<RefCell<ViewerState>>, ticket: RebuildTicket) {
    spawn_local(async move {
        let images = load_face_textures(&FetchTextureLoader, ticket.urls()).await;
        let Some(state) = state.upgrade() else {
            return;
        };
        let mut s = state.borrow_mut();
        if let Err(e) = s.preview.complete_rebuild(ticket, images) {
            tracing::warn!("Rebuild failed: {}", e);
        }
    });
}

fn create_canvas(container: &HtmlElement, size: ViewportSize) -> Result<HtmlCanvasElement, ViewerError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ViewerError::Dom("No document".into()))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(ViewerError::dom)?
        .dyn_into()
        .map_err(|_| ViewerError::Dom("Created element is not a canvas".into()))?;
    size_canvas(&canvas, Some(container), size);
    container.append_child(&canvas).map_err(ViewerError::dom)?;
    Ok(canvas)
}

/// Set the backing size and lay the canvas out at the container's CSS size
fn size_canvas(canvas: &HtmlCanvasElement, container: Option<&HtmlElement>, size: ViewportSize) {
    canvas.set_width(size.width);
    canvas.set_height(size.height);
    let style = canvas.style();
    let (css_width, css_height) = container.map_or((size.width as f64, size.height as f64), |c| {
        let rect = c.get_bounding_client_rect();
        (rect.width(), rect.height())
    });
    for (property, value) in [
        ("display", "block".to_string()),
        ("width", format!("{}px", css_width)),
        ("height", format!("{}px", css_height)),
    ] {
        if let Err(e) = style.set_property(property, &value) {
            tracing::warn!("Failed to set canvas {}: {:?}", property, e);
        }
    }
}

fn register_listeners(
    listeners: &mut ListenerSet,
    canvas: &HtmlCanvasElement,
    state: &Weak<RefCell<ViewerState>>,
) -> Result<(), JsValue> {
    for event in CANVAS_EVENTS {
        let state = state.clone();
        // touchmove calls preventDefault to stop page scrolling
        let passive = event != "touchmove";
        listeners.add(canvas, event, passive, move |e| {
            if let Some(state) = state.upgrade() {
                handle_canvas_event(&state, event, &e);
            }
        })?;
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    for event in WINDOW_EVENTS {
        let state = state.clone();
        listeners.add(&window, event, true, move |_| {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().handle_resize();
            }
        })?;
    }
    Ok(())
}

fn handle_canvas_event(state: &Rc<RefCell<ViewerState>>, event: &str, e: &Event) {
    let rotated = {
        let mut s = state.borrow_mut();
        let rotation = match event {
            "mousedown" => {
                if let Some(pos) = mouse_position(e) {
                    s.preview.pointer_down(pos);
                }
                None
            }
            "mousemove" => mouse_position(e).and_then(|pos| s.preview.pointer_move(pos)),
            "mouseup" | "mouseleave" => {
                s.preview.pointer_up();
                None
            }
            "touchstart" => {
                s.preview.touch_start(&touch_positions(e));
                None
            }
            "touchmove" => {
                let touches = touch_positions(e);
                if s.preview.is_dragging() && touches.len() == 1 {
                    e.prevent_default();
                }
                s.preview.touch_move(&touches)
            }
            "touchend" => {
                s.preview.touch_end();
                None
            }
            _ => None,
        };
        rotation.map(|rotation| (rotation, s.on_rotate.clone()))
    };

    if let Some((rotation, Some(callback))) = rotated {
        notify_rotation(&callback, rotation);
    }
}

fn notify_rotation(callback: &js_sys::Function, rotation: Rotation) {
    let x = JsValue::from_f64(rotation.x as f64);
    let y = JsValue::from_f64(rotation.y as f64);
    if let Err(e) = callback.call2(&JsValue::NULL, &x, &y) {
        tracing::warn!("Rotation callback threw: {:?}", e);
    }
}

fn mouse_position(e: &Event) -> Option<PointerPosition> {
    let e = e.dyn_ref::<MouseEvent>()?;
    Some(PointerPosition::new(e.client_x() as f32, e.client_y() as f32))
}

fn touch_positions(e: &Event) -> Vec<PointerPosition> {
    let Some(e) = e.dyn_ref::<TouchEvent>() else {
        return Vec::new();
    };
    let touches = e.touches();
    (0..touches.length())
        .filter_map(|i| touches.get(i))
        .map(|t| PointerPosition::new(t.client_x() as f32, t.client_y() as f32))
        .collect()
}
