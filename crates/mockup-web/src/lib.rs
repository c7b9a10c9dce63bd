//! Browser component for the box mockup viewer
//!
//! Exposes [`BoxViewer`] to JavaScript through `wasm-bindgen`. The viewer
//! owns a canvas inside a host container, drives a `requestAnimationFrame`
//! loop and feeds pointer and touch input to [`mockup_core::BoxPreview`].
//!
//! ```text
//! mockup_web
//! ├── viewer      BoxViewer, the JS facing component
//! ├── surface     WebGPU/WebGL surface and PNG export
//! ├── fetch       Texture loading with fetch()
//! ├── listeners   Self-removing DOM listeners
//! ├── animation   requestAnimationFrame loop
//! ├── layout      CSS to physical pixel sizing
//! ├── logging     tracing to the browser console
//! └── error       Error types
//! ```

pub mod animation;
pub mod error;
pub mod fetch;
pub mod layout;
pub mod listeners;
pub mod logging;
pub mod surface;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{SurfaceError, ViewerError};
pub use viewer::BoxViewer;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
fn start() {
    console_error_panic_hook::set_once();
}

/// Install logging with a custom filter, e.g. `"mockup_core=trace"`
///
/// Must run before the first `BoxViewer` is created, which otherwise installs
/// the default filter.
#[wasm_bindgen(js_name = "initLogging")]
pub fn init_logging(directives: Option<String>) {
    logging::init(directives.as_deref());
}
