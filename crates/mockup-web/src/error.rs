//! Error types for the browser component

use mockup_core::{ConfigError, OptionsError, ResourceError};
use wasm_bindgen::{JsCast, JsValue};

/// Errors that can occur while creating or driving the GPU surface
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("No suitable GPU adapter found")]
    NoAdapter,

    #[error("Failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("Surface reports no supported formats")]
    NoFormat,

    #[error("Failed to acquire frame: {0}")]
    Frame(wgpu::SurfaceError),

    #[error("Failed to read canvas: {0}")]
    Export(String),

    #[error("Canvas surfaces need a wasm32 target")]
    Unsupported,
}

/// Errors surfaced to JavaScript
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("DOM error: {0}")]
    Dom(String),

    #[error("Viewer has been disposed")]
    Disposed,
}

impl ViewerError {
    /// Wrap a JavaScript exception
    pub fn dom(value: JsValue) -> Self {
        Self::Dom(js_message(&value))
    }
}

impl From<ViewerError> for JsValue {
    fn from(error: ViewerError) -> Self {
        js_sys::Error::new(&error.to_string()).into()
    }
}

/// Best-effort message for a thrown JavaScript value
pub fn js_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
