//! Box Mockup Renderer
//!
//! wgpu rendering for the scenes built by `mockup-core`.
//!
//! The renderer never owns scene state. Each frame it drains the resource
//! lifecycle events queued by the core's `ResourceRegistry`, mirrors them
//! into GPU buffers and textures, and draws the scene in three passes:
//! opaque meshes, edge overlays, then translucent meshes.
//!
//! # Module Structure
//!
//! ```text
//! mockup-renderer/
//! ├── renderer/        # Main Renderer, GPU resource cache, render pass
//! ├── sub_renderers/   # Mesh and edge pipelines
//! ├── shaders/         # WGSL sources
//! ├── camera.rs        # Camera uniform
//! ├── light.rs         # Light uniform
//! ├── pipeline.rs      # Pipeline variants and bind group helpers
//! └── vertex.rs        # Vertex formats
//! ```

pub mod camera;
pub mod constants;
pub mod light;
pub mod pipeline;
pub mod renderer;
pub mod sub_renderers;
pub mod vertex;

pub use camera::CameraUniform;
pub use light::{DirectionalLightUniform, LightUniform};
pub use pipeline::{BlendMode, PipelineConfig, PipelineVariant};
pub use renderer::{DrawItem, DrawList, EdgeItem, Renderer, ResourceCache};
