//! Built-in sub-renderers
//!
//! - [`mesh::MeshRenderer`]: lit, textured triangles
//! - [`edges::EdgeRenderer`]: unlit edge overlays

pub mod edges;
pub mod mesh;

pub use edges::EdgeRenderer;
pub use mesh::{MaterialUniform, MeshRenderer, ModelUniform};
