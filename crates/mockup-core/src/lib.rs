//! Box Mockup Viewer Core
//!
//! GPU-free building blocks for the box mockup viewer:
//! - BoxOptions: externally owned view state (dimensions, rotation, textures)
//! - ViewerConfig: camera, lighting, palette and interaction settings
//! - Geometry: box and edge-overlay generation
//! - Scene: scene graph plus a resource registry with disposal bookkeeping
//! - BoxPreview: the controller that keeps the scene in sync with the options

pub mod camera;
pub mod color;
pub mod config;
pub mod constants;
pub mod drag;
pub mod face;
pub mod geometry;
pub mod material;
pub mod options;
pub mod preview;
pub mod scene;
pub mod sync;
pub mod texture;

pub use camera::PerspectiveCamera;
pub use color::{Color, ColorError};
pub use config::{ConfigError, ViewerConfig};
pub use drag::{DragController, PointerPosition, RotationDelta};
pub use face::{FaceGroup, FaceSet, FaceSlot};
pub use geometry::{GeometryData, GeometryGroup, Topology};
pub use material::{Material, MaterialKind};
pub use options::{BoxOptions, Dimensions, OptionsError, Rotation};
pub use preview::{BoxPreview, Frame, FrameExporter, RebuildTicket, ViewportSize};
pub use scene::{
    GeometryId, Light, LineNode, MaterialId, MeshNode, NodeId, ResourceCounts, ResourceError,
    ResourceEvent, ResourceRegistry, ResourceStats, Scene, TextureId, Transform,
};
pub use sync::OptionsDiff;
pub use texture::{TextureError, TextureImage, TextureLoader, load_face_textures};
