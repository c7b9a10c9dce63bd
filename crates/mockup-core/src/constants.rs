//! Global constants for mockup-core

/// Camera defaults
pub mod camera {
    /// Vertical field of view in degrees
    pub const FOV_DEGREES: f32 = 75.0;
    /// Near clipping plane
    pub const NEAR_PLANE: f32 = 0.1;
    /// Far clipping plane
    pub const FAR_PLANE: f32 = 1000.0;
}

/// Fallback face colors (sRGB hex)
pub mod palette {
    /// Right and left faces
    pub const SIDE: u32 = 0x4a90d9;
    /// Top and bottom faces
    pub const TOP: u32 = 0x6ab04c;
    /// Front and back faces
    pub const FRONT: u32 = 0xe17055;
    /// Edge overlay
    pub const EDGE: u32 = 0x000000;
}

/// Light rig defaults
pub mod lighting {
    /// Ambient light intensity
    pub const AMBIENT_INTENSITY: f32 = 0.6;
    /// Key light position (the light points at the origin)
    pub const KEY_POSITION: [f32; 3] = [5.0, 5.0, 5.0];
    /// Key light intensity
    pub const KEY_INTENSITY: f32 = 0.8;
    /// Fill light position
    pub const FILL_POSITION: [f32; 3] = [-5.0, -5.0, -5.0];
    /// Fill light intensity
    pub const FILL_INTENSITY: f32 = 0.4;
}

/// Radians of rotation per pixel of pointer travel
pub const DRAG_SENSITIVITY: f32 = 0.01;

/// Vertical gap between the box and its reflection
pub const REFLECTION_GAP: f32 = 0.01;

/// Opacity of the reflection materials
pub const REFLECTION_OPACITY: f32 = 0.3;

/// Minimum angle between adjacent face normals for an edge to be drawn
pub const EDGE_THRESHOLD_DEGREES: f32 = 1.0;

/// Default MSAA sample count
pub const MSAA_SAMPLE_COUNT: u32 = 4;

/// Position quantization used when matching shared edges (decimal places)
pub const EDGE_PRECISION_POINTS: i32 = 4;
