//! Global constants for mockup-renderer

/// Viewport constants
pub mod viewport {
    /// Depth buffer format
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
}

/// Lighting limits
pub mod lighting {
    /// Directional lights the light uniform has room for
    pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;
}

/// Phong material constants
pub mod material {
    /// Specular highlight color (sRGB hex)
    pub const SPECULAR: u32 = 0x111111;
    /// Specular exponent
    pub const SHININESS: f32 = 30.0;
}
