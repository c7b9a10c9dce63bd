//! Viewer configuration structures
//!
//! This module provides configurable settings for the viewer that can be
//! serialized and loaded from RON documents. Every field has a default, so a
//! partial document only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::constants;
use crate::face::FaceGroup;

/// Errors that can occur while loading or saving a configuration
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Deserialization error: {0}")]
    Deserialize(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane distance
    pub near_plane: f32,
    /// Far clipping plane distance
    pub far_plane: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: constants::camera::FOV_DEGREES,
            near_plane: constants::camera::NEAR_PLANE,
            far_plane: constants::camera::FAR_PLANE,
        }
    }
}

/// A directional light aimed at the origin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectionalLightConfig {
    /// Light position; the light shines from here towards the origin
    pub position: [f32; 3],
    /// Light color
    pub color: Color,
    /// Intensity multiplier
    pub intensity: f32,
}

/// Lighting configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    /// Ambient light color
    pub ambient_color: Color,
    /// Ambient light intensity
    pub ambient_intensity: f32,
    /// Directional lights
    pub directional: Vec<DirectionalLightConfig>,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: Color::WHITE,
            ambient_intensity: constants::lighting::AMBIENT_INTENSITY,
            directional: vec![
                DirectionalLightConfig {
                    position: constants::lighting::KEY_POSITION,
                    color: Color::WHITE,
                    intensity: constants::lighting::KEY_INTENSITY,
                },
                DirectionalLightConfig {
                    position: constants::lighting::FILL_POSITION,
                    color: Color::WHITE,
                    intensity: constants::lighting::FILL_INTENSITY,
                },
            ],
        }
    }
}

/// Fallback face colors used when a face group has no texture
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaletteConfig {
    /// Front and back faces
    pub front: Color,
    /// Right and left faces
    pub side: Color,
    /// Top and bottom faces
    pub top: Color,
    /// Edge overlay
    pub edge: Color,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            front: Color::from_hex(constants::palette::FRONT),
            side: Color::from_hex(constants::palette::SIDE),
            top: Color::from_hex(constants::palette::TOP),
            edge: Color::from_hex(constants::palette::EDGE),
        }
    }
}

impl PaletteConfig {
    /// Fallback color for a face group
    pub fn face_color(&self, group: FaceGroup) -> Color {
        match group {
            FaceGroup::Front => self.front,
            FaceGroup::Side => self.side,
            FaceGroup::Top => self.top,
        }
    }
}

/// Pointer interaction configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    /// Radians of rotation per pixel dragged
    pub drag_sensitivity: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: constants::DRAG_SENSITIVITY,
        }
    }
}

/// Floor reflection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReflectionConfig {
    /// Gap between the box bottom and the mirrored copy
    pub gap: f32,
    /// Opacity of the mirrored materials
    pub opacity: f32,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            gap: constants::REFLECTION_GAP,
            opacity: constants::REFLECTION_OPACITY,
        }
    }
}

/// Rasterization configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// MSAA sample count (1 = disabled, 4)
    pub msaa_sample_count: u32,
    /// Edge overlay crease angle in degrees
    pub edge_threshold_degrees: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            msaa_sample_count: constants::MSAA_SAMPLE_COUNT,
            edge_threshold_degrees: constants::EDGE_THRESHOLD_DEGREES,
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ViewerConfig {
    /// Camera settings
    #[serde(default)]
    pub camera: CameraConfig,
    /// Lighting settings
    #[serde(default)]
    pub lighting: LightingConfig,
    /// Face palette
    #[serde(default)]
    pub palette: PaletteConfig,
    /// Drag settings
    #[serde(default)]
    pub interaction: InteractionConfig,
    /// Reflection settings
    #[serde(default)]
    pub reflection: ReflectionConfig,
    /// Render settings
    #[serde(default)]
    pub render: RenderConfig,
}

impl ViewerConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a RON document
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            ron::from_str(source).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty-printed RON
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Check values the renderer cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_degrees must be in (0, 180), got {}",
                camera.fov_degrees
            )));
        }
        if camera.near_plane <= 0.0 || camera.far_plane <= camera.near_plane {
            return Err(ConfigError::Invalid(format!(
                "clipping planes must satisfy 0 < near < far, got {}..{}",
                camera.near_plane, camera.far_plane
            )));
        }
        if !matches!(self.render.msaa_sample_count, 1 | 4) {
            return Err(ConfigError::Invalid(format!(
                "msaa_sample_count must be 1 or 4, got {}",
                self.render.msaa_sample_count
            )));
        }
        if !(0.0..=1.0).contains(&self.reflection.opacity) {
            return Err(ConfigError::Invalid(format!(
                "reflection opacity must be in [0, 1], got {}",
                self.reflection.opacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = ViewerConfig::default();
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.camera.near_plane, 0.1);
        assert_eq!(config.camera.far_plane, 1000.0);
        assert_eq!(config.lighting.directional.len(), 2);
        assert_eq!(config.interaction.drag_sensitivity, 0.01);
        assert_eq!(config.palette.face_color(FaceGroup::Side).to_hex(), 0x4a90d9);
    }

    #[test]
    fn test_ron_roundtrip() {
        let mut config = ViewerConfig::default();
        config.reflection.opacity = 0.5;
        config.palette.top = Color::from_hex(0x123456);
        let text = config.to_ron_string().unwrap();
        let back = ViewerConfig::from_ron_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config =
            ViewerConfig::from_ron_str("(interaction: (drag_sensitivity: 0.02))").unwrap();
        assert_eq!(config.interaction.drag_sensitivity, 0.02);
        assert_eq!(config.camera, CameraConfig::default());
        assert_eq!(config.palette, PaletteConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            ViewerConfig::from_ron_str("(camera: (near_plane: 5.0, far_plane: 1.0))"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ViewerConfig::from_ron_str("(render: (msaa_sample_count: 3))"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ViewerConfig::from_ron_str("(camera: "),
            Err(ConfigError::Deserialize(_))
        ));
    }
}
