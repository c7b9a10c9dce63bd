//! Externally owned view state
//!
//! The host application owns these values and hands the viewer a fresh
//! snapshot whenever any of them changes. Field names follow the host's
//! camelCase JSON.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::color::Color;
use crate::face::FaceSet;

/// Errors that can occur while decoding an options snapshot
#[derive(Debug, Clone, thiserror::Error)]
pub enum OptionsError {
    #[error("Invalid options JSON: {0}")]
    Json(String),

    #[error("Invalid {field}: {value} (must be a positive finite number)")]
    InvalidDimension { field: &'static str, value: f32 },

    #[error("Invalid cameraDistance: {0} (must be a positive finite number)")]
    InvalidCameraDistance(f32),
}

/// Background used when none is given or the given one does not parse
pub const DEFAULT_BACKGROUND: u32 = 0xf0f0f0;

/// Box dimensions in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

/// Box rotation in radians
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    /// Pitch, driven by vertical drag
    pub x: f32,
    /// Yaw, driven by horizontal drag
    pub y: f32,
}

/// Snapshot of the viewer's reactive inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxOptions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub camera_distance: f32,
    #[serde(deserialize_with = "background_or_default")]
    pub background_color: Color,
    pub front_image: Option<String>,
    pub side_image: Option<String>,
    pub top_image: Option<String>,
    pub show_reflection: bool,
}

impl Default for BoxOptions {
    fn default() -> Self {
        Self {
            width: 2.0,
            height: 3.0,
            depth: 1.0,
            rotation_x: 0.2,
            rotation_y: 0.5,
            camera_distance: 5.0,
            background_color: Color::from_hex(DEFAULT_BACKGROUND),
            front_image: None,
            side_image: None,
            top_image: None,
            show_reflection: false,
        }
    }
}

impl BoxOptions {
    /// Decode and validate a JSON snapshot
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| OptionsError::Json(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Encode as JSON
    pub fn to_json(&self) -> Result<String, OptionsError> {
        serde_json::to_string(self).map_err(|e| OptionsError::Json(e.to_string()))
    }

    /// Reject dimensions a box geometry cannot be built from and camera
    /// distances that would put the camera inside or behind the box
    pub fn validate(&self) -> Result<(), OptionsError> {
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(OptionsError::InvalidDimension { field, value });
            }
        }
        if !self.camera_distance.is_finite() || self.camera_distance <= 0.0 {
            return Err(OptionsError::InvalidCameraDistance(self.camera_distance));
        }
        Ok(())
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
            depth: self.depth,
        }
    }

    pub fn rotation(&self) -> Rotation {
        Rotation {
            x: self.rotation_x,
            y: self.rotation_y,
        }
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation_x = rotation.x;
        self.rotation_y = rotation.y;
    }

    /// Texture URLs per face group; blank URLs count as absent
    pub fn texture_urls(&self) -> FaceSet<Option<String>> {
        let normalize = |url: &Option<String>| {
            url.as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string)
        };
        FaceSet::new(
            normalize(&self.front_image),
            normalize(&self.side_image),
            normalize(&self.top_image),
        )
    }
}

/// An unparseable background is logged and replaced so the rest of the
/// snapshot still applies
fn background_or_default<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(Color::parse(&value).unwrap_or_else(|e| {
        warn!(error = %e, "Unsupported background color, using default");
        Color::from_hex(DEFAULT_BACKGROUND)
    }))
}
