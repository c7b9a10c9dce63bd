//! Change detection between options snapshots

use crate::options::BoxOptions;

/// Which parts of the view changed between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptionsDiff {
    pub dimensions: bool,
    pub rotation: bool,
    pub camera_distance: bool,
    pub background: bool,
    pub textures: bool,
    pub reflection: bool,
}

impl OptionsDiff {
    pub fn between(old: &BoxOptions, new: &BoxOptions) -> Self {
        Self {
            dimensions: old.dimensions() != new.dimensions(),
            rotation: old.rotation() != new.rotation(),
            camera_distance: old.camera_distance != new.camera_distance,
            background: old.background_color != new.background_color,
            textures: old.texture_urls() != new.texture_urls(),
            reflection: old.show_reflection != new.show_reflection,
        }
    }

    /// Dimension and texture changes both need the box rebuilt; together they
    /// still need only one rebuild
    pub fn needs_rebuild(&self) -> bool {
        self.dimensions || self.textures
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
