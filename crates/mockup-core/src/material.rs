//! Surface materials

use crate::color::Color;
use crate::scene::TextureId;

/// Shading model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Lit with ambient and directional lights
    Phong,
    /// Unlit, for line overlays
    LineBasic,
}

/// Surface appearance of a mesh group or line overlay
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    /// Base color; multiplied with the texture when one is mapped
    pub color: Color,
    pub map: Option<TextureId>,
    pub opacity: f32,
    pub transparent: bool,
}

impl Material {
    /// Flat-colored Phong material
    pub fn phong(color: Color) -> Self {
        Self {
            kind: MaterialKind::Phong,
            color,
            map: None,
            opacity: 1.0,
            transparent: false,
        }
    }

    /// Phong material mapped with a texture (white base color)
    pub fn textured(texture: TextureId) -> Self {
        Self {
            map: Some(texture),
            ..Self::phong(Color::WHITE)
        }
    }

    /// Unlit line material
    pub fn line(color: Color) -> Self {
        Self {
            kind: MaterialKind::LineBasic,
            ..Self::phong(color)
        }
    }

    /// Make the material semi-transparent
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = true;
        self
    }

    pub fn is_opaque(&self) -> bool {
        !self.transparent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textured_is_white_phong() {
        let texture = TextureId::new();
        let material = Material::textured(texture);
        assert_eq!(material.kind, MaterialKind::Phong);
        assert_eq!(material.color, Color::WHITE);
        assert_eq!(material.map, Some(texture));
        assert!(material.is_opaque());
    }

    #[test]
    fn test_with_opacity_marks_transparent() {
        let material = Material::phong(Color::BLACK).with_opacity(0.3);
        assert!(material.transparent);
        assert_eq!(material.opacity, 0.3);
        assert_eq!(Material::phong(Color::BLACK).with_opacity(4.0).opacity, 1.0);
    }

    #[test]
    fn test_line_material() {
        let material = Material::line(Color::BLACK);
        assert_eq!(material.kind, MaterialKind::LineBasic);
        assert_eq!(material.map, None);
    }
}
