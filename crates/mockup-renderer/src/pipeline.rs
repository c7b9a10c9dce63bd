//! Pipeline utilities
//!
//! Mesh pipelines come in four variants: opaque or translucent, each with
//! normal or mirrored winding. A mirrored transform (negative scale
//! determinant) flips triangle winding, so its front faces are clockwise.

use mockup_core::scene::Transform;
use mockup_core::Material;

/// How fragments combine with the color target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Replace the target and write depth
    Opaque,
    /// Alpha blend without writing depth
    Transparent,
}

/// Which mesh pipeline draws a given material and transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineVariant {
    /// Blending and depth writes.
    pub blend: BlendMode,
    /// Whether the transform flips handedness.
    pub mirrored: bool,
}

impl PipelineVariant {
    /// Every variant, in [`PipelineVariant::index`] order
    pub const ALL: [PipelineVariant; 4] = [
        Self::new(BlendMode::Opaque, false),
        Self::new(BlendMode::Opaque, true),
        Self::new(BlendMode::Transparent, false),
        Self::new(BlendMode::Transparent, true),
    ];

    /// Create a variant
    pub const fn new(blend: BlendMode, mirrored: bool) -> Self {
        Self { blend, mirrored }
    }

    /// Pick the variant for a material drawn with a transform
    pub fn for_material(material: &Material, transform: &Transform) -> Self {
        let blend = if material.is_opaque() {
            BlendMode::Opaque
        } else {
            BlendMode::Transparent
        };
        Self::new(blend, transform.is_mirrored())
    }

    /// Position in [`PipelineVariant::ALL`]
    pub fn index(self) -> usize {
        let blend = match self.blend {
            BlendMode::Opaque => 0,
            BlendMode::Transparent => 2,
        };
        blend + usize::from(self.mirrored)
    }

    /// Winding of front-facing triangles
    pub fn front_face(self) -> wgpu::FrontFace {
        if self.mirrored {
            wgpu::FrontFace::Cw
        } else {
            wgpu::FrontFace::Ccw
        }
    }

    /// Color blend state
    pub fn blend_state(self) -> wgpu::BlendState {
        match self.blend {
            BlendMode::Opaque => wgpu::BlendState::REPLACE,
            BlendMode::Transparent => wgpu::BlendState::ALPHA_BLENDING,
        }
    }

    /// Whether fragments write depth
    pub fn depth_write(self) -> bool {
        self.blend == BlendMode::Opaque
    }

    /// Debug label
    pub fn label(self) -> &'static str {
        match (self.blend, self.mirrored) {
            (BlendMode::Opaque, false) => "Mesh Pipeline",
            (BlendMode::Opaque, true) => "Mirrored Mesh Pipeline",
            (BlendMode::Transparent, false) => "Transparent Mesh Pipeline",
            (BlendMode::Transparent, true) => "Mirrored Transparent Mesh Pipeline",
        }
    }
}

/// Target formats shared by every pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Color target format.
    pub format: wgpu::TextureFormat,
    /// Depth target format.
    pub depth_format: wgpu::TextureFormat,
    /// MSAA sample count.
    pub sample_count: u32,
}

impl PipelineConfig {
    /// Multisample state for this configuration
    pub fn multisample(&self) -> wgpu::MultisampleState {
        wgpu::MultisampleState {
            count: self.sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        }
    }
}

/// Layout entry for a uniform buffer binding
pub fn uniform_layout_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Bind group layout holding a single uniform buffer
pub fn create_uniform_bind_group_layout(
    device: &wgpu::Device,
    label: &str,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(&format!("{} Bind Group Layout", label)),
        entries: &[uniform_layout_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
    })
}

/// Bind group for a single uniform buffer
pub fn create_uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{} Bind Group", label)),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use mockup_core::Color;

    #[test]
    fn test_variant_indices_match_all() {
        for (i, variant) in PipelineVariant::ALL.iter().enumerate() {
            assert_eq!(variant.index(), i);
        }
    }

    #[test]
    fn test_opaque_box() {
        let variant =
            PipelineVariant::for_material(&Material::phong(Color::WHITE), &Transform::default());
        assert_eq!(variant, PipelineVariant::new(BlendMode::Opaque, false));
        assert_eq!(variant.front_face(), wgpu::FrontFace::Ccw);
        assert!(variant.depth_write());
    }

    #[test]
    fn test_mirrored_translucent_reflection() {
        let transform = Transform {
            scale: Vec3::new(1.0, -1.0, 1.0),
            ..Transform::default()
        };
        let material = Material::phong(Color::WHITE).with_opacity(0.3);
        let variant = PipelineVariant::for_material(&material, &transform);

        assert_eq!(variant, PipelineVariant::new(BlendMode::Transparent, true));
        assert_eq!(variant.front_face(), wgpu::FrontFace::Cw);
        assert_eq!(variant.blend_state(), wgpu::BlendState::ALPHA_BLENDING);
        assert!(!variant.depth_write());
    }
}
