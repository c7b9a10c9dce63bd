//! Lit mesh renderer with per-group materials

use bytemuck::{Pod, Zeroable};
use mockup_core::scene::Transform;
use mockup_core::{Color, Material};

use crate::constants::material::{SHININESS, SPECULAR};
use crate::pipeline::{
    PipelineConfig, PipelineVariant, create_uniform_bind_group_layout, uniform_layout_entry,
};
use crate::vertex::MeshVertex;

/// Per-node transform uniform
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ModelUniform {
    /// Model transformation matrix.
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model matrix, padded to 4x4.
    pub normal: [[f32; 4]; 4],
}

impl ModelUniform {
    /// Build from a node transform
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            model: transform.matrix().to_cols_array_2d(),
            normal: glam::Mat4::from_mat3(transform.normal_matrix()).to_cols_array_2d(),
        }
    }
}

/// Per-material uniform
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    /// Linear base color; alpha is the opacity.
    pub color: [f32; 4],
    /// Linear specular color; w is the shininess.
    pub specular_shininess: [f32; 4],
}

impl MaterialUniform {
    /// Build from a material
    pub fn from_material(material: &Material) -> Self {
        let [r, g, b] = material.color.to_linear();
        let [sr, sg, sb] = Color::from_hex(SPECULAR).to_linear();
        Self {
            color: [r, g, b, material.opacity],
            specular_shininess: [sr, sg, sb, SHININESS],
        }
    }
}

/// Mesh renderer owning one pipeline per [`PipelineVariant`]
pub struct MeshRenderer {
    pipelines: Vec<wgpu::RenderPipeline>,
    model_bind_group_layout: wgpu::BindGroupLayout,
    material_bind_group_layout: wgpu::BindGroupLayout,
    light_bind_group_layout: wgpu::BindGroupLayout,
}

impl MeshRenderer {
    /// Creates the mesh pipelines.
    pub fn new(
        device: &wgpu::Device,
        config: &PipelineConfig,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/mesh.wgsl").into()),
        });

        let model_bind_group_layout = create_uniform_bind_group_layout(device, "Model");

        // Material uniform + color map + sampler (group 2)
        let material_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Material Bind Group Layout"),
                entries: &[
                    uniform_layout_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let light_bind_group_layout = create_uniform_bind_group_layout(device, "Light");

        // 4 bind groups: camera, model, material, light
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[
                camera_bind_group_layout,
                &model_bind_group_layout,
                &material_bind_group_layout,
                &light_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });

        let pipelines = PipelineVariant::ALL
            .iter()
            .map(|variant| {
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(variant.label()),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        buffers: &[MeshVertex::layout()],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: Some("fs_main"),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: config.format,
                            blend: Some(variant.blend_state()),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        front_face: variant.front_face(),
                        cull_mode: Some(wgpu::Face::Back),
                        ..Default::default()
                    },
                    depth_stencil: Some(wgpu::DepthStencilState {
                        format: config.depth_format,
                        depth_write_enabled: variant.depth_write(),
                        depth_compare: wgpu::CompareFunction::Less,
                        stencil: wgpu::StencilState::default(),
                        bias: wgpu::DepthBiasState::default(),
                    }),
                    multisample: config.multisample(),
                    multiview: None,
                    cache: None,
                })
            })
            .collect();

        Self {
            pipelines,
            model_bind_group_layout,
            material_bind_group_layout,
            light_bind_group_layout,
        }
    }

    /// Get the model bind group layout
    pub fn model_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.model_bind_group_layout
    }

    /// Get the material bind group layout
    pub fn material_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.material_bind_group_layout
    }

    /// Get the light bind group layout
    pub fn light_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.light_bind_group_layout
    }

    /// Pipeline for a variant
    pub fn pipeline(&self, variant: PipelineVariant) -> &wgpu::RenderPipeline {
        &self.pipelines[variant.index()]
    }

    /// Draw one material group of a mesh
    ///
    /// The camera (group 0) and light (group 3) bind groups must already be
    /// set on the pass.
    #[allow(clippy::too_many_arguments)]
    pub fn render<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        variant: PipelineVariant,
        vertex_buffer: &'a wgpu::Buffer,
        index_buffer: &'a wgpu::Buffer,
        indices: std::ops::Range<u32>,
        model_bind_group: &'a wgpu::BindGroup,
        material_bind_group: &'a wgpu::BindGroup,
    ) {
        render_pass.set_pipeline(self.pipeline(variant));
        render_pass.set_bind_group(1, model_bind_group, &[]);
        render_pass.set_bind_group(2, material_bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(indices, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::{Mat4, Vec3, Vec4};

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(std::mem::size_of::<ModelUniform>(), 128);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 32);
    }

    #[test]
    fn test_material_uniform() {
        let material = Material::phong(Color::from_hex(0xff0000)).with_opacity(0.3);
        let uniform = MaterialUniform::from_material(&material);
        assert_eq!(uniform.color, [1.0, 0.0, 0.0, 0.3]);
        assert_relative_eq!(uniform.specular_shininess[3], 30.0);
        assert!(uniform.specular_shininess[0] < 0.01);
    }

    #[test]
    fn test_mirrored_normal_matrix_flips_y() {
        let transform = Transform {
            scale: Vec3::new(1.0, -1.0, 1.0),
            ..Transform::default()
        };
        let uniform = ModelUniform::from_transform(&transform);
        let normal = Mat4::from_cols_array_2d(&uniform.normal) * Vec4::new(0.0, 1.0, 0.0, 0.0);
        assert_relative_eq!(normal.y, -1.0);
        assert_relative_eq!(normal.w, 0.0);
    }
}
