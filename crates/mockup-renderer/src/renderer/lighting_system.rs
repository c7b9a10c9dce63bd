//! Lighting system for the renderer.

use mockup_core::scene::Light;
use wgpu::util::DeviceExt;

use crate::light::LightUniform;
use crate::pipeline::create_uniform_bind_group;
use crate::sub_renderers::MeshRenderer;

/// Manages the light uniform buffer (group 3).
pub struct LightingSystem {
    /// CPU copy of the light uniform.
    uniform: LightUniform,
    /// GPU buffer for light uniforms.
    light_buffer: wgpu::Buffer,
    /// Bind group for the mesh pass.
    light_bind_group: wgpu::BindGroup,
}

impl LightingSystem {
    /// Create a new lighting system with no lights.
    pub fn new(device: &wgpu::Device, mesh_renderer: &MeshRenderer) -> Self {
        let uniform = LightUniform::default();
        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let light_bind_group = create_uniform_bind_group(
            device,
            mesh_renderer.light_bind_group_layout(),
            &light_buffer,
            "Light",
        );

        Self {
            uniform,
            light_buffer,
            light_bind_group,
        }
    }

    /// Replace the light set.
    pub fn set_lights(&mut self, lights: &[Light]) {
        self.uniform = LightUniform::from_lights(lights);
    }

    /// Get the current uniform.
    pub fn uniform(&self) -> &LightUniform {
        &self.uniform
    }

    /// Get the light bind group.
    pub fn light_bind_group(&self) -> &wgpu::BindGroup {
        &self.light_bind_group
    }

    /// Upload the light uniform.
    pub fn update(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.light_buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
