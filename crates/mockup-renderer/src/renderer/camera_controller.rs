//! Camera uniform management.

use mockup_core::PerspectiveCamera;
use wgpu::util::DeviceExt;

use crate::camera::CameraUniform;
use crate::pipeline::{create_uniform_bind_group, create_uniform_bind_group_layout};

/// Owns the camera uniform buffer and its bind group (group 0).
pub struct CameraController {
    uniform: CameraUniform,
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl CameraController {
    /// Create the camera buffer with an identity view.
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform = CameraUniform {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            eye: [0.0, 0.0, 0.0, 1.0],
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = create_uniform_bind_group_layout(device, "Camera");
        let bind_group = create_uniform_bind_group(device, &bind_group_layout, &buffer, "Camera");

        Self {
            uniform,
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    /// Copy the camera's matrices into the uniform buffer.
    pub fn update(&mut self, queue: &wgpu::Queue, camera: &PerspectiveCamera) {
        self.uniform = CameraUniform::from_camera(camera);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }

    /// Get the last uploaded uniform.
    pub fn uniform(&self) -> &CameraUniform {
        &self.uniform
    }

    /// Get the camera bind group layout.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Get the camera bind group.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
