//! GPU mirrors of registry resources.
//!
//! The cache follows the registry's lifecycle events: a `Created` event
//! uploads the resource, a `Disposed` event destroys the GPU objects. Node
//! transforms are refreshed every frame and nodes that left the scene are
//! dropped.

use std::collections::HashMap;

use mockup_core::scene::{
    GeometryId, MaterialId, NodeId, ResourceEvent, ResourceRegistry, Scene, TextureId,
};
use mockup_core::{GeometryData, Topology};
use wgpu::util::DeviceExt;

use crate::pipeline::create_uniform_bind_group;
use crate::sub_renderers::{MaterialUniform, MeshRenderer, ModelUniform};
use crate::vertex::{line_vertices, mesh_vertices};

use super::gpu_resources;

/// Vertex and index buffers for one geometry.
pub struct GpuGeometry {
    /// Vertex buffer.
    pub vertex_buffer: wgpu::Buffer,
    /// Index buffer, for triangle geometry.
    pub index_buffer: Option<wgpu::Buffer>,
}

impl GpuGeometry {
    fn new(device: &wgpu::Device, geometry: &GeometryData) -> Self {
        let vertex_buffer = match geometry.topology {
            Topology::Triangles => device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh_vertices(geometry)),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            Topology::Lines => device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Line Vertex Buffer"),
                contents: bytemuck::cast_slice(&line_vertices(geometry)),
                usage: wgpu::BufferUsages::VERTEX,
            }),
        };
        let index_buffer = (geometry.topology == Topology::Triangles).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        Self {
            vertex_buffer,
            index_buffer,
        }
    }

    fn destroy(&self) {
        self.vertex_buffer.destroy();
        if let Some(buffer) = &self.index_buffer {
            buffer.destroy();
        }
    }
}

/// Uploaded color map.
pub struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Material uniform and bind group.
pub struct GpuMaterial {
    buffer: wgpu::Buffer,
    /// Bind group for group 2.
    pub bind_group: wgpu::BindGroup,
}

/// Model uniform and bind group for a scene node.
pub struct GpuNode {
    uniform: ModelUniform,
    buffer: wgpu::Buffer,
    /// Bind group for group 1.
    pub bind_group: wgpu::BindGroup,
}

/// Number of live GPU resources per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GpuResourceCounts {
    /// Geometries with buffers.
    pub geometries: usize,
    /// Materials with bind groups.
    pub materials: usize,
    /// Uploaded textures.
    pub textures: usize,
    /// Scene nodes with model buffers.
    pub nodes: usize,
}

/// Manages GPU resources keyed by the registry's ids.
pub struct ResourceCache {
    geometries: HashMap<GeometryId, GpuGeometry>,
    materials: HashMap<MaterialId, GpuMaterial>,
    textures: HashMap<TextureId, GpuTexture>,
    nodes: HashMap<NodeId, GpuNode>,
    /// Bound by materials without a color map.
    fallback: GpuTexture,
    sampler: wgpu::Sampler,
}

impl ResourceCache {
    /// Create an empty cache.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let (texture, view) = gpu_resources::create_fallback_texture(device, queue);
        Self {
            geometries: HashMap::new(),
            materials: HashMap::new(),
            textures: HashMap::new(),
            nodes: HashMap::new(),
            fallback: GpuTexture { texture, view },
            sampler: gpu_resources::create_color_sampler(device),
        }
    }

    /// Apply lifecycle events in order.
    ///
    /// A `Created` event whose resource is already gone from the registry
    /// (created and disposed between frames) is skipped; `Disposed` events
    /// for resources never uploaded are ignored.
    pub fn apply_events(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        mesh_renderer: &MeshRenderer,
        registry: &ResourceRegistry,
        events: &[ResourceEvent],
    ) {
        for event in events {
            match *event {
                ResourceEvent::GeometryCreated(id) => {
                    if let Some(geometry) = registry.geometry(id) {
                        self.geometries.insert(id, GpuGeometry::new(device, geometry));
                    }
                }
                ResourceEvent::GeometryDisposed(id) => {
                    if let Some(geometry) = self.geometries.remove(&id) {
                        geometry.destroy();
                    }
                }
                ResourceEvent::TextureCreated(id) => {
                    if let Some(image) = registry.texture(id) {
                        // Oversized photos are scaled down to what the device can hold
                        let max_dimension = device.limits().max_texture_dimension_2d;
                        match image.fit_within(max_dimension) {
                            Ok(image) => {
                                let (texture, view) = gpu_resources::create_image_texture(
                                    device,
                                    queue,
                                    &image,
                                    "Color Map",
                                );
                                self.textures.insert(id, GpuTexture { texture, view });
                            }
                            Err(e) => {
                                tracing::warn!(texture = %id, error = %e, "Skipping texture upload");
                            }
                        }
                    }
                }
                ResourceEvent::TextureDisposed(id) => {
                    if let Some(texture) = self.textures.remove(&id) {
                        texture.texture.destroy();
                    }
                }
                ResourceEvent::MaterialCreated(id) => {
                    if let Some(material) = registry.material(id) {
                        let view = material
                            .map
                            .and_then(|texture| self.textures.get(&texture))
                            .map_or(&self.fallback.view, |texture| &texture.view);
                        let uniform = MaterialUniform::from_material(material);
                        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some("Material Buffer"),
                            contents: bytemuck::cast_slice(&[uniform]),
                            usage: wgpu::BufferUsages::UNIFORM,
                        });
                        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                            label: Some("Material Bind Group"),
                            layout: mesh_renderer.material_bind_group_layout(),
                            entries: &[
                                wgpu::BindGroupEntry {
                                    binding: 0,
                                    resource: buffer.as_entire_binding(),
                                },
                                wgpu::BindGroupEntry {
                                    binding: 1,
                                    resource: wgpu::BindingResource::TextureView(view),
                                },
                                wgpu::BindGroupEntry {
                                    binding: 2,
                                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                                },
                            ],
                        });
                        self.materials.insert(id, GpuMaterial { buffer, bind_group });
                    }
                }
                ResourceEvent::MaterialDisposed(id) => {
                    if let Some(material) = self.materials.remove(&id) {
                        material.buffer.destroy();
                    }
                }
            }
        }
    }

    /// Refresh node transforms and drop nodes no longer in the scene.
    pub fn sync_nodes(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        mesh_renderer: &MeshRenderer,
        scene: &Scene,
    ) {
        self.nodes.retain(|id, node| {
            let keep = scene.mesh(*id).is_some();
            if !keep {
                node.buffer.destroy();
            }
            keep
        });

        for (id, mesh) in scene.meshes() {
            let uniform = ModelUniform::from_transform(&mesh.transform);
            match self.nodes.get_mut(&id) {
                Some(node) => {
                    if node.uniform != uniform {
                        node.uniform = uniform;
                        queue.write_buffer(&node.buffer, 0, bytemuck::cast_slice(&[uniform]));
                    }
                }
                None => {
                    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Model Buffer"),
                        contents: bytemuck::cast_slice(&[uniform]),
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    });
                    let bind_group = create_uniform_bind_group(
                        device,
                        mesh_renderer.model_bind_group_layout(),
                        &buffer,
                        "Model",
                    );
                    self.nodes.insert(
                        id,
                        GpuNode {
                            uniform,
                            buffer,
                            bind_group,
                        },
                    );
                }
            }
        }
    }

    /// Get a geometry's buffers.
    pub fn geometry(&self, id: GeometryId) -> Option<&GpuGeometry> {
        self.geometries.get(&id)
    }

    /// Get a material's GPU state.
    pub fn material(&self, id: MaterialId) -> Option<&GpuMaterial> {
        self.materials.get(&id)
    }

    /// Get a node's GPU state.
    pub fn node(&self, id: NodeId) -> Option<&GpuNode> {
        self.nodes.get(&id)
    }

    /// Count live GPU resources.
    pub fn counts(&self) -> GpuResourceCounts {
        GpuResourceCounts {
            geometries: self.geometries.len(),
            materials: self.materials.len(),
            textures: self.textures.len(),
            nodes: self.nodes.len(),
        }
    }

    /// Destroy every cached GPU object.
    pub fn clear(&mut self) {
        for (_, geometry) in self.geometries.drain() {
            geometry.destroy();
        }
        for (_, material) in self.materials.drain() {
            material.buffer.destroy();
        }
        for (_, texture) in self.textures.drain() {
            texture.texture.destroy();
        }
        for (_, node) in self.nodes.drain() {
            node.buffer.destroy();
        }
        tracing::debug!("Resource cache cleared");
    }
}

impl Drop for ResourceCache {
    fn drop(&mut self) {
        self.clear();
        self.fallback.texture.destroy();
    }
}
