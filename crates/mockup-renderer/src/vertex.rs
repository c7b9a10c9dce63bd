//! Vertex formats
//!
//! Attribute offsets come from `std::mem::offset_of!` via [`vertex_attr!`],
//! so they stay correct if a struct's fields move.

use bytemuck::{Pod, Zeroable};
use mockup_core::GeometryData;

/// Creates a vertex attribute with the offset calculated from the struct field.
///
/// # Example
///
/// ```ignore
/// const ATTRIBUTES: &[wgpu::VertexAttribute] = &[
///     vertex_attr!(MeshVertex, position, 0, Float32x3),
///     vertex_attr!(MeshVertex, uv, 2, Float32x2),
/// ];
/// ```
#[macro_export]
macro_rules! vertex_attr {
    ($struct:ty, $field:ident, $location:expr, $format:ident) => {
        wgpu::VertexAttribute {
            offset: std::mem::offset_of!($struct, $field) as u64,
            shader_location: $location,
            format: wgpu::VertexFormat::$format,
        }
    };
}

/// Creates a per-vertex buffer layout with `T`'s size as the stride.
pub fn vertex_buffer_layout<T>(attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'_> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<T>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

/// Lit, textured vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Vertex position in local space.
    pub position: [f32; 3],
    /// Vertex normal vector.
    pub normal: [f32; 3],
    /// Texture coordinate, v pointing up.
    pub uv: [f32; 2],
}

impl MeshVertex {
    /// Vertex attribute descriptors for the shader.
    pub const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &[
        vertex_attr!(MeshVertex, position, 0, Float32x3),
        vertex_attr!(MeshVertex, normal, 1, Float32x3),
        vertex_attr!(MeshVertex, uv, 2, Float32x2),
    ];

    /// Returns the vertex buffer layout for this vertex type.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        vertex_buffer_layout::<Self>(Self::ATTRIBUTES)
    }
}

/// Line overlay vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    /// Vertex position in local space.
    pub position: [f32; 3],
}

impl LineVertex {
    /// Vertex attribute descriptors for the shader.
    pub const ATTRIBUTES: &'static [wgpu::VertexAttribute] =
        &[vertex_attr!(LineVertex, position, 0, Float32x3)];

    /// Returns the vertex buffer layout for this vertex type.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        vertex_buffer_layout::<Self>(Self::ATTRIBUTES)
    }
}

/// Interleave triangle geometry into mesh vertices
///
/// Missing normals default to +Z and missing UVs to the origin.
pub fn mesh_vertices(geometry: &GeometryData) -> Vec<MeshVertex> {
    geometry
        .positions
        .iter()
        .enumerate()
        .map(|(i, &position)| MeshVertex {
            position,
            normal: geometry.normals.get(i).copied().unwrap_or([0.0, 0.0, 1.0]),
            uv: geometry.uvs.get(i).copied().unwrap_or([0.0, 0.0]),
        })
        .collect()
}

/// Line geometry as line vertices
pub fn line_vertices(geometry: &GeometryData) -> Vec<LineVertex> {
    geometry
        .positions
        .iter()
        .map(|&position| LineVertex { position })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockup_core::Dimensions;
    use mockup_core::geometry::box_geometry;

    #[test]
    fn test_mesh_vertex_layout() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
        let offsets: Vec<u64> = MeshVertex::ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
        assert_eq!(MeshVertex::layout().array_stride, 32);
    }

    #[test]
    fn test_line_vertex_layout() {
        assert_eq!(LineVertex::layout().array_stride, 12);
        assert_eq!(LineVertex::ATTRIBUTES.len(), 1);
    }

    #[test]
    fn test_box_vertices_interleave() {
        let geometry = box_geometry(Dimensions {
            width: 2.0,
            height: 2.0,
            depth: 2.0,
        });
        let vertices = mesh_vertices(&geometry);
        assert_eq!(vertices.len(), 24);
        for (i, vertex) in vertices.iter().enumerate() {
            assert_eq!(vertex.position, geometry.positions[i]);
            assert_eq!(vertex.normal, geometry.normals[i]);
            assert_eq!(vertex.uv, geometry.uvs[i]);
        }
    }

    #[test]
    fn test_missing_attributes_use_defaults() {
        let geometry = GeometryData::lines(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let vertices = mesh_vertices(&geometry);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[1].uv, [0.0, 0.0]);
        assert_eq!(line_vertices(&geometry)[1].position, [4.0, 5.0, 6.0]);
    }
}
