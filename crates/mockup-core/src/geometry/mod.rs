//! CPU-side geometry buffers
//!
//! Geometry is plain vertex data plus optional material groups. Triangle
//! geometry is indexed; line geometry is a non-indexed list of segments.

mod box_geometry;
mod edges;

pub use box_geometry::box_geometry;
pub use edges::edges_geometry;

/// Primitive assembly for a geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Indexed triangle list
    Triangles,
    /// Non-indexed line list, two vertices per segment
    Lines,
}

/// A run of indices drawn with one material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryGroup {
    /// First index in the group
    pub start: u32,
    /// Number of indices in the group
    pub count: u32,
    /// Index into the owning mesh's material list
    pub material_index: usize,
}

/// Vertex attributes, indices and material groups
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    pub topology: Topology,
    pub positions: Vec<[f32; 3]>,
    /// Empty for line geometry
    pub normals: Vec<[f32; 3]>,
    /// Empty for line geometry
    pub uvs: Vec<[f32; 2]>,
    /// Empty for line geometry
    pub indices: Vec<u32>,
    pub groups: Vec<GeometryGroup>,
}

impl GeometryData {
    /// Create line geometry from segment endpoints
    pub fn lines(positions: Vec<[f32; 3]>) -> Self {
        Self {
            topology: Topology::Lines,
            positions,
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of elements to draw: indices for triangles, vertices for lines
    pub fn element_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => self.indices.len(),
            Topology::Lines => self.positions.len(),
        }
    }

    /// Number of material slots the groups reference
    pub fn material_slots(&self) -> usize {
        self.groups
            .iter()
            .map(|g| g.material_index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(mut min, mut max), p| {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
            (min, max)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_geometry_counts() {
        let geometry = GeometryData::lines(vec![[0.0; 3], [1.0, 0.0, 0.0]]);
        assert_eq!(geometry.topology, Topology::Lines);
        assert_eq!(geometry.element_count(), 2);
        assert_eq!(geometry.material_slots(), 0);
    }

    #[test]
    fn test_bounds() {
        let geometry = GeometryData::lines(vec![[-1.0, 2.0, 0.5], [3.0, -4.0, 0.0]]);
        assert_eq!(
            geometry.bounds(),
            Some(([-1.0, -4.0, 0.0], [3.0, 2.0, 0.5]))
        );
        assert_eq!(GeometryData::lines(Vec::new()).bounds(), None);
    }
}
