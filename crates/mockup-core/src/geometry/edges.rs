//! Feature-edge extraction for line overlays

use std::collections::HashMap;

use glam::Vec3;

use super::{GeometryData, Topology};

type VertexKey = [i64; 3];

struct EdgeEntry {
    start: Vec3,
    end: Vec3,
    normal: Vec3,
    /// Cleared once the matching half-edge has been seen
    open: bool,
}

/// Extract the edges of a triangle mesh worth outlining
///
/// An edge is emitted when the two triangles sharing it have normals more
/// than `threshold_degrees` apart, or when only one triangle uses it.
/// Vertices are matched by position rounded to `precision_points` decimals,
/// so faces that do not share indices still share edges.
pub fn edges_geometry(
    geometry: &GeometryData,
    threshold_degrees: f32,
    precision_points: i32,
) -> GeometryData {
    if geometry.topology != Topology::Triangles {
        return GeometryData::lines(Vec::new());
    }

    let precision = 10f32.powi(precision_points);
    let threshold_dot = threshold_degrees.to_radians().cos();
    let key = |v: Vec3| -> VertexKey {
        [
            (v.x * precision).round() as i64,
            (v.y * precision).round() as i64,
            (v.z * precision).round() as i64,
        ]
    };

    let mut lines = Vec::new();
    let mut entries: Vec<EdgeEntry> = Vec::new();
    let mut lookup: HashMap<(VertexKey, VertexKey), usize> = HashMap::new();

    for tri in geometry.indices.chunks_exact(3) {
        let corners = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(geometry.positions[i as usize]));
        let keys = corners.map(key);
        if keys[0] == keys[1] || keys[1] == keys[2] || keys[2] == keys[0] {
            continue;
        }
        let normal = (corners[1] - corners[0])
            .cross(corners[2] - corners[0])
            .normalize_or_zero();

        for j in 0..3 {
            let next = (j + 1) % 3;
            let forward = (keys[j], keys[next]);
            let reverse = (keys[next], keys[j]);

            if let Some(&index) = lookup.get(&reverse) {
                let entry = &mut entries[index];
                if entry.open {
                    if normal.dot(entry.normal) <= threshold_dot {
                        lines.push(entry.start.to_array());
                        lines.push(entry.end.to_array());
                    }
                    entry.open = false;
                    continue;
                }
            }
            if !lookup.contains_key(&forward) {
                lookup.insert(forward, entries.len());
                entries.push(EdgeEntry {
                    start: corners[j],
                    end: corners[next],
                    normal,
                    open: true,
                });
            }
        }
    }

    // Unmatched half-edges lie on the mesh boundary
    for entry in entries.iter().filter(|e| e.open) {
        lines.push(entry.start.to_array());
        lines.push(entry.end.to_array());
    }

    GeometryData::lines(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::box_geometry;
    use crate::options::Dimensions;

    #[test]
    fn test_box_has_twelve_edges() {
        let geometry = box_geometry(Dimensions {
            width: 2.0,
            height: 3.0,
            depth: 1.0,
        });
        let edges = edges_geometry(&geometry, 1.0, 4);
        assert_eq!(edges.topology, Topology::Lines);
        assert_eq!(edges.vertex_count(), 24);
    }

    #[test]
    fn test_box_edges_lie_on_corners() {
        let geometry = box_geometry(Dimensions {
            width: 2.0,
            height: 2.0,
            depth: 2.0,
        });
        let edges = edges_geometry(&geometry, 1.0, 4);
        for p in &edges.positions {
            // Every edge vertex is a cube corner
            assert!(p.iter().all(|c| c.abs() == 1.0));
        }
    }

    #[test]
    fn test_single_triangle_is_all_boundary() {
        let geometry = GeometryData {
            topology: Topology::Triangles,
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            uvs: vec![[0.0, 0.0]; 3],
            indices: vec![0, 1, 2],
            groups: Vec::new(),
        };
        let edges = edges_geometry(&geometry, 1.0, 4);
        assert_eq!(edges.vertex_count(), 6);
    }

    #[test]
    fn test_flat_quad_hides_diagonal() {
        let geometry = GeometryData {
            topology: Topology::Triangles,
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            normals: vec![[0.0, 0.0, 1.0]; 4],
            uvs: vec![[0.0, 0.0]; 4],
            indices: vec![0, 1, 2, 0, 2, 3],
            groups: Vec::new(),
        };
        let edges = edges_geometry(&geometry, 1.0, 4);
        // Four outline edges, no diagonal
        assert_eq!(edges.vertex_count(), 8);
    }

    #[test]
    fn test_line_input_yields_nothing() {
        let lines = GeometryData::lines(vec![[0.0; 3], [1.0; 3]]);
        assert_eq!(edges_geometry(&lines, 1.0, 4).vertex_count(), 0);
    }
}
