//! Box (rectangular prism) geometry generation

use super::{GeometryData, GeometryGroup, Topology};
use crate::face::FaceSlot;
use crate::options::Dimensions;

/// Plane layout: which axes the plane spans and which way they run
struct PlaneSpec {
    /// Axis indices for the plane's u, v and normal directions
    axes: [usize; 3],
    u_dir: f32,
    v_dir: f32,
    /// Extent along u and v
    size: [f32; 2],
    /// Signed extent along the normal axis
    depth: f32,
}

/// Generate a box centered at the origin
///
/// Width runs along X, height along Y and depth along Z. The result has 24
/// vertices (4 per face so each face gets its own normals and UVs), 36
/// indices, and one group per face in [`FaceSlot::ALL`] order.
pub fn box_geometry(dimensions: Dimensions) -> GeometryData {
    let Dimensions {
        width,
        height,
        depth,
    } = dimensions;
    const X: usize = 0;
    const Y: usize = 1;
    const Z: usize = 2;

    let planes = FaceSlot::ALL.map(|slot| match slot {
        FaceSlot::Right => PlaneSpec {
            axes: [Z, Y, X],
            u_dir: -1.0,
            v_dir: -1.0,
            size: [depth, height],
            depth: width,
        },
        FaceSlot::Left => PlaneSpec {
            axes: [Z, Y, X],
            u_dir: 1.0,
            v_dir: -1.0,
            size: [depth, height],
            depth: -width,
        },
        FaceSlot::Top => PlaneSpec {
            axes: [X, Z, Y],
            u_dir: 1.0,
            v_dir: 1.0,
            size: [width, depth],
            depth: height,
        },
        FaceSlot::Bottom => PlaneSpec {
            axes: [X, Z, Y],
            u_dir: 1.0,
            v_dir: -1.0,
            size: [width, depth],
            depth: -height,
        },
        FaceSlot::Front => PlaneSpec {
            axes: [X, Y, Z],
            u_dir: 1.0,
            v_dir: -1.0,
            size: [width, height],
            depth,
        },
        FaceSlot::Back => PlaneSpec {
            axes: [X, Y, Z],
            u_dir: -1.0,
            v_dir: -1.0,
            size: [width, height],
            depth: -depth,
        },
    });

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut uvs = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    let mut groups = Vec::with_capacity(6);

    for (slot, plane) in FaceSlot::ALL.iter().zip(planes.iter()) {
        let base = positions.len() as u32;
        let [u, v, w] = plane.axes;
        let half_u = plane.size[0] / 2.0;
        let half_v = plane.size[1] / 2.0;
        let half_w = plane.depth / 2.0;

        // Row-major corners: (0,0), (1,0), (0,1), (1,1)
        for iy in 0..2 {
            for ix in 0..2 {
                let mut position = [0.0; 3];
                position[u] = (ix as f32 * plane.size[0] - half_u) * plane.u_dir;
                position[v] = (iy as f32 * plane.size[1] - half_v) * plane.v_dir;
                position[w] = half_w;

                let mut normal = [0.0; 3];
                normal[w] = if plane.depth > 0.0 { 1.0 } else { -1.0 };

                positions.push(position);
                normals.push(normal);
                uvs.push([ix as f32, 1.0 - iy as f32]);
            }
        }

        let (a, b, c, d) = (base, base + 2, base + 3, base + 1);
        let start = indices.len() as u32;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
        groups.push(GeometryGroup {
            start,
            count: 6,
            material_index: slot.material_index(),
        });
    }

    GeometryData {
        topology: Topology::Triangles,
        positions,
        normals,
        uvs,
        indices,
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn dims(width: f32, height: f32, depth: f32) -> Dimensions {
        Dimensions {
            width,
            height,
            depth,
        }
    }

    #[test]
    fn test_box_counts() {
        let geometry = box_geometry(dims(2.0, 3.0, 1.0));
        assert_eq!(geometry.vertex_count(), 24);
        assert_eq!(geometry.indices.len(), 36);
        assert_eq!(geometry.uvs.len(), 24);
        assert_eq!(geometry.groups.len(), 6);
        assert_eq!(geometry.material_slots(), 6);
        for (i, group) in geometry.groups.iter().enumerate() {
            assert_eq!(group.start, i as u32 * 6);
            assert_eq!(group.count, 6);
            assert_eq!(group.material_index, i);
        }
    }

    #[test]
    fn test_box_bounds() {
        let geometry = box_geometry(dims(2.0, 3.0, 1.0));
        let (min, max) = geometry.bounds().unwrap();
        assert_eq!(min, [-1.0, -1.5, -0.5]);
        assert_eq!(max, [1.0, 1.5, 0.5]);
    }

    #[test]
    fn test_face_normals_point_outward() {
        let geometry = box_geometry(dims(2.0, 3.0, 1.0));
        let expected = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        for (face, normal) in expected.iter().enumerate() {
            for vertex in face * 4..face * 4 + 4 {
                assert_eq!(&geometry.normals[vertex], normal);
            }
        }
    }

    #[test]
    fn test_triangles_wind_counter_clockwise() {
        let geometry = box_geometry(dims(2.0, 3.0, 1.0));
        for tri in geometry.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(geometry.positions[i as usize]));
            let face_normal = (b - a).cross(c - a).normalize();
            let vertex_normal = Vec3::from(geometry.normals[tri[0] as usize]);
            assert!(face_normal.dot(vertex_normal) > 0.99);
        }
    }

    #[test]
    fn test_front_face_uvs_are_upright() {
        let geometry = box_geometry(dims(2.0, 2.0, 2.0));
        // Front face starts at vertex 16; its first corner is top-left
        let front = 16;
        assert_eq!(geometry.positions[front], [-1.0, 1.0, 1.0]);
        assert_eq!(geometry.uvs[front], [0.0, 1.0]);
        assert_eq!(geometry.positions[front + 3], [1.0, -1.0, 1.0]);
        assert_eq!(geometry.uvs[front + 3], [1.0, 0.0]);
    }
}
