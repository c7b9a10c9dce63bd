//! Scene graph for the viewer
//!
//! The scene only holds handles; the vertex data, materials and textures
//! they refer to live in the [`ResourceRegistry`].

mod resources;

use std::fmt;

use glam::{Mat3, Mat4, Quat, Vec3};
use uuid::Uuid;

use crate::color::Color;
use crate::config::LightingConfig;

pub use resources::{ResourceCounts, ResourceError, ResourceEvent, ResourceRegistry, ResourceStats};

macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a fresh random id
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

resource_id!(
    /// Handle to registered geometry
    GeometryId
);
resource_id!(
    /// Handle to a registered material
    MaterialId
);
resource_id!(
    /// Handle to a registered texture
    TextureId
);
resource_id!(
    /// Handle to a mesh in the scene
    NodeId
);

/// Position, Euler rotation (XYZ order, radians) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn quaternion(&self) -> Quat {
        Quat::from_rotation_x(self.rotation.x)
            * Quat::from_rotation_y(self.rotation.y)
            * Quat::from_rotation_z(self.rotation.z)
    }

    /// Model matrix: translate * rotate * scale
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quaternion(), self.position)
    }

    /// Inverse-transpose of the model matrix's upper 3x3
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.matrix()).inverse().transpose()
    }

    /// True when the transform flips handedness, reversing triangle winding
    pub fn is_mirrored(&self) -> bool {
        self.scale.x * self.scale.y * self.scale.z < 0.0
    }
}

/// Scene light
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    /// Shines from `position` towards the origin
    Directional {
        position: Vec3,
        color: Color,
        intensity: f32,
    },
}

/// Line overlay attached to a mesh; shares its parent's transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineNode {
    pub geometry: GeometryId,
    pub material: MaterialId,
}

/// A mesh: geometry drawn with one material per geometry group
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub geometry: GeometryId,
    pub materials: Vec<MaterialId>,
    pub transform: Transform,
    pub edges: Option<LineNode>,
}

/// Background, lights and meshes
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    pub lights: Vec<Light>,
    meshes: Vec<(NodeId, MeshNode)>,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            lights: Vec::new(),
            meshes: Vec::new(),
        }
    }

    /// Create a scene lit by the configured light rig
    pub fn with_lighting(background: Color, lighting: &LightingConfig) -> Self {
        let mut scene = Self::new(background);
        scene.lights.push(Light::Ambient {
            color: lighting.ambient_color,
            intensity: lighting.ambient_intensity,
        });
        scene
            .lights
            .extend(lighting.directional.iter().map(|light| Light::Directional {
                position: Vec3::from(light.position),
                color: light.color,
                intensity: light.intensity,
            }));
        scene
    }

    pub fn add_mesh(&mut self, mesh: MeshNode) -> NodeId {
        let id = NodeId::new();
        self.meshes.push((id, mesh));
        id
    }

    /// Detach a mesh; its resources must be disposed by the caller
    pub fn remove_mesh(&mut self, id: NodeId) -> Option<MeshNode> {
        let index = self.meshes.iter().position(|(node, _)| *node == id)?;
        Some(self.meshes.remove(index).1)
    }

    pub fn mesh(&self, id: NodeId) -> Option<&MeshNode> {
        self.meshes
            .iter()
            .find(|(node, _)| *node == id)
            .map(|(_, mesh)| mesh)
    }

    pub fn mesh_mut(&mut self, id: NodeId) -> Option<&mut MeshNode> {
        self.meshes
            .iter_mut()
            .find(|(node, _)| *node == id)
            .map(|(_, mesh)| mesh)
    }

    /// Meshes in insertion order
    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &MeshNode)> {
        self.meshes.iter().map(|(id, mesh)| (*id, mesh))
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_matches_xyz_euler() {
        let transform = Transform {
            rotation: Vec3::new(0.2, 0.5, 0.0),
            ..Transform::default()
        };
        let expected = Mat4::from_rotation_x(0.2) * Mat4::from_rotation_y(0.5);
        let actual = transform.matrix();
        for (a, e) in actual.to_cols_array().iter().zip(expected.to_cols_array()) {
            assert_relative_eq!(*a, e, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_mirrored_transform() {
        let transform = Transform {
            position: Vec3::new(0.0, -3.01, 0.0),
            scale: Vec3::new(1.0, -1.0, 1.0),
            ..Transform::default()
        };
        assert!(transform.is_mirrored());
        assert!(!Transform::default().is_mirrored());
        let p = transform.matrix().transform_point3(Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(p.y, -4.01, epsilon = 1e-6);
    }

    #[test]
    fn test_normal_matrix_keeps_normals_perpendicular() {
        let transform = Transform {
            scale: Vec3::new(2.0, 1.0, 1.0),
            rotation: Vec3::new(0.3, 0.0, 0.0),
            ..Transform::default()
        };
        let tangent = transform.matrix().transform_vector3(Vec3::new(1.0, 1.0, 0.0));
        let normal = transform.normal_matrix() * Vec3::new(1.0, -1.0, 0.0);
        assert_relative_eq!(tangent.dot(normal), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_scene_lighting_from_config() {
        let scene = Scene::with_lighting(Color::WHITE, &LightingConfig::default());
        assert_eq!(scene.lights.len(), 3);
        assert!(matches!(scene.lights[0], Light::Ambient { intensity, .. } if intensity == 0.6));
        assert!(matches!(
            scene.lights[1],
            Light::Directional { position, intensity, .. }
                if position == Vec3::splat(5.0) && intensity == 0.8
        ));
    }

    #[test]
    fn test_add_and_remove_mesh() {
        let mut scene = Scene::new(Color::BLACK);
        let mesh = MeshNode {
            geometry: GeometryId::new(),
            materials: vec![MaterialId::new()],
            transform: Transform::default(),
            edges: None,
        };
        let id = scene.add_mesh(mesh.clone());
        assert_eq!(scene.mesh(id), Some(&mesh));
        scene.mesh_mut(id).unwrap().transform.rotation.y = 1.0;
        let removed = scene.remove_mesh(id).unwrap();
        assert_eq!(removed.transform.rotation.y, 1.0);
        assert!(scene.is_empty());
        assert_eq!(scene.remove_mesh(id), None);
    }
}
