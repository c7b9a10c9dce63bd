//! Mesh assembly for the box and its reflection

use glam::Vec3;

use crate::config::ViewerConfig;
use crate::constants::EDGE_PRECISION_POINTS;
use crate::face::{FaceSet, FaceSlot};
use crate::geometry::{box_geometry, edges_geometry};
use crate::material::Material;
use crate::options::{Dimensions, Rotation};
use crate::scene::{
    LineNode, MaterialId, MeshNode, NodeId, ResourceError, ResourceRegistry, Scene, TextureId,
    Transform,
};

pub(crate) fn box_transform(rotation: Rotation) -> Transform {
    Transform {
        rotation: Vec3::new(rotation.x, rotation.y, 0.0),
        ..Transform::default()
    }
}

/// Mirror image below the box: flipped in Y with pitch negated
pub(crate) fn reflection_transform(dimensions: Dimensions, rotation: Rotation, gap: f32) -> Transform {
    Transform {
        position: Vec3::new(0.0, -dimensions.height - gap, 0.0),
        rotation: Vec3::new(-rotation.x, rotation.y, 0.0),
        scale: Vec3::new(1.0, -1.0, 1.0),
    }
}

/// Build the box mesh with per-face materials and its edge overlay
pub(crate) fn build_box(
    resources: &mut ResourceRegistry,
    config: &ViewerConfig,
    dimensions: Dimensions,
    textures: &FaceSet<Option<TextureId>>,
    rotation: Rotation,
) -> Result<MeshNode, ResourceError> {
    let geometry_data = box_geometry(dimensions);
    let edge_data = edges_geometry(
        &geometry_data,
        config.render.edge_threshold_degrees,
        EDGE_PRECISION_POINTS,
    );

    let materials = face_materials(resources, config, textures, None)?;
    let geometry = resources.add_geometry(geometry_data);
    let edges = LineNode {
        geometry: resources.add_geometry(edge_data),
        material: resources.add_material(Material::line(config.palette.edge))?,
    };

    Ok(MeshNode {
        geometry,
        materials,
        transform: box_transform(rotation),
        edges: Some(edges),
    })
}

/// Build the semi-transparent mirrored copy, reusing the loaded textures
pub(crate) fn build_reflection(
    resources: &mut ResourceRegistry,
    config: &ViewerConfig,
    dimensions: Dimensions,
    textures: &FaceSet<Option<TextureId>>,
    rotation: Rotation,
) -> Result<MeshNode, ResourceError> {
    let materials = face_materials(resources, config, textures, Some(config.reflection.opacity))?;
    let geometry = resources.add_geometry(box_geometry(dimensions));

    Ok(MeshNode {
        geometry,
        materials,
        transform: reflection_transform(dimensions, rotation, config.reflection.gap),
        edges: None,
    })
}

fn face_materials(
    resources: &mut ResourceRegistry,
    config: &ViewerConfig,
    textures: &FaceSet<Option<TextureId>>,
    opacity: Option<f32>,
) -> Result<Vec<MaterialId>, ResourceError> {
    FaceSlot::ALL
        .iter()
        .map(|slot| {
            let group = slot.group();
            let material = match textures.get(group) {
                Some(texture) => Material::textured(*texture),
                None => Material::phong(config.palette.face_color(group)),
            };
            let material = match opacity {
                Some(opacity) => material.with_opacity(opacity),
                None => material,
            };
            resources.add_material(material)
        })
        .collect()
}

/// Detach a mesh from the scene and dispose everything it owns
pub(crate) fn dispose_node(
    scene: &mut Scene,
    resources: &mut ResourceRegistry,
    node: Option<NodeId>,
) -> Result<(), ResourceError> {
    if let Some(mesh) = node.and_then(|id| scene.remove_mesh(id)) {
        resources.dispose_mesh(mesh)?;
    }
    Ok(())
}

/// Give up the texture cache's references
pub(crate) fn release_textures(
    resources: &mut ResourceRegistry,
    textures: &mut FaceSet<Option<TextureId>>,
) -> Result<(), ResourceError> {
    for texture in [&mut textures.front, &mut textures.side, &mut textures.top] {
        if let Some(id) = texture.take() {
            resources.release_texture(id)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureImage;
    use approx::assert_relative_eq;

    const DIMS: Dimensions = Dimensions {
        width: 2.0,
        height: 3.0,
        depth: 1.0,
    };

    #[test]
    fn test_reflection_transform() {
        let transform = reflection_transform(DIMS, Rotation { x: 0.2, y: 0.5 }, 0.01);
        assert_relative_eq!(transform.position.y, -3.01);
        assert_eq!(transform.scale, Vec3::new(1.0, -1.0, 1.0));
        assert_eq!(transform.rotation, Vec3::new(-0.2, 0.5, 0.0));
    }

    #[test]
    fn test_box_uses_palette_without_textures() {
        let mut resources = ResourceRegistry::new();
        let config = ViewerConfig::default();
        let mesh = build_box(
            &mut resources,
            &config,
            DIMS,
            &FaceSet::default(),
            Rotation::default(),
        )
        .unwrap();

        assert_eq!(mesh.materials.len(), 6);
        for (slot, id) in FaceSlot::ALL.iter().zip(&mesh.materials) {
            let material = resources.material(*id).unwrap();
            assert_eq!(material.color, config.palette.face_color(slot.group()));
            assert!(material.map.is_none());
        }
        let edges = mesh.edges.unwrap();
        assert_eq!(resources.geometry(edges.geometry).unwrap().vertex_count(), 24);
        resources.dispose_mesh(MeshNode { edges: Some(edges), ..mesh }).unwrap();
        assert!(resources.live_counts().is_empty());
    }

    #[test]
    fn test_reflection_materials_are_translucent_and_share_textures() {
        let mut resources = ResourceRegistry::new();
        let config = ViewerConfig::default();
        let top = resources.add_texture(TextureImage::solid(1, 1, [0, 0, 0, 255]));
        let textures = FaceSet::new(None, None, Some(top));

        let mesh = build_reflection(&mut resources, &config, DIMS, &textures, Rotation::default())
            .unwrap();
        assert!(mesh.edges.is_none());
        assert_eq!(resources.texture_refs(top), 3);
        for id in &mesh.materials {
            let material = resources.material(*id).unwrap();
            assert!(material.transparent);
            assert_relative_eq!(material.opacity, 0.3);
        }

        let mut scene = Scene::new(config.palette.edge);
        let node = scene.add_mesh(mesh);
        dispose_node(&mut scene, &mut resources, Some(node)).unwrap();
        let mut textures = textures;
        release_textures(&mut resources, &mut textures).unwrap();
        assert_eq!(textures, FaceSet::default());
        assert!(resources.live_counts().is_empty());
    }
}
