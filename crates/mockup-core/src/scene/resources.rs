//! Resource registry with disposal bookkeeping
//!
//! Every geometry, material and texture the viewer creates is registered
//! here. Disposal removes the resource exactly once and queues a
//! [`ResourceEvent`] so the renderer can free the matching GPU objects.
//!
//! Textures are reference counted. A material mapping a texture holds one
//! reference, and whoever registered the texture holds the initial one; the
//! texture is freed when the last reference is released.

use std::collections::HashMap;

use tracing::{debug, warn};
use uuid::Uuid;

use super::{GeometryId, MaterialId, MeshNode, TextureId};
use crate::geometry::GeometryData;
use crate::material::Material;
use crate::texture::TextureImage;

/// Errors raised by misuse of resource handles
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("{kind} {id} is not live (unknown or already disposed)")]
    NotLive { kind: &'static str, id: Uuid },
}

impl ResourceError {
    fn geometry(id: GeometryId) -> Self {
        Self::NotLive {
            kind: "geometry",
            id: id.as_uuid(),
        }
    }

    fn material(id: MaterialId) -> Self {
        Self::NotLive {
            kind: "material",
            id: id.as_uuid(),
        }
    }

    fn texture(id: TextureId) -> Self {
        Self::NotLive {
            kind: "texture",
            id: id.as_uuid(),
        }
    }
}

/// Lifecycle notifications consumed by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceEvent {
    GeometryCreated(GeometryId),
    GeometryDisposed(GeometryId),
    MaterialCreated(MaterialId),
    MaterialDisposed(MaterialId),
    TextureCreated(TextureId),
    TextureDisposed(TextureId),
}

/// Number of resources per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceCounts {
    pub geometries: usize,
    pub materials: usize,
    pub textures: usize,
}

impl ResourceCounts {
    pub fn total(&self) -> usize {
        self.geometries + self.materials + self.textures
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Lifetime totals, for leak checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceStats {
    pub created: ResourceCounts,
    pub disposed: ResourceCounts,
}

struct TextureEntry {
    image: TextureImage,
    refs: u32,
}

/// Owner of all CPU-side scene resources
#[derive(Default)]
pub struct ResourceRegistry {
    geometries: HashMap<GeometryId, GeometryData>,
    materials: HashMap<MaterialId, Material>,
    textures: HashMap<TextureId, TextureEntry>,
    events: Vec<ResourceEvent>,
    stats: ResourceStats,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, geometry: GeometryData) -> GeometryId {
        let id = GeometryId::new();
        self.geometries.insert(id, geometry);
        self.events.push(ResourceEvent::GeometryCreated(id));
        self.stats.created.geometries += 1;
        id
    }

    pub fn dispose_geometry(&mut self, id: GeometryId) -> Result<(), ResourceError> {
        self.geometries
            .remove(&id)
            .ok_or_else(|| ResourceError::geometry(id))?;
        self.events.push(ResourceEvent::GeometryDisposed(id));
        self.stats.disposed.geometries += 1;
        Ok(())
    }

    /// Register a material, taking a reference on its texture map
    pub fn add_material(&mut self, material: Material) -> Result<MaterialId, ResourceError> {
        if let Some(texture) = material.map {
            self.retain_texture(texture)?;
        }
        let id = MaterialId::new();
        self.materials.insert(id, material);
        self.events.push(ResourceEvent::MaterialCreated(id));
        self.stats.created.materials += 1;
        Ok(id)
    }

    /// Dispose a material and release its texture map reference
    pub fn dispose_material(&mut self, id: MaterialId) -> Result<(), ResourceError> {
        let material = self
            .materials
            .remove(&id)
            .ok_or_else(|| ResourceError::material(id))?;
        self.events.push(ResourceEvent::MaterialDisposed(id));
        self.stats.disposed.materials += 1;
        if let Some(texture) = material.map {
            self.release_texture(texture)?;
        }
        Ok(())
    }

    /// Register a texture; the caller owns the initial reference
    pub fn add_texture(&mut self, image: TextureImage) -> TextureId {
        let id = TextureId::new();
        debug!(texture = %id, width = image.width, height = image.height, "Texture registered");
        self.textures.insert(id, TextureEntry { image, refs: 1 });
        self.events.push(ResourceEvent::TextureCreated(id));
        self.stats.created.textures += 1;
        id
    }

    pub fn retain_texture(&mut self, id: TextureId) -> Result<(), ResourceError> {
        let entry = self
            .textures
            .get_mut(&id)
            .ok_or_else(|| ResourceError::texture(id))?;
        entry.refs += 1;
        Ok(())
    }

    /// Drop one reference; the texture is disposed when none remain
    pub fn release_texture(&mut self, id: TextureId) -> Result<(), ResourceError> {
        let entry = self
            .textures
            .get_mut(&id)
            .ok_or_else(|| ResourceError::texture(id))?;
        entry.refs -= 1;
        if entry.refs == 0 {
            self.textures.remove(&id);
            self.events.push(ResourceEvent::TextureDisposed(id));
            self.stats.disposed.textures += 1;
        }
        Ok(())
    }

    /// Dispose a mesh's geometry, materials and edge overlay
    pub fn dispose_mesh(&mut self, mesh: MeshNode) -> Result<(), ResourceError> {
        self.dispose_geometry(mesh.geometry)?;
        for material in mesh.materials {
            self.dispose_material(material)?;
        }
        if let Some(edges) = mesh.edges {
            self.dispose_geometry(edges.geometry)?;
            self.dispose_material(edges.material)?;
        }
        Ok(())
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&GeometryData> {
        self.geometries.get(&id)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    pub fn texture(&self, id: TextureId) -> Option<&TextureImage> {
        self.textures.get(&id).map(|entry| &entry.image)
    }

    pub fn texture_refs(&self, id: TextureId) -> u32 {
        self.textures.get(&id).map_or(0, |entry| entry.refs)
    }

    /// Drain queued lifecycle events in the order they happened
    pub fn take_events(&mut self) -> Vec<ResourceEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn live_counts(&self) -> ResourceCounts {
        ResourceCounts {
            geometries: self.geometries.len(),
            materials: self.materials.len(),
            textures: self.textures.len(),
        }
    }

    pub fn stats(&self) -> ResourceStats {
        self.stats
    }
}

impl Drop for ResourceRegistry {
    fn drop(&mut self) {
        let live = self.live_counts();
        if !live.is_empty() {
            warn!(?live, "Resource registry dropped with live resources");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::GeometryData;
    use crate::scene::{LineNode, Transform};

    fn texture() -> TextureImage {
        TextureImage::solid(2, 2, [255, 0, 0, 255])
    }

    #[test]
    fn test_geometry_disposed_once() {
        let mut registry = ResourceRegistry::new();
        let id = registry.add_geometry(GeometryData::lines(Vec::new()));
        assert!(registry.geometry(id).is_some());
        registry.dispose_geometry(id).unwrap();
        assert_eq!(
            registry.dispose_geometry(id),
            Err(ResourceError::NotLive {
                kind: "geometry",
                id: id.as_uuid()
            })
        );
        assert_eq!(registry.stats().disposed.geometries, 1);
    }

    #[test]
    fn test_material_holds_texture_reference() {
        let mut registry = ResourceRegistry::new();
        let texture = registry.add_texture(texture());
        let a = registry.add_material(Material::textured(texture)).unwrap();
        let b = registry.add_material(Material::textured(texture)).unwrap();
        assert_eq!(registry.texture_refs(texture), 3);

        registry.release_texture(texture).unwrap();
        registry.dispose_material(a).unwrap();
        assert!(registry.texture(texture).is_some());

        registry.dispose_material(b).unwrap();
        assert!(registry.texture(texture).is_none());
        assert_eq!(registry.stats().disposed.textures, 1);
        assert!(registry.release_texture(texture).is_err());
    }

    #[test]
    fn test_material_with_unknown_texture_is_rejected() {
        let mut registry = ResourceRegistry::new();
        let result = registry.add_material(Material::textured(TextureId::new()));
        assert!(result.is_err());
        assert_eq!(registry.live_counts(), ResourceCounts::default());
    }

    #[test]
    fn test_events_are_drained_in_order() {
        let mut registry = ResourceRegistry::new();
        let geometry = registry.add_geometry(GeometryData::lines(Vec::new()));
        let material = registry.add_material(Material::phong(Color::WHITE)).unwrap();
        registry.dispose_geometry(geometry).unwrap();

        assert_eq!(
            registry.take_events(),
            vec![
                ResourceEvent::GeometryCreated(geometry),
                ResourceEvent::MaterialCreated(material),
                ResourceEvent::GeometryDisposed(geometry),
            ]
        );
        assert!(registry.take_events().is_empty());
        registry.dispose_material(material).unwrap();
    }

    #[test]
    fn test_dispose_mesh_frees_everything() {
        let mut registry = ResourceRegistry::new();
        let texture = registry.add_texture(texture());
        let mesh = MeshNode {
            geometry: registry.add_geometry(GeometryData::lines(Vec::new())),
            materials: vec![
                registry.add_material(Material::textured(texture)).unwrap(),
                registry.add_material(Material::phong(Color::BLACK)).unwrap(),
            ],
            transform: Transform::default(),
            edges: Some(LineNode {
                geometry: registry.add_geometry(GeometryData::lines(Vec::new())),
                material: registry.add_material(Material::line(Color::BLACK)).unwrap(),
            }),
        };
        registry.dispose_mesh(mesh).unwrap();
        registry.release_texture(texture).unwrap();

        assert!(registry.live_counts().is_empty());
        let stats = registry.stats();
        assert_eq!(stats.created, stats.disposed);
    }
}
