//! Per-frame draw ordering.
//!
//! Opaque groups draw first, then edge overlays, then translucent groups so
//! they blend over everything behind them.

use std::ops::Range;

use mockup_core::scene::{GeometryId, MaterialId, NodeId, ResourceRegistry, Scene};

use crate::pipeline::{BlendMode, PipelineVariant};

/// One material group of a mesh
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    /// Node supplying the model transform.
    pub node: NodeId,
    /// Triangle geometry.
    pub geometry: GeometryId,
    /// Material for this group.
    pub material: MaterialId,
    /// Index range of the group.
    pub indices: Range<u32>,
    /// Pipeline to draw with.
    pub variant: PipelineVariant,
}

/// An edge overlay
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeItem {
    /// Node supplying the model transform.
    pub node: NodeId,
    /// Line geometry.
    pub geometry: GeometryId,
    /// Line material.
    pub material: MaterialId,
    /// Number of line vertices.
    pub vertex_count: u32,
}

/// Everything to draw this frame, in pass order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    /// Opaque mesh groups.
    pub opaque: Vec<DrawItem>,
    /// Edge overlays.
    pub edges: Vec<EdgeItem>,
    /// Translucent mesh groups.
    pub transparent: Vec<DrawItem>,
}

impl DrawList {
    /// Collect the scene's draws
    ///
    /// Groups whose geometry, material slot or material is missing are
    /// skipped.
    pub fn build(scene: &Scene, resources: &ResourceRegistry) -> Self {
        let mut list = Self::default();

        for (node, mesh) in scene.meshes() {
            let Some(geometry) = resources.geometry(mesh.geometry) else {
                tracing::debug!(%node, "Skipping mesh without geometry");
                continue;
            };

            let whole = [mockup_core::GeometryGroup {
                start: 0,
                count: geometry.element_count() as u32,
                material_index: 0,
            }];
            let groups = if geometry.groups.is_empty() {
                &whole[..]
            } else {
                &geometry.groups[..]
            };

            for group in groups {
                if group.count == 0 {
                    continue;
                }
                let Some(&material_id) = mesh.materials.get(group.material_index) else {
                    continue;
                };
                let Some(material) = resources.material(material_id) else {
                    continue;
                };
                let variant = PipelineVariant::for_material(material, &mesh.transform);
                let item = DrawItem {
                    node,
                    geometry: mesh.geometry,
                    material: material_id,
                    indices: group.start..group.start + group.count,
                    variant,
                };
                match variant.blend {
                    BlendMode::Opaque => list.opaque.push(item),
                    BlendMode::Transparent => list.transparent.push(item),
                }
            }

            if let Some(edges) = mesh.edges
                && let Some(lines) = resources.geometry(edges.geometry)
                && lines.element_count() > 0
            {
                list.edges.push(EdgeItem {
                    node,
                    geometry: edges.geometry,
                    material: edges.material,
                    vertex_count: lines.element_count() as u32,
                });
            }
        }

        list
    }

    /// Total number of draw calls
    pub fn len(&self) -> usize {
        self.opaque.len() + self.edges.len() + self.transparent.len()
    }

    /// Whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
