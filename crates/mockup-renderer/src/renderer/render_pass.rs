//! Render pass execution.

use crate::sub_renderers::{EdgeRenderer, MeshRenderer};

use super::{CameraController, DrawItem, DrawList, LightingSystem, ResourceCache};

/// Main pass parameters.
pub struct MainPassParams<'a> {
    /// Camera controller.
    pub camera: &'a CameraController,
    /// Lighting system.
    pub lighting: &'a LightingSystem,
    /// GPU resources.
    pub resources: &'a ResourceCache,
    /// Draws for this frame.
    pub draw_list: &'a DrawList,
    /// Mesh renderer.
    pub mesh_renderer: &'a MeshRenderer,
    /// Edge renderer.
    pub edge_renderer: &'a EdgeRenderer,
    /// Depth view.
    pub depth_view: &'a wgpu::TextureView,
    /// MSAA view (if MSAA is enabled).
    pub msaa_view: Option<&'a wgpu::TextureView>,
    /// Clear color.
    pub clear_color: wgpu::Color,
}

/// Execute the main render pass.
pub fn render_main_pass(
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    params: &MainPassParams<'_>,
) {
    // Render to the multisample texture and resolve to the output when MSAA
    // is enabled
    let color_attachment = match params.msaa_view {
        Some(msaa_view) => wgpu::RenderPassColorAttachment {
            view: msaa_view,
            resolve_target: Some(view),
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(params.clear_color),
                store: wgpu::StoreOp::Store,
            },
        },
        None => wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(params.clear_color),
                store: wgpu::StoreOp::Store,
            },
        },
    };

    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Main Render Pass"),
        color_attachments: &[Some(color_attachment)],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: params.depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    if params.draw_list.is_empty() {
        return;
    }

    render_pass.set_bind_group(0, params.camera.bind_group(), &[]);
    render_pass.set_bind_group(3, params.lighting.light_bind_group(), &[]);

    for item in &params.draw_list.opaque {
        render_mesh_item(&mut render_pass, params, item);
    }

    for item in &params.draw_list.edges {
        let (Some(geometry), Some(node), Some(material)) = (
            params.resources.geometry(item.geometry),
            params.resources.node(item.node),
            params.resources.material(item.material),
        ) else {
            continue;
        };
        params.edge_renderer.render(
            &mut render_pass,
            &geometry.vertex_buffer,
            item.vertex_count,
            &node.bind_group,
            &material.bind_group,
        );
    }

    // The edge layout stops at group 2, so rebind the lights
    if !params.draw_list.transparent.is_empty() {
        render_pass.set_bind_group(3, params.lighting.light_bind_group(), &[]);
    }
    for item in &params.draw_list.transparent {
        render_mesh_item(&mut render_pass, params, item);
    }
}

fn render_mesh_item<'a>(
    render_pass: &mut wgpu::RenderPass<'a>,
    params: &MainPassParams<'a>,
    item: &DrawItem,
) {
    let (Some(geometry), Some(node), Some(material)) = (
        params.resources.geometry(item.geometry),
        params.resources.node(item.node),
        params.resources.material(item.material),
    ) else {
        return;
    };
    let Some(index_buffer) = &geometry.index_buffer else {
        return;
    };
    params.mesh_renderer.render(
        render_pass,
        item.variant,
        &geometry.vertex_buffer,
        index_buffer,
        item.indices.clone(),
        &node.bind_group,
        &material.bind_group,
    );
}
