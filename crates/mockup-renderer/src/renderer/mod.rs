//! Main renderer.
//!
//! The [`Renderer`] is composed of:
//! - [`CameraController`]: camera uniform (group 0)
//! - [`LightingSystem`]: light uniform (group 3)
//! - [`ResourceCache`]: GPU buffers, textures and bind groups mirrored from
//!   the scene's resource registry
//! - [`DrawList`]: this frame's draws in pass order
//!
//! Drawing a frame takes two calls: [`Renderer::prepare`] uploads whatever
//! changed, then [`Renderer::render`] records the main pass.

mod camera_controller;
mod draw_list;
pub mod gpu_resources;
mod lighting_system;
mod render_pass;
mod resource_cache;

pub use camera_controller::CameraController;
pub use draw_list::{DrawItem, DrawList, EdgeItem};
pub use lighting_system::LightingSystem;
pub use resource_cache::{GpuGeometry, GpuMaterial, GpuNode, GpuResourceCounts, ResourceCache};

use mockup_core::{Color, Frame};

use crate::constants::viewport::DEPTH_FORMAT;
use crate::pipeline::PipelineConfig;
use crate::sub_renderers::{EdgeRenderer, MeshRenderer};

/// Convert a scene background to a linear clear color
pub fn clear_color(background: Color) -> wgpu::Color {
    let [r, g, b] = background.to_linear();
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}

/// Main renderer combining the mesh and edge sub-renderers.
pub struct Renderer {
    // Core components
    camera_controller: CameraController,
    lighting_system: LightingSystem,
    resource_cache: ResourceCache,
    draw_list: DrawList,

    // Depth/MSAA resources
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    msaa_texture: Option<wgpu::Texture>,
    msaa_view: Option<wgpu::TextureView>,

    // Sub-renderers
    mesh_renderer: MeshRenderer,
    edge_renderer: EdgeRenderer,

    clear_color: wgpu::Color,
    format: wgpu::TextureFormat,
    sample_count: u32,
    width: u32,
    height: u32,
}

impl Renderer {
    /// Creates a new renderer for a color target of the given format.
    ///
    /// `sample_count` must already be supported by the adapter; see
    /// [`gpu_resources::resolve_sample_count`].
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Self {
        let config = PipelineConfig {
            format,
            depth_format: DEPTH_FORMAT,
            sample_count,
        };

        let camera_controller = CameraController::new(device);

        let (depth_texture, depth_view) =
            gpu_resources::create_depth_texture(device, width, height, sample_count);
        let (msaa_texture, msaa_view) =
            match gpu_resources::create_msaa_texture(device, format, width, height, sample_count) {
                Some((tex, view)) => (Some(tex), Some(view)),
                None => (None, None),
            };

        let mesh_renderer = MeshRenderer::new(device, &config, camera_controller.bind_group_layout());
        let edge_renderer = EdgeRenderer::new(
            device,
            &config,
            camera_controller.bind_group_layout(),
            mesh_renderer.model_bind_group_layout(),
            mesh_renderer.material_bind_group_layout(),
        );

        // Needs mesh_renderer for the light bind group layout
        let lighting_system = LightingSystem::new(device, &mesh_renderer);
        let resource_cache = ResourceCache::new(device, queue);

        tracing::info!(
            "Renderer created: {}x{}, format {:?}, {}x MSAA",
            width,
            height,
            format,
            sample_count
        );

        Self {
            camera_controller,
            lighting_system,
            resource_cache,
            draw_list: DrawList::default(),
            depth_texture,
            depth_view,
            msaa_texture,
            msaa_view,
            mesh_renderer,
            edge_renderer,
            clear_color: clear_color(Color::WHITE),
            format,
            sample_count,
            width,
            height,
        }
    }

    /// Resizes the renderer's textures for a new viewport size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 || (width == self.width && height == self.height) {
            return;
        }
        self.width = width;
        self.height = height;

        let (depth_texture, depth_view) =
            gpu_resources::create_depth_texture(device, width, height, self.sample_count);
        self.depth_texture.destroy();
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;

        let msaa_result =
            gpu_resources::create_msaa_texture(device, self.format, width, height, self.sample_count);
        let (msaa_texture, msaa_view) = match msaa_result {
            Some((tex, view)) => (Some(tex), Some(view)),
            None => (None, None),
        };
        if let Some(old) = self.msaa_texture.take() {
            old.destroy();
        }
        self.msaa_texture = msaa_texture;
        self.msaa_view = msaa_view;
    }

    /// Upload everything that changed since the last frame.
    ///
    /// Drains the registry's lifecycle events, so resources disposed on the
    /// CPU side are destroyed on the GPU here.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, frame: &mut Frame<'_>) {
        self.resize(device, frame.viewport.width, frame.viewport.height);

        let events = frame.resources.take_events();
        self.resource_cache
            .apply_events(device, queue, &self.mesh_renderer, frame.resources, &events);
        self.resource_cache
            .sync_nodes(device, queue, &self.mesh_renderer, frame.scene);

        self.camera_controller.update(queue, frame.camera);
        self.lighting_system.set_lights(&frame.scene.lights);
        self.lighting_system.update(queue);
        self.clear_color = clear_color(frame.scene.background);
        self.draw_list = DrawList::build(frame.scene, frame.resources);
    }

    /// Record the main pass into `encoder`, targeting `view`.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let main_params = render_pass::MainPassParams {
            camera: &self.camera_controller,
            lighting: &self.lighting_system,
            resources: &self.resource_cache,
            draw_list: &self.draw_list,
            mesh_renderer: &self.mesh_renderer,
            edge_renderer: &self.edge_renderer,
            depth_view: &self.depth_view,
            msaa_view: self.msaa_view.as_ref(),
            clear_color: self.clear_color,
        };
        render_pass::render_main_pass(encoder, view, &main_params);
    }

    /// Destroy all cached GPU resources.
    ///
    /// Call after the scene is torn down; a later `prepare` starts from
    /// scratch.
    pub fn release_resources(&mut self) {
        self.resource_cache.clear();
        self.draw_list = DrawList::default();
    }

    /// Returns the texture format used by the renderer.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Returns the MSAA sample count.
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Returns the current target size.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the clear color for the next frame.
    pub fn clear_color(&self) -> wgpu::Color {
        self.clear_color
    }

    /// Returns this frame's draws.
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Count live GPU resources.
    pub fn gpu_resource_counts(&self) -> GpuResourceCounts {
        self.resource_cache.counts()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.depth_texture.destroy();
        if let Some(texture) = &self.msaa_texture {
            texture.destroy();
        }
        tracing::debug!("Renderer dropped");
    }
}
