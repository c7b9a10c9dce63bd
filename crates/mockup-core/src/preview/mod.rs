//! Box preview controller
//!
//! `BoxPreview` owns the scene, camera and resource registry for one viewer
//! and keeps them in step with the host's [`BoxOptions`]. It does no I/O and
//! never touches the GPU: the host drives it with events and draws the
//! [`Frame`] it exposes.
//!
//! Rebuilding the box is split in two so no state is borrowed while
//! textures load:
//!
//! 1. [`BoxPreview::begin_rebuild`] disposes the current meshes and returns a
//!    [`RebuildTicket`] listing the texture URLs to load.
//! 2. The host loads the textures (see [`load_face_textures`]) and passes the
//!    result to [`BoxPreview::complete_rebuild`], which assembles the new box.
//!
//! Only the newest ticket is honored. Completing an older one drops its
//! images without touching the scene.
//!
//! [`load_face_textures`]: crate::texture::load_face_textures

mod builder;

use std::fmt;

use tracing::{debug, info, warn};

use crate::camera::PerspectiveCamera;
use crate::config::ViewerConfig;
use crate::drag::{DragController, PointerPosition, RotationDelta};
use crate::face::FaceSet;
use crate::options::{BoxOptions, Rotation};
use crate::scene::{MeshNode, NodeId, ResourceError, ResourceRegistry, Scene, TextureId};
use crate::sync::OptionsDiff;
use crate::texture::TextureImage;

/// Drawable size in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Token tying a texture load to the rebuild that requested it
#[derive(Debug, Clone, PartialEq)]
pub struct RebuildTicket {
    generation: u64,
    urls: FaceSet<Option<String>>,
}

impl RebuildTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Texture URLs to load, per face group
    pub fn urls(&self) -> &FaceSet<Option<String>> {
        &self.urls
    }
}

/// Everything a renderer needs to draw one frame
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub camera: &'a PerspectiveCamera,
    /// Mutable so the renderer can drain lifecycle events
    pub resources: &'a mut ResourceRegistry,
    pub viewport: ViewportSize,
}

/// Renders a frame and captures it as an image data URL
pub trait FrameExporter {
    type Error: fmt::Display;

    fn capture_png(&mut self, frame: Frame<'_>) -> Result<String, Self::Error>;
}

struct Mounted {
    scene: Scene,
    camera: PerspectiveCamera,
    viewport: ViewportSize,
}

/// Keeps a box scene in sync with externally owned options
pub struct BoxPreview {
    config: ViewerConfig,
    options: BoxOptions,
    resources: ResourceRegistry,
    mounted: Option<Mounted>,
    box_node: Option<NodeId>,
    reflection_node: Option<NodeId>,
    /// One reference per loaded face texture, shared by box and reflection
    loaded: FaceSet<Option<TextureId>>,
    drag: DragController,
    generation: u64,
    pending: Option<u64>,
}

impl BoxPreview {
    pub fn new(options: BoxOptions, config: ViewerConfig) -> Self {
        let drag = DragController::new(config.interaction.drag_sensitivity);
        Self {
            config,
            options,
            resources: ResourceRegistry::new(),
            mounted: None,
            box_node: None,
            reflection_node: None,
            loaded: FaceSet::default(),
            drag,
            generation: 0,
            pending: None,
        }
    }

    pub fn options(&self) -> &BoxOptions {
        &self.options
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn is_rebuild_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.mounted.as_ref().map(|m| &m.scene)
    }

    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        self.mounted.as_ref().map(|m| &m.camera)
    }

    pub fn viewport(&self) -> Option<ViewportSize> {
        self.mounted.as_ref().map(|m| m.viewport)
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    pub fn box_node(&self) -> Option<NodeId> {
        self.box_node
    }

    pub fn reflection_node(&self) -> Option<NodeId> {
        self.reflection_node
    }

    pub fn box_mesh(&self) -> Option<&MeshNode> {
        self.scene()?.mesh(self.box_node?)
    }

    pub fn reflection_mesh(&self) -> Option<&MeshNode> {
        self.scene()?.mesh(self.reflection_node?)
    }

    /// Textures currently held for the box faces
    pub fn loaded_textures(&self) -> &FaceSet<Option<TextureId>> {
        &self.loaded
    }

    /// Set up scene and camera for a container of the given size
    ///
    /// Without a container this is a no-op. Returns the ticket for the
    /// initial box build.
    pub fn mount(
        &mut self,
        viewport: Option<ViewportSize>,
    ) -> Result<Option<RebuildTicket>, ResourceError> {
        let Some(viewport) = viewport else {
            debug!("No container, skipping mount");
            return Ok(None);
        };
        if self.mounted.is_some() {
            warn!("Box preview is already mounted");
            return Ok(None);
        }

        let scene = Scene::with_lighting(self.options.background_color, &self.config.lighting);
        let mut camera = PerspectiveCamera::new(&self.config.camera, 1.0, self.options.camera_distance);
        camera.set_viewport(viewport.width, viewport.height);
        self.mounted = Some(Mounted {
            scene,
            camera,
            viewport,
        });
        info!(
            "Box preview mounted at {}x{}",
            viewport.width, viewport.height
        );

        self.begin_rebuild()
    }

    /// Dispose the current meshes and request textures for a new box
    pub fn begin_rebuild(&mut self) -> Result<Option<RebuildTicket>, ResourceError> {
        let Some(mounted) = self.mounted.as_mut() else {
            return Ok(None);
        };
        builder::dispose_node(&mut mounted.scene, &mut self.resources, self.box_node.take())?;
        builder::dispose_node(
            &mut mounted.scene,
            &mut self.resources,
            self.reflection_node.take(),
        )?;
        builder::release_textures(&mut self.resources, &mut self.loaded)?;

        self.generation += 1;
        self.pending = Some(self.generation);
        debug!(generation = self.generation, "Box rebuild started");

        Ok(Some(RebuildTicket {
            generation: self.generation,
            urls: self.options.texture_urls(),
        }))
    }

    /// Assemble the box from loaded textures
    ///
    /// Returns `false` when the ticket is stale or the preview was unmounted
    /// while loading; the images are dropped in that case.
    pub fn complete_rebuild(
        &mut self,
        ticket: RebuildTicket,
        images: FaceSet<Option<TextureImage>>,
    ) -> Result<bool, ResourceError> {
        let Some(mounted) = self.mounted.as_mut() else {
            debug!(generation = ticket.generation, "Rebuild finished after unmount");
            return Ok(false);
        };
        if self.pending != Some(ticket.generation) {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale rebuild"
            );
            return Ok(false);
        }
        self.pending = None;

        let resources = &mut self.resources;
        self.loaded = images.map(|image| image.map(|image| resources.add_texture(image)));

        let mesh = builder::build_box(
            &mut self.resources,
            &self.config,
            self.options.dimensions(),
            &self.loaded,
            self.options.rotation(),
        )?;
        self.box_node = Some(mounted.scene.add_mesh(mesh));
        debug!(generation = ticket.generation, "Box rebuilt");

        if self.options.show_reflection {
            self.create_reflection()?;
        }
        Ok(true)
    }

    /// Apply a new options snapshot
    ///
    /// Returns a ticket when the box must be rebuilt.
    pub fn set_options(
        &mut self,
        options: BoxOptions,
    ) -> Result<Option<RebuildTicket>, ResourceError> {
        let diff = OptionsDiff::between(&self.options, &options);
        self.options = options;
        if diff.is_empty() {
            return Ok(None);
        }
        let Some(mounted) = self.mounted.as_mut() else {
            return Ok(None);
        };

        if diff.camera_distance {
            mounted.camera.set_distance(self.options.camera_distance);
        }
        if diff.background {
            mounted.scene.background = self.options.background_color;
        }
        if diff.needs_rebuild() {
            // The rebuild picks up rotation and reflection state itself
            return self.begin_rebuild();
        }
        if diff.rotation {
            self.apply_rotation();
        }
        if diff.reflection {
            if self.options.show_reflection {
                self.create_reflection()?;
            } else {
                self.dispose_reflection()?;
            }
        }
        Ok(None)
    }

    pub fn pointer_down(&mut self, position: PointerPosition) {
        self.drag.pointer_down(position);
    }

    /// Rotate while dragging; returns the new rotation to report to the host
    pub fn pointer_move(&mut self, position: PointerPosition) -> Option<Rotation> {
        let delta = self.drag.pointer_move(position, self.box_node.is_some())?;
        Some(self.rotate_by(delta))
    }

    /// Ends a drag; also used when the pointer leaves the canvas
    pub fn pointer_up(&mut self) {
        self.drag.pointer_up();
    }

    pub fn touch_start(&mut self, touches: &[PointerPosition]) -> bool {
        self.drag.touch_start(touches)
    }

    /// Like [`pointer_move`](Self::pointer_move); `Some` means the host
    /// should suppress the browser's default scrolling
    pub fn touch_move(&mut self, touches: &[PointerPosition]) -> Option<Rotation> {
        let delta = self.drag.touch_move(touches, self.box_node.is_some())?;
        Some(self.rotate_by(delta))
    }

    pub fn touch_end(&mut self) {
        self.drag.touch_end();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Track a container resize; no-op while unmounted or without a container
    pub fn resize(&mut self, viewport: Option<ViewportSize>) -> bool {
        let (Some(mounted), Some(viewport)) = (self.mounted.as_mut(), viewport) else {
            return false;
        };
        mounted.viewport = viewport;
        mounted.camera.set_viewport(viewport.width, viewport.height);
        debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
        true
    }

    /// Dispose every mesh and texture and forget the scene
    ///
    /// Pending lifecycle events are discarded; the renderer that would have
    /// consumed them goes away with the mount.
    pub fn unmount(&mut self) -> Result<(), ResourceError> {
        let Some(mut mounted) = self.mounted.take() else {
            return Ok(());
        };
        builder::dispose_node(&mut mounted.scene, &mut self.resources, self.box_node.take())?;
        builder::dispose_node(
            &mut mounted.scene,
            &mut self.resources,
            self.reflection_node.take(),
        )?;
        builder::release_textures(&mut self.resources, &mut self.loaded)?;

        self.pending = None;
        self.drag.pointer_up();
        let discarded = self.resources.take_events().len();
        info!(discarded_events = discarded, "Box preview unmounted");
        Ok(())
    }

    /// Borrow the state needed to draw, or `None` before mount
    pub fn frame(&mut self) -> Option<Frame<'_>> {
        let mounted = self.mounted.as_ref()?;
        Some(Frame {
            scene: &mounted.scene,
            camera: &mounted.camera,
            resources: &mut self.resources,
            viewport: mounted.viewport,
        })
    }

    /// Render once and return a PNG data URL, or `None` before mount
    pub fn export_png<E: FrameExporter>(&mut self, exporter: &mut E) -> Option<String> {
        let frame = self.frame()?;
        match exporter.capture_png(frame) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("PNG export failed: {}", e);
                None
            }
        }
    }

    fn rotate_by(&mut self, delta: RotationDelta) -> Rotation {
        let mut rotation = self.options.rotation();
        rotation.y += delta.yaw;
        rotation.x += delta.pitch;
        self.options.set_rotation(rotation);
        self.apply_rotation();
        rotation
    }

    fn apply_rotation(&mut self) {
        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };
        let rotation = self.options.rotation();
        let dimensions = self.options.dimensions();
        if let Some(mesh) = self.box_node.and_then(|id| mounted.scene.mesh_mut(id)) {
            mesh.transform = builder::box_transform(rotation);
        }
        if let Some(mesh) = self.reflection_node.and_then(|id| mounted.scene.mesh_mut(id)) {
            mesh.transform =
                builder::reflection_transform(dimensions, rotation, self.config.reflection.gap);
        }
    }

    fn create_reflection(&mut self) -> Result<(), ResourceError> {
        let Some(mounted) = self.mounted.as_mut() else {
            return Ok(());
        };
        if self.box_node.is_none() {
            return Ok(());
        }
        builder::dispose_node(
            &mut mounted.scene,
            &mut self.resources,
            self.reflection_node.take(),
        )?;
        let mesh = builder::build_reflection(
            &mut self.resources,
            &self.config,
            self.options.dimensions(),
            &self.loaded,
            self.options.rotation(),
        )?;
        self.reflection_node = Some(mounted.scene.add_mesh(mesh));
        debug!("Reflection created");
        Ok(())
    }

    fn dispose_reflection(&mut self) -> Result<(), ResourceError> {
        let Some(mounted) = self.mounted.as_mut() else {
            return Ok(());
        };
        builder::dispose_node(
            &mut mounted.scene,
            &mut self.resources,
            self.reflection_node.take(),
        )
    }
}

impl Drop for BoxPreview {
    fn drop(&mut self) {
        if let Err(e) = self.unmount() {
            warn!("Failed to release preview resources: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::scene::ResourceCounts;
    use crate::texture::load_face_textures;
    use crate::texture::testing::FakeLoader;
    use approx::assert_relative_eq;
    use futures::executor::block_on;

    const VIEWPORT: ViewportSize = ViewportSize {
        width: 800,
        height: 600,
    };

    fn finish(preview: &mut BoxPreview, loader: &FakeLoader, ticket: RebuildTicket) -> bool {
        let images = block_on(load_face_textures(loader, ticket.urls()));
        preview.complete_rebuild(ticket, images).unwrap()
    }

    fn mounted(options: BoxOptions, loader: &FakeLoader) -> BoxPreview {
        let mut preview = BoxPreview::new(options, ViewerConfig::default());
        let ticket = preview.mount(Some(VIEWPORT)).unwrap().unwrap();
        assert!(finish(&mut preview, loader, ticket));
        preview
    }

    struct DataUrlExporter {
        calls: usize,
    }

    impl FrameExporter for DataUrlExporter {
        type Error = String;

        fn capture_png(&mut self, frame: Frame<'_>) -> Result<String, String> {
            self.calls += 1;
            frame.resources.take_events();
            Ok(format!(
                "data:image/png;base64,{}",
                frame.scene.mesh_count()
            ))
        }
    }

    #[test]
    fn test_mount_without_container_is_noop() {
        let mut preview = BoxPreview::new(BoxOptions::default(), ViewerConfig::default());
        assert_eq!(preview.mount(None).unwrap(), None);
        assert!(!preview.is_mounted());
        assert!(!preview.resize(Some(VIEWPORT)));
    }

    #[test]
    fn test_mount_builds_box_with_edges() {
        let preview = mounted(BoxOptions::default(), &FakeLoader::default());
        let scene = preview.scene().unwrap();
        assert_eq!(scene.mesh_count(), 1);
        assert_eq!(scene.lights.len(), 3);
        assert!(preview.box_mesh().unwrap().edges.is_some());
        assert_eq!(
            preview.resources().live_counts(),
            ResourceCounts {
                geometries: 2,
                materials: 7,
                textures: 0,
            }
        );
        let camera = preview.camera().unwrap();
        assert_relative_eq!(camera.aspect, 800.0 / 600.0);
        assert_eq!(camera.distance(), 5.0);
    }

    #[test]
    fn test_dimension_change_disposes_previous_mesh_once() {
        let loader = FakeLoader::default();
        let mut preview = mounted(BoxOptions::default(), &loader);
        let first = preview.box_node().unwrap();

        let ticket = preview
            .set_options(BoxOptions {
                width: 4.0,
                ..BoxOptions::default()
            })
            .unwrap()
            .unwrap();
        // Old mesh is gone before the replacement exists
        assert!(preview.box_node().is_none());
        let stats = preview.resources().stats();
        assert_eq!(stats.disposed.geometries, 2);
        assert_eq!(stats.disposed.materials, 7);

        assert!(finish(&mut preview, &loader, ticket));
        let second = preview.box_node().unwrap();
        assert_ne!(first, second);
        let mesh = preview.box_mesh().unwrap();
        let (min, max) = preview.resources().geometry(mesh.geometry).unwrap().bounds().unwrap();
        assert_eq!((min[0], max[0]), (-2.0, 2.0));
        assert_eq!(preview.resources().stats().disposed.geometries, 2);
    }

    #[test]
    fn test_textures_map_faces_and_failures_fall_back() {
        let loader = FakeLoader::with(&["front.png"]);
        let options = BoxOptions {
            front_image: Some("front.png".into()),
            side_image: Some("broken.png".into()),
            ..BoxOptions::default()
        };
        let preview = mounted(options, &loader);
        let resources = preview.resources();
        let mesh = preview.box_mesh().unwrap();

        let front = preview.loaded_textures().front.unwrap();
        assert!(preview.loaded_textures().side.is_none());
        // Cache plus the front and back materials
        assert_eq!(resources.texture_refs(front), 3);

        let right = resources.material(mesh.materials[0]).unwrap();
        assert_eq!(right.map, None);
        assert_eq!(right.color, Color::from_hex(0x4a90d9));
        let back = resources.material(mesh.materials[5]).unwrap();
        assert_eq!(back.map, Some(front));
    }

    #[test]
    fn test_reflection_toggle() {
        let loader = FakeLoader::with(&["top.png"]);
        let mut options = BoxOptions {
            top_image: Some("top.png".into()),
            ..BoxOptions::default()
        };
        let mut preview = mounted(options.clone(), &loader);
        let top = preview.loaded_textures().top.unwrap();

        options.show_reflection = true;
        assert_eq!(preview.set_options(options.clone()).unwrap(), None);
        let reflection = preview.reflection_mesh().unwrap();
        assert_relative_eq!(reflection.transform.position.y, -3.01);
        assert_eq!(reflection.transform.scale.y, -1.0);
        assert_relative_eq!(reflection.transform.rotation.x, -0.2);
        assert_relative_eq!(reflection.transform.rotation.y, 0.5);
        assert_eq!(preview.resources().texture_refs(top), 5);

        options.show_reflection = false;
        preview.set_options(options).unwrap();
        assert!(preview.reflection_node().is_none());
        assert_eq!(preview.scene().unwrap().mesh_count(), 1);
        assert_eq!(preview.resources().texture_refs(top), 3);
    }

    #[test]
    fn test_reflection_requested_before_box_exists() {
        let loader = FakeLoader::default();
        let mut preview = BoxPreview::new(BoxOptions::default(), ViewerConfig::default());
        let ticket = preview.mount(Some(VIEWPORT)).unwrap().unwrap();

        preview
            .set_options(BoxOptions {
                show_reflection: true,
                ..BoxOptions::default()
            })
            .unwrap();
        assert!(preview.reflection_node().is_none());

        assert!(finish(&mut preview, &loader, ticket));
        assert!(preview.reflection_node().is_some());
    }

    #[test]
    fn test_drag_rotates_box_and_reflection() {
        let mut preview = mounted(
            BoxOptions {
                show_reflection: true,
                ..BoxOptions::default()
            },
            &FakeLoader::default(),
        );
        preview.pointer_down(PointerPosition::new(100.0, 100.0));
        let rotation = preview.pointer_move(PointerPosition::new(150.0, 120.0)).unwrap();
        assert_relative_eq!(rotation.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(rotation.x, 0.4, epsilon = 1e-6);
        assert_eq!(preview.options().rotation(), rotation);

        let box_rotation = preview.box_mesh().unwrap().transform.rotation;
        assert_relative_eq!(box_rotation.x, 0.4, epsilon = 1e-6);
        let reflection_rotation = preview.reflection_mesh().unwrap().transform.rotation;
        assert_relative_eq!(reflection_rotation.x, -0.4, epsilon = 1e-6);
        assert_relative_eq!(reflection_rotation.y, 1.0, epsilon = 1e-6);

        preview.pointer_up();
        assert_eq!(preview.pointer_move(PointerPosition::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_drag_is_ignored_until_box_exists() {
        let mut preview = BoxPreview::new(BoxOptions::default(), ViewerConfig::default());
        let _ticket = preview.mount(Some(VIEWPORT)).unwrap();
        assert!(preview.touch_start(&[PointerPosition::new(0.0, 0.0)]));
        assert_eq!(preview.touch_move(&[PointerPosition::new(30.0, 0.0)]), None);
        assert_eq!(preview.options().rotation(), BoxOptions::default().rotation());
    }

    #[test]
    fn test_stale_rebuild_is_discarded() {
        let loader = FakeLoader::default();
        let mut preview = BoxPreview::new(BoxOptions::default(), ViewerConfig::default());
        let first = preview.mount(Some(VIEWPORT)).unwrap().unwrap();
        let second = preview
            .set_options(BoxOptions {
                height: 1.0,
                ..BoxOptions::default()
            })
            .unwrap()
            .unwrap();
        assert!(second.generation() > first.generation());

        assert!(finish(&mut preview, &loader, second));
        assert!(!finish(&mut preview, &loader, first));
        assert_eq!(preview.scene().unwrap().mesh_count(), 1);
        assert_eq!(preview.resources().live_counts().geometries, 2);
    }

    #[test]
    fn test_combined_change_rebuilds_once() {
        let loader = FakeLoader::with(&["side.png"]);
        let mut preview = mounted(BoxOptions::default(), &loader);
        let before = preview.resources().stats().created.geometries;

        let ticket = preview
            .set_options(BoxOptions {
                depth: 2.0,
                side_image: Some("side.png".into()),
                ..BoxOptions::default()
            })
            .unwrap()
            .unwrap();
        assert!(finish(&mut preview, &loader, ticket));
        assert_eq!(preview.resources().stats().created.geometries, before + 2);
        assert!(preview.loaded_textures().side.is_some());
    }

    #[test]
    fn test_direct_updates_keep_box() {
        let mut preview = mounted(BoxOptions::default(), &FakeLoader::default());
        let node = preview.box_node();
        let ticket = preview
            .set_options(BoxOptions {
                camera_distance: 9.0,
                background_color: Color::BLACK,
                rotation_y: 2.0,
                ..BoxOptions::default()
            })
            .unwrap();
        assert_eq!(ticket, None);
        assert_eq!(preview.box_node(), node);
        assert_eq!(preview.camera().unwrap().distance(), 9.0);
        assert_eq!(preview.scene().unwrap().background, Color::BLACK);
        assert_eq!(preview.box_mesh().unwrap().transform.rotation.y, 2.0);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut preview = mounted(BoxOptions::default(), &FakeLoader::default());
        assert!(preview.resize(Some(ViewportSize::new(400, 400))));
        assert_eq!(preview.camera().unwrap().aspect, 1.0);
        assert!(!preview.resize(None));
        assert!(preview.resize(Some(ViewportSize::new(400, 0))));
        assert_eq!(preview.camera().unwrap().aspect, 1.0);
    }

    #[test]
    fn test_export_before_and_after_mount() {
        let mut exporter = DataUrlExporter { calls: 0 };
        let mut preview = BoxPreview::new(BoxOptions::default(), ViewerConfig::default());
        assert_eq!(preview.export_png(&mut exporter), None);
        assert_eq!(exporter.calls, 0);

        let ticket = preview.mount(Some(VIEWPORT)).unwrap().unwrap();
        assert!(finish(&mut preview, &FakeLoader::default(), ticket));
        let url = preview.export_png(&mut exporter).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(exporter.calls, 1);
    }

    #[test]
    fn test_unmount_leaves_no_live_resources() {
        let loader = FakeLoader::with(&["front.png", "top.png"]);
        let mut preview = mounted(
            BoxOptions {
                front_image: Some("front.png".into()),
                top_image: Some("top.png".into()),
                show_reflection: true,
                ..BoxOptions::default()
            },
            &loader,
        );
        preview.unmount().unwrap();

        assert!(!preview.is_mounted());
        assert!(preview.box_node().is_none());
        assert!(preview.reflection_node().is_none());
        assert!(preview.resources().live_counts().is_empty());
        let stats = preview.resources().stats();
        assert_eq!(stats.created, stats.disposed);
        assert_eq!(stats.disposed.textures, 2);
        assert!(preview.frame().is_none());

        // Second unmount is harmless
        preview.unmount().unwrap();
    }

    #[test]
    fn test_rebuild_finishing_after_unmount_is_dropped() {
        let mut preview = BoxPreview::new(BoxOptions::default(), ViewerConfig::default());
        let ticket = preview.mount(Some(VIEWPORT)).unwrap().unwrap();
        preview.unmount().unwrap();
        assert!(!finish(&mut preview, &FakeLoader::default(), ticket));
        assert!(preview.resources().live_counts().is_empty());
    }
}
