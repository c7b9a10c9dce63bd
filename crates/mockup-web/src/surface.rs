//! wgpu surface on a canvas element

use mockup_core::{Frame, FrameExporter};
use mockup_renderer::Renderer;
use mockup_renderer::renderer::gpu_resources::resolve_sample_count;
use web_sys::HtmlCanvasElement;

use crate::error::{SurfaceError, js_message};

/// Device, queue, configured surface and the renderer drawing into it
pub struct GpuSurface {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// sRGB view of the surface format; may differ from `config.format`
    /// on WebGPU, where canvases only expose linear formats
    view_format: wgpu::TextureFormat,
    renderer: Renderer,
}

impl GpuSurface {
    /// Create a surface for `canvas` sized `width` x `height` physical pixels
    pub async fn new(
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
        msaa_sample_count: u32,
    ) -> Result<Self, SurfaceError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = create_canvas_surface(&instance, canvas)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(SurfaceError::NoAdapter)?;

        let info = adapter.get_info();
        tracing::info!("Using GPU adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Box Mockup Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(SurfaceError::NoFormat)?;
        let view_format = format.add_srgb_suffix();
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: if view_format != format {
                vec![view_format]
            } else {
                Vec::new()
            },
        };
        surface.configure(&device, &config);

        let sample_count = resolve_sample_count(msaa_sample_count, |count| {
            adapter
                .get_texture_format_features(view_format)
                .flags
                .sample_count_supported(count)
        });
        tracing::info!(
            "Surface configured: {}x{}, format {:?}, view {:?}, {}x MSAA",
            config.width,
            config.height,
            format,
            view_format,
            sample_count
        );

        let renderer = Renderer::new(
            &device,
            &queue,
            view_format,
            config.width,
            config.height,
            sample_count,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            view_format,
            renderer,
        })
    }

    /// Reconfigure for a new physical size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width == self.config.width && height == self.config.height)
        {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.renderer.resize(&self.device, width, height);
        tracing::debug!("Surface resized to {}x{}", width, height);
    }

    /// Upload changes and draw one frame
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped, as
    /// is a timed-out acquire.
    pub fn draw(&mut self, frame: &mut Frame<'_>) -> Result<(), SurfaceError> {
        self.resize(frame.viewport.width, frame.viewport.height);
        self.renderer.prepare(&self.device, &self.queue, frame);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::debug!("Surface acquire timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(SurfaceError::Frame(e)),
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.view_format),
            ..Default::default()
        });
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        self.renderer.render(&mut encoder, &view);
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Destroy the renderer's GPU resources ahead of dropping
    pub fn release(&mut self) {
        self.renderer.release_resources();
    }
}

/// Draws a frame and reads the canvas back as a PNG data URL
pub struct CanvasExporter<'a> {
    pub gpu: &'a mut GpuSurface,
    pub canvas: &'a HtmlCanvasElement,
}

impl FrameExporter for CanvasExporter<'_> {
    type Error = SurfaceError;

    fn capture_png(&mut self, mut frame: Frame<'_>) -> Result<String, Self::Error> {
        self.gpu.draw(&mut frame)?;
        self.canvas
            .to_data_url_with_type("image/png")
            .map_err(|e| SurfaceError::Export(js_message(&e)))
    }
}

#[cfg(target_arch = "wasm32")]
fn create_canvas_surface(
    instance: &wgpu::Instance,
    canvas: HtmlCanvasElement,
) -> Result<wgpu::Surface<'static>, SurfaceError> {
    Ok(instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?)
}

#[cfg(not(target_arch = "wasm32"))]
fn create_canvas_surface(
    _instance: &wgpu::Instance,
    _canvas: HtmlCanvasElement,
) -> Result<wgpu::Surface<'static>, SurfaceError> {
    Err(SurfaceError::Unsupported)
}
