//! WGPU-based rendering engine
//!
//! Owns the surface, device and queue, the Lambert pipeline, the depth
//! buffer and the global uniforms, and draws a [`Scene`] as seen by a
//! [`PerspectiveCamera`].

use std::sync::Arc;

use crate::{
    config::RenderConfig,
    error::{Result, TumblerError},
    gfx::{
        camera::PerspectiveCamera,
        resources::{
            global_bindings::{GlobalBindings, GlobalUBO, GlobalUBOContent},
            material::material_bind_group_layout,
            texture::{Texture, TextureOptions},
            texture_resource::TextureResource,
        },
        scene::{
            mesh::{transform_bind_group_layout, DrawMesh, MeshLayouts},
            Scene,
        },
    },
};

use super::pipeline_manager::{PipelineConfig, PipelineError, PipelineManager};

const LAMBERT_PIPELINE: &str = "Lambert";

/// Options fixed at renderer creation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Present in step with the display refresh
    pub vsync: bool,
    pub clear_color: wgpu::Color,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            vsync: true,
            clear_color: wgpu::Color::BLACK,
        }
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        let [r, g, b, a] = config.clear_color;
        Self {
            vsync: config.vsync,
            clear_color: wgpu::Color { r, g, b, a },
        }
    }
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    transform_layout: wgpu::BindGroupLayout,
    material_layout: wgpu::BindGroupLayout,
    /// 1x1 white map bound for untextured materials
    white_texture: TextureResource,
    clear_color: wgpu::Color,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Fails when the host has no usable graphics adapter or device.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        options: RenderOptions,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(TumblerError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: if options.vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let transform_layout = transform_bind_group_layout(&device);
        let material_layout = material_bind_group_layout(&device);

        let white = Texture::from_rgba8(
            "white",
            image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255])),
            TextureOptions::default(),
        );
        let white_texture = TextureResource::from_texture(&device, &queue, &white);

        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        register_lambert_pipeline(
            &mut pipeline_manager,
            format,
            [
                global_bindings.bind_group_layout(),
                &transform_layout,
                &material_layout,
            ],
        )?;
        pipeline_manager.create_all_pipelines()?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            pipeline_manager,
            global_ubo,
            global_bindings,
            transform_layout,
            material_layout,
            white_texture,
            clear_color: options.clear_color,
        })
    }

    /// Uploads buffers for meshes added since the last call and syncs
    /// every mesh transform
    pub fn prepare_scene(&mut self, scene: &mut Scene) {
        let layouts = MeshLayouts {
            transform: &self.transform_layout,
            material: &self.material_layout,
            fallback_map: &self.white_texture,
        };
        scene.init_gpu_resources(&self.device, &self.queue, &layouts);
        scene.update_gpu(&self.queue);
    }

    /// Draws one frame
    ///
    /// A lost or outdated surface is reconfigured and the frame dropped.
    /// `OutOfMemory` is handed back to the caller.
    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated; reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timed out; skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let Some(pipeline) = self.pipeline_manager.pipeline(LAMBERT_PIPELINE) else {
            log::error!("Lambert pipeline missing; skipping frame");
            return Ok(());
        };

        let content = GlobalUBOContent::new(camera.uniform(), &scene.light_environment());
        self.global_ubo.update_content(&self.queue, content);

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for mesh in scene.meshes().filter(|m| m.visible) {
                render_pass.draw_mesh(mesh);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero sizes (minimised windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }
}

/// Compiles the Lambert shader and registers its pipeline
///
/// `layouts` are the bind group layouts for groups 0 (globals), 1 (mesh
/// transform) and 2 (material), in that order.
fn register_lambert_pipeline(
    pipeline_manager: &mut PipelineManager,
    color_format: wgpu::TextureFormat,
    layouts: [&wgpu::BindGroupLayout; 3],
) -> std::result::Result<(), PipelineError> {
    pipeline_manager.load_shader("lambert", include_str!("lambert.wgsl"))?;
    pipeline_manager.register_pipeline(
        LAMBERT_PIPELINE,
        PipelineConfig::default()
            .with_label("LAMBERT")
            .with_shader("lambert")
            .with_color_format(color_format)
            .with_depth_format(TextureResource::DEPTH_FORMAT)
            .with_bind_group_layouts(layouts.into_iter().cloned().collect()),
    );
    Ok(())
}
