//! Render pipeline management for wgpu
//!
//! Pipelines are registered by name with a [`PipelineConfig`] and created
//! lazily the first time they are requested.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::gfx::scene::vertex::Vertex3D;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("shader '{0}' not loaded")]
    MissingShader(String),

    #[error("pipeline '{0}' not registered")]
    UnknownPipeline(String),

    #[error("shader '{name}' failed validation: {message}")]
    InvalidShader { name: String, message: String },

    #[error("pipeline '{name}' failed validation: {message}")]
    InvalidPipeline { name: String, message: String },
}

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub primitive_topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub multisample: MultisampleState,
    pub color_targets: Vec<Option<ColorTargetState>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "shader.wgsl".to_string(),
            bind_group_layouts: Vec::new(),
            primitive_topology: PrimitiveTopology::TriangleList,
            cull_mode: Some(Face::Back),
            depth_format: None,
            multisample: MultisampleState::default(),
            color_targets: vec![Some(ColorTargetState {
                format: TextureFormat::Bgra8UnormSrgb,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
        }
    }
}

impl PipelineConfig {
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    /// Sets the shader for this pipeline (builder pattern)
    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_string();
        self
    }

    /// Sets all bind group layouts at once, in group order
    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    /// Enables depth testing against a buffer of the given format
    pub fn with_depth_format(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    /// Single opaque color target of the given format
    pub fn with_color_format(mut self, format: TextureFormat) -> Self {
        self.color_targets = vec![Some(ColorTargetState {
            format,
            blend: Some(BlendState::REPLACE),
            write_mask: ColorWrites::ALL,
        })];
        self
    }
}

/// Manages render pipelines with caching and lazy creation
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    shader_modules: HashMap<String, ShaderModule>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            shader_modules: HashMap::new(),
        }
    }

    /// Registers a pipeline configuration without creating it
    ///
    /// Registering under an existing name replaces the old pipeline.
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipelines.remove(name);
        self.pipeline_configs.insert(name.to_string(), config);
    }

    /// Compiles and validates a WGSL shader module
    pub fn load_shader(&mut self, name: &str, source: &str) -> Result<(), PipelineError> {
        self.device.push_error_scope(ErrorFilter::Validation);
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(PipelineError::InvalidShader {
                name: name.to_string(),
                message: error.to_string(),
            });
        }

        self.shader_modules.insert(name.to_string(), shader_module);
        Ok(())
    }

    /// Gets or creates a pipeline (lazy loading)
    pub fn get_pipeline(&mut self, name: &str) -> Result<&RenderPipeline, PipelineError> {
        if !self.pipelines.contains_key(name) {
            let config = self
                .pipeline_configs
                .get(name)
                .ok_or_else(|| PipelineError::UnknownPipeline(name.to_string()))?;
            let pipeline = self.create_pipeline_from_config(name, config)?;
            log::debug!("Created pipeline '{name}'");
            self.pipelines.insert(name.to_string(), pipeline);
        }

        self.pipelines
            .get(name)
            .ok_or_else(|| PipelineError::UnknownPipeline(name.to_string()))
    }

    /// Returns an already created pipeline without creating it
    pub fn pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    /// Creates every registered pipeline now
    pub fn create_all_pipelines(&mut self) -> Result<(), PipelineError> {
        let names: Vec<String> = self.pipeline_configs.keys().cloned().collect();
        for name in names {
            self.get_pipeline(&name)?;
        }
        Ok(())
    }

    fn create_pipeline_from_config(
        &self,
        name: &str,
        config: &PipelineConfig,
    ) -> Result<RenderPipeline, PipelineError> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| PipelineError::MissingShader(config.shader.clone()))?;

        // Validation errors are otherwise reported to the uncaptured-error
        // handler, which panics.
        self.device.push_error_scope(ErrorFilter::Validation);

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let pipeline = self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex3D::desc()],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &config.color_targets,
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: PrimitiveState {
                    topology: config.primitive_topology,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    cull_mode: config.cull_mode,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: config.multisample,
                multiview: None,
                cache: None,
            });

        match pollster::block_on(self.device.pop_error_scope()) {
            Some(error) => Err(PipelineError::InvalidPipeline {
                name: name.to_string(),
                message: error.to_string(),
            }),
            None => Ok(pipeline),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wgpu_utils::noop_device;

    const TRIANGLE: &str = r#"
        struct Tint { color: vec4<f32> };
        @group(0) @binding(0) var<uniform> tint: Tint;

        @vertex
        fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(position, 1.0) * tint.color.a;
        }

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return tint.color;
        }
    "#;

    fn tint_layout(device: &Device, visibility: ShaderStages) -> BindGroupLayout {
        device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Tint Layout"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    fn triangle_config(layout: BindGroupLayout) -> PipelineConfig {
        PipelineConfig::default()
            .with_label("TRIANGLE")
            .with_shader("triangle")
            .with_color_format(TextureFormat::Rgba8UnormSrgb)
            .with_bind_group_layouts(vec![layout])
    }

    #[test]
    fn valid_pipeline_is_created_lazily() {
        let (device, _queue) = noop_device();
        let layout = tint_layout(&device, ShaderStages::VERTEX | ShaderStages::FRAGMENT);
        let mut manager = PipelineManager::new(device);
        manager.load_shader("triangle", TRIANGLE).unwrap();
        manager.register_pipeline("Triangle", triangle_config(layout));

        assert!(manager.pipeline("Triangle").is_none());
        manager.create_all_pipelines().unwrap();
        assert!(manager.pipeline("Triangle").is_some());
    }

    #[test]
    fn stage_visibility_mismatch_is_an_error() {
        let (device, _queue) = noop_device();
        let layout = tint_layout(&device, ShaderStages::FRAGMENT);
        let mut manager = PipelineManager::new(device);
        manager.load_shader("triangle", TRIANGLE).unwrap();
        manager.register_pipeline("Triangle", triangle_config(layout));

        let err = manager.create_all_pipelines().unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPipeline { ref name, .. } if name == "Triangle"));
        assert!(manager.pipeline("Triangle").is_none());
    }

    #[test]
    fn broken_wgsl_is_rejected() {
        let (device, _queue) = noop_device();
        let mut manager = PipelineManager::new(device);
        let err = manager.load_shader("broken", "fn vs_main( {").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidShader { .. }));
    }

    #[test]
    fn unknown_names_are_reported() {
        let (device, _queue) = noop_device();
        let mut manager = PipelineManager::new(device);
        assert_eq!(
            manager.get_pipeline("Nope").unwrap_err(),
            PipelineError::UnknownPipeline("Nope".to_string())
        );

        manager.register_pipeline("Orphan", PipelineConfig::default().with_shader("missing"));
        assert_eq!(
            manager.get_pipeline("Orphan").unwrap_err(),
            PipelineError::MissingShader("missing".to_string())
        );
    }
}
