//! Error types shared across the crate
//!
//! Library code returns [`TumblerError`]; the binary wraps it in `anyhow`
//! at the top level.

use std::path::PathBuf;

use crate::config::ConfigError;

/// Convenience alias for results produced by this crate
pub type Result<T, E = TumblerError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum TumblerError {
    /// The texture file could not be read or decoded
    #[error("failed to load texture {}: {source}", path.display())]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The loader thread went away without delivering a result
    #[error("texture loader for {} was dropped before completing", path.display())]
    LoaderDropped { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to create window surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface has no supported texture format")]
    NoSurfaceFormat,

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] crate::gfx::rendering::pipeline_manager::PipelineError),

    #[error("GPU ran out of memory while presenting a frame")]
    OutOfMemory,
}
