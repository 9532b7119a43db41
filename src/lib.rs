//! Tumbler
//!
//! A textured, lit cube tumbling in front of a perspective camera, drawn
//! with wgpu inside a winit window.
//!
//! The crate is split along the data flow:
//! - [`config`] - TOML configuration with defaults for the stock scene
//! - [`stage`] - scene, camera, animation loop and the pending texture
//! - [`animation`] - the per-frame rotation loop
//! - [`gfx`] - scene model, GPU resources and the render engine
//! - [`app`] - window and event loop

pub mod animation;
pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod stage;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::TumblerApp;
pub use error::{Result, TumblerError};

/// Runs the stock scene with configuration defaults
pub fn run_default() -> Result<()> {
    TumblerApp::new(config::AppConfig::default().with_env_overrides())?.run()
}
