//! Core rendering functionality
//!
//! Handles render pipelines, GPU resource management, and frame rendering.

pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineError, PipelineManager};
pub use render_engine::{RenderEngine, RenderOptions};
