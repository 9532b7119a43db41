//! # Graphics Module
//!
//! Everything between the scene model and the GPU.
//!
//! - **Camera** ([`camera`]) - perspective camera and its uniform
//! - **Geometry** ([`geometry`]) - procedural box geometry
//! - **Rendering** ([`rendering`]) - pipelines and the [`RenderEngine`]
//! - **Resources** ([`resources`]) - textures, materials, global bindings
//! - **Scene** ([`scene`]) - meshes and lights
//!
//! The scene model has no GPU state until [`RenderEngine::prepare_scene`]
//! uploads it, so scenes can be built and animated without a device.

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::PerspectiveCamera;
pub use rendering::render_engine::RenderEngine;
