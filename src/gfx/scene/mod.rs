//! # Scene Management Module
//!
//! - [`Scene`] - container for meshes and lights
//! - [`Mesh`] - geometry + material with a transform
//! - [`Light`] - ambient and spot lights
//! - [`Vertex3D`] - GPU vertex format

pub mod light;
pub mod mesh;
pub mod scene;
pub mod vertex;

pub use crate::gfx::resources::material::LambertMaterial;
pub use light::{AmbientLight, Light, SpotLight};
pub use mesh::{DrawMesh, Mesh, MeshLayouts};
pub use scene::{LightEnvironment, MeshId, Scene, SceneStatistics};
pub use vertex::Vertex3D;
