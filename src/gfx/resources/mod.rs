//! GPU resource management
//!
//! Textures (CPU and GPU side), the asynchronous texture loader, materials
//! and the global uniform bindings.

pub mod global_bindings;
pub mod material;
pub mod texture;
pub mod texture_loader;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{GlobalBindings, GlobalUBO, GlobalUBOContent};
pub use material::LambertMaterial;
pub use texture::{Texture, TextureOptions, WrapMode};
pub use texture_loader::{LoadStatus, PendingTexture, TextureLoader};
pub use texture_resource::TextureResource;
