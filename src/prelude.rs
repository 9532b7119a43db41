//! # Tumbler Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use tumbler::prelude::*;
//!
//! let mut stage = Stage::new(AppConfig::default(), (1200, 800));
//! assert_eq!(stage.scene().light_count(), 2);
//! assert_eq!(stage.frame(std::time::Duration::ZERO), FrameOutcome::Halted);
//! ```

// Application and configuration
pub use crate::app::TumblerApp;
pub use crate::config::{AppConfig, Config};
pub use crate::error::{Result, TumblerError};
pub use crate::stage::{PollOutcome, Stage};

// Animation
pub use crate::animation::{AnimationLoop, FrameOutcome, LoopState, RotationStep};

// Scene model
pub use crate::gfx::camera::PerspectiveCamera;
pub use crate::gfx::geometry::{generate_box, GeometryData};
pub use crate::gfx::resources::{Texture, TextureOptions, WrapMode};
pub use crate::gfx::scene::{AmbientLight, LambertMaterial, Light, Mesh, MeshId, Scene, SpotLight};
