//! Application configuration
//!
//! Every value has a default matching the stock scene, so a config file only
//! needs to list what it changes. Files are TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{animation::RotationStep, gfx::resources::texture::WrapMode};

/// Environment variable overriding [`CubeConfig::texture`]
pub const TEXTURE_ENV_VAR: &str = "TUMBLER_TEXTURE";

/// Serializable configuration loaded from disk
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a file, picking the format from the extension
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => {
                let contents = std::fs::read_to_string(path)?;
                Self::from_toml_str(&contents)
            }
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub viewport: ViewportConfig,
    pub camera: CameraConfig,
    pub cube: CubeConfig,
    pub lighting: LightingConfig,
    pub animation: AnimationConfig,
    pub render: RenderConfig,
}

impl Config for AppConfig {}

impl AppConfig {
    /// Applies environment overrides on top of the loaded values
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(texture) = std::env::var(TEXTURE_ENV_VAR) {
            if !texture.is_empty() {
                log::info!("Texture path overridden by {TEXTURE_ENV_VAR}: {texture}");
                self.cube.texture = PathBuf::from(texture);
            }
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "tumbler".to_string(),
            width: 1200,
            height: 800,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Follow window resizes. When false the startup size is kept for the
    /// camera aspect ratio and only the surface is reconfigured.
    pub track_resize: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { track_resize: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 0.0, 5.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    /// Edge length of the box along each axis
    pub size: [f32; 3],
    pub texture: PathBuf,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub repeat: [f32; 2],
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            size: [2.4, 2.4, 2.4],
            texture: PathBuf::from("assets/metal003.png"),
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            repeat: [2.0, 2.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub spot_color: [f32; 3],
    pub spot_intensity: f32,
    pub spot_position: [f32; 3],
    pub spot_target: [f32; 3],
    /// Half-angle of the cone in radians
    pub spot_angle: f32,
    pub spot_cast_shadow: bool,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 1.0,
            spot_color: [1.0, 1.0, 1.0],
            spot_intensity: 1.0,
            spot_position: [100.0, 1000.0, 1000.0],
            spot_target: [0.0, 0.0, 0.0],
            spot_angle: std::f32::consts::FRAC_PI_3,
            spot_cast_shadow: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepMode {
    /// Fixed increment every frame; speed follows the refresh rate
    #[default]
    PerFrame,
    /// Increment scaled by elapsed wall-clock time
    PerSecond,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub mode: StepMode,
    /// Radians per frame or per second, depending on `mode`
    pub radians: f32,
    /// Start the loop as soon as the mesh is available
    pub autostart: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            mode: StepMode::PerFrame,
            radians: 0.01,
            autostart: true,
        }
    }
}

impl AnimationConfig {
    pub fn step(&self) -> RotationStep {
        match self.mode {
            StepMode::PerFrame => RotationStep::PerFrame(self.radians),
            StepMode::PerSecond => RotationStep::PerSecond(self.radians),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Pace frames by the display refresh
    pub vsync: bool,
    pub clear_color: [f64; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}
