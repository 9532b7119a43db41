//! CPU-side textures
//!
//! A [`Texture`] is a decoded RGBA8 image plus the sampling parameters the
//! material needs: wrap mode per axis and a repeat factor. GPU upload lives in
//! [`super::texture_resource`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TumblerError};

/// How texture coordinates outside 0..1 are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    /// Tile the image
    #[default]
    Repeat,
    /// Tile the image, flipping every other copy
    MirrorRepeat,
    /// Stretch the edge texels
    ClampToEdge,
}

impl From<WrapMode> for wgpu::AddressMode {
    fn from(mode: WrapMode) -> Self {
        match mode {
            WrapMode::Repeat => wgpu::AddressMode::Repeat,
            WrapMode::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
            WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        }
    }
}

/// Sampling parameters applied to a loaded image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureOptions {
    /// Horizontal (u) wrap
    pub wrap_s: WrapMode,
    /// Vertical (v) wrap
    pub wrap_t: WrapMode,
    /// How many times the image fits across each axis of a face
    pub repeat: [f32; 2],
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            wrap_s: WrapMode::ClampToEdge,
            wrap_t: WrapMode::ClampToEdge,
            repeat: [1.0, 1.0],
        }
    }
}

impl TextureOptions {
    /// Tiles the image `u` × `v` times with repeat wrapping on both axes
    pub fn tiled(u: f32, v: f32) -> Self {
        Self {
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            repeat: [u, v],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Texture {
    pub label: String,
    pub image: image::RgbaImage,
    pub options: TextureOptions,
}

impl Texture {
    pub fn from_rgba8(label: &str, image: image::RgbaImage, options: TextureOptions) -> Self {
        Self {
            label: label.to_string(),
            image,
            options,
        }
    }

    /// Decodes an encoded image (PNG, JPEG) from memory
    pub fn from_bytes(label: &str, bytes: &[u8], options: TextureOptions) -> image::ImageResult<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self::from_rgba8(label, image, options))
    }

    /// Reads and decodes an image file
    pub fn from_path(path: &Path, options: TextureOptions) -> Result<Self> {
        let image = image::open(path)
            .map_err(|source| TumblerError::TextureLoad {
                path: PathBuf::from(path),
                source,
            })?
            .to_rgba8();
        Ok(Self::from_rgba8(&path.display().to_string(), image, options))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_modes_map_to_address_modes() {
        assert_eq!(wgpu::AddressMode::from(WrapMode::Repeat), wgpu::AddressMode::Repeat);
        assert_eq!(
            wgpu::AddressMode::from(WrapMode::MirrorRepeat),
            wgpu::AddressMode::MirrorRepeat
        );
        assert_eq!(
            wgpu::AddressMode::from(WrapMode::ClampToEdge),
            wgpu::AddressMode::ClampToEdge
        );
    }

    #[test]
    fn decodes_png_bytes() {
        let mut encoded = Vec::new();
        image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]))
            .write_to(&mut std::io::Cursor::new(&mut encoded), image::ImageFormat::Png)
            .unwrap();

        let texture = Texture::from_bytes("inline", &encoded, TextureOptions::tiled(2.0, 2.0)).unwrap();
        assert_eq!(texture.dimensions(), (3, 2));
        assert_eq!(texture.image.get_pixel(2, 1).0, [10, 20, 30, 255]);
        assert_eq!(texture.options.repeat, [2.0, 2.0]);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(Texture::from_bytes("junk", b"not an image", TextureOptions::default()).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Texture::from_path(Path::new("no/such/texture.png"), TextureOptions::default())
            .unwrap_err();
        match err {
            TumblerError::TextureLoad { path, .. } => {
                assert_eq!(path, PathBuf::from("no/such/texture.png"))
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
