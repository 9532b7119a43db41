//! Asynchronous texture loading
//!
//! [`TextureLoader::load`] reads and decodes the image on a worker thread and
//! hands the result back through a oneshot channel. The main thread polls the
//! returned [`PendingTexture`] once per event loop turn; the completion is
//! observed exactly once, after which the handle reports [`LoadStatus::Consumed`].

use std::path::{Path, PathBuf};

use futures::channel::oneshot;

use super::texture::{Texture, TextureOptions};
use crate::error::{Result, TumblerError};

#[derive(Debug)]
pub enum LoadStatus {
    /// Still decoding
    Pending,
    /// Finished; returned exactly once
    Ready(Result<Texture>),
    /// The result was already handed out
    Consumed,
}

#[derive(Debug, Default)]
pub struct TextureLoader;

impl TextureLoader {
    pub fn new() -> Self {
        Self
    }

    /// Starts loading `path` in the background
    pub fn load(&self, path: impl Into<PathBuf>, options: TextureOptions) -> PendingTexture {
        let path = path.into();
        let (sender, receiver) = oneshot::channel();
        let worker_path = path.clone();

        let spawned = std::thread::Builder::new()
            .name("texture-loader".to_string())
            .spawn(move || {
                log::debug!("Decoding texture {}", worker_path.display());
                let result = Texture::from_path(&worker_path, options);
                // The receiver may already be gone if the app shut down.
                let _ = sender.send(result);
            });

        if let Err(e) = spawned {
            log::error!("Failed to spawn texture loader thread: {e}");
        }

        PendingTexture {
            path,
            receiver: Some(receiver),
        }
    }
}

#[derive(Debug)]
pub struct PendingTexture {
    path: PathBuf,
    receiver: Option<oneshot::Receiver<Result<Texture>>>,
}

impl PendingTexture {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check for completion
    pub fn poll(&mut self) -> LoadStatus {
        let Some(receiver) = self.receiver.as_mut() else {
            return LoadStatus::Consumed;
        };

        let status = match receiver.try_recv() {
            Ok(None) => return LoadStatus::Pending,
            Ok(Some(result)) => LoadStatus::Ready(result),
            Err(oneshot::Canceled) => LoadStatus::Ready(Err(TumblerError::LoaderDropped {
                path: self.path.clone(),
            })),
        };

        self.receiver = None;
        status
    }

    /// Blocks until the texture is decoded
    pub fn wait(mut self) -> Result<Texture> {
        let path = self.path.clone();
        match self.receiver.take() {
            Some(receiver) => pollster::block_on(receiver)
                .unwrap_or(Err(TumblerError::LoaderDropped { path })),
            None => Err(TumblerError::LoaderDropped { path }),
        }
    }

    pub fn is_consumed(&self) -> bool {
        self.receiver.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::texture::WrapMode;
    use std::time::{Duration, Instant};

    fn write_png(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("tumbler-{}-{name}.png", std::process::id()));
        image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 100, 50, 255]))
            .save(&path)
            .unwrap();
        path
    }

    fn poll_until_ready(pending: &mut PendingTexture) -> Result<Texture> {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            match pending.poll() {
                LoadStatus::Ready(result) => return result,
                LoadStatus::Pending => {
                    assert!(Instant::now() < deadline, "texture load timed out");
                    std::thread::sleep(Duration::from_millis(5));
                }
                LoadStatus::Consumed => panic!("completion observed twice"),
            }
        }
    }

    #[test]
    fn completion_is_observed_once() {
        let path = write_png("once");
        let mut pending = TextureLoader::new().load(&path, TextureOptions::tiled(2.0, 2.0));

        let texture = poll_until_ready(&mut pending).unwrap();
        assert_eq!(texture.dimensions(), (4, 4));
        assert_eq!(texture.options.wrap_s, WrapMode::Repeat);
        assert!(pending.is_consumed());
        assert!(matches!(pending.poll(), LoadStatus::Consumed));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_completes_with_error() {
        let mut pending = TextureLoader::new().load("definitely/missing.png", TextureOptions::default());
        let err = poll_until_ready(&mut pending).unwrap_err();
        assert!(matches!(err, TumblerError::TextureLoad { .. }));
    }

    #[test]
    fn wait_blocks_for_result() {
        let path = write_png("wait");
        let texture = TextureLoader::new()
            .load(&path, TextureOptions::default())
            .wait()
            .unwrap();
        assert_eq!(texture.image.get_pixel(0, 0).0, [200, 100, 50, 255]);
        let _ = std::fs::remove_file(path);
    }
}
