//! CPU-side world state
//!
//! The [`Stage`] owns everything the app animates: the scene, the camera, the
//! animation loop and the texture that is still loading. It has no GPU
//! dependency; the renderer only reads from it.

use std::{sync::Arc, time::Duration};

use cgmath::{Deg, Point3};

use crate::{
    animation::{AnimationLoop, FrameOutcome},
    config::{AppConfig, CubeConfig, LightingConfig},
    error::Result,
    gfx::{
        camera::PerspectiveCamera,
        geometry::generate_box,
        resources::{
            texture::{Texture, TextureOptions},
            texture_loader::{LoadStatus, PendingTexture, TextureLoader},
        },
        scene::{AmbientLight, LambertMaterial, Mesh, MeshId, Scene, SpotLight},
    },
};

/// What [`Stage::poll_resources`] observed this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The texture is still loading
    Waiting,
    /// The texture arrived and the cube was added to the scene
    Loaded(MeshId),
    /// Nothing is loading
    Idle,
}

pub struct Stage {
    config: AppConfig,
    scene: Scene,
    camera: PerspectiveCamera,
    animation: AnimationLoop,
    loader: TextureLoader,
    pending: Option<PendingTexture>,
    cube: Option<MeshId>,
}

impl Stage {
    /// Builds the lit scene and camera for a viewport of `width` × `height`
    /// pixels. The cube is added later, once its texture has loaded.
    pub fn new(config: AppConfig, (width, height): (u32, u32)) -> Self {
        let mut scene = Scene::new();
        let (ambient, spot) = build_lights(&config.lighting);
        scene.add_light(ambient);
        scene.add_light(spot);

        let [x, y, z] = config.camera.position;
        let camera = PerspectiveCamera::for_viewport(
            Deg(config.camera.fov_degrees),
            width,
            height,
            config.camera.near,
            config.camera.far,
        )
        .with_position(x, y, z);

        let animation = AnimationLoop::new(config.animation.step());

        Self {
            config,
            scene,
            camera,
            animation,
            loader: TextureLoader::new(),
            pending: None,
            cube: None,
        }
    }

    /// Starts loading the cube texture. Later calls are ignored.
    pub fn begin_loading(&mut self) {
        if self.pending.is_some() || self.cube.is_some() {
            log::debug!("Texture load already requested");
            return;
        }

        let cube = &self.config.cube;
        let options = TextureOptions {
            wrap_s: cube.wrap_s,
            wrap_t: cube.wrap_t,
            repeat: cube.repeat,
        };
        log::info!("Loading texture {}", cube.texture.display());
        self.pending = Some(self.loader.load(cube.texture.clone(), options));
    }

    /// Checks the pending texture without blocking
    ///
    /// On the single successful completion the cube is built, added to the
    /// scene and the animation loop is bound to it (and started when
    /// `animation.autostart` is set). A failed load is returned as an error
    /// and leaves the scene with its lights only.
    pub fn poll_resources(&mut self) -> Result<PollOutcome> {
        let Some(pending) = self.pending.as_mut() else {
            return Ok(PollOutcome::Idle);
        };

        match pending.poll() {
            LoadStatus::Pending => Ok(PollOutcome::Waiting),
            LoadStatus::Consumed => {
                self.pending = None;
                Ok(PollOutcome::Idle)
            }
            LoadStatus::Ready(result) => {
                let path = pending.path().to_path_buf();
                self.pending = None;

                let texture = result.inspect_err(|e| {
                    log::error!("Texture {} failed to load: {e}", path.display());
                })?;

                let (w, h) = texture.dimensions();
                log::info!("Texture {} loaded ({w}x{h})", path.display());

                let id = self.scene.add_mesh(build_cube_mesh(texture, &self.config.cube));
                let stats = self.scene.get_statistics();
                log::info!(
                    "Scene ready: {} mesh(es), {} light(s), {} triangles, {} vertices",
                    stats.mesh_count,
                    stats.light_count,
                    stats.total_triangles,
                    stats.total_vertices
                );
                self.cube = Some(id);
                self.animation.bind(id);
                if self.config.animation.autostart {
                    self.animation.start();
                }
                Ok(PollOutcome::Loaded(id))
            }
        }
    }

    /// Runs one animation iteration
    pub fn frame(&mut self, elapsed: Duration) -> FrameOutcome {
        self.animation.tick(&mut self.scene, elapsed)
    }

    /// Follows a viewport resize when `viewport.track_resize` is enabled
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.config.viewport.track_resize {
            return;
        }
        self.camera.resize_projection(width, height);
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Scene and camera borrowed together for rendering
    pub fn view_mut(&mut self) -> (&mut Scene, &PerspectiveCamera) {
        (&mut self.scene, &self.camera)
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn animation(&self) -> &AnimationLoop {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut AnimationLoop {
        &mut self.animation
    }

    /// The cube, once its texture has loaded
    pub fn cube(&self) -> Option<MeshId> {
        self.cube
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}

/// Ambient and spot light as configured
pub fn build_lights(config: &LightingConfig) -> (AmbientLight, SpotLight) {
    let ambient = AmbientLight {
        intensity: config.ambient_intensity,
        ..AmbientLight::new(config.ambient_color)
    };

    let [x, y, z] = config.spot_position;
    let [tx, ty, tz] = config.spot_target;
    let spot = SpotLight {
        intensity: config.spot_intensity,
        target: Point3::new(tx, ty, tz),
        angle: config.spot_angle,
        ..SpotLight::new(config.spot_color)
    }
    .with_position(x, y, z)
    .with_cast_shadow(config.spot_cast_shadow);

    (ambient, spot)
}

/// Box mesh of the configured size with `texture` as its diffuse map
pub fn build_cube_mesh(texture: Texture, config: &CubeConfig) -> Mesh {
    let [width, height, depth] = config.size;
    Mesh::new(
        generate_box(width, height, depth),
        LambertMaterial::with_map(Arc::new(texture)),
    )
    .with_name("cube")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        animation::LoopState,
        gfx::{resources::texture::WrapMode, scene::Light},
    };
    use approx::assert_relative_eq;
    use std::path::PathBuf;

    fn write_png(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("tumbler-stage-{}-{name}.png", std::process::id()));
        image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 100, 50, 255]))
            .save(&path)
            .unwrap();
        path
    }

    fn config_with_texture(path: PathBuf) -> AppConfig {
        let mut config = AppConfig::default();
        config.cube.texture = path;
        config
    }

    fn poll_until_done(stage: &mut Stage) -> Result<PollOutcome> {
        for _ in 0..500 {
            match stage.poll_resources()? {
                PollOutcome::Waiting => std::thread::sleep(Duration::from_millis(5)),
                outcome => return Ok(outcome),
            }
        }
        panic!("texture never finished loading");
    }

    #[test]
    fn starts_with_lights_only() {
        let stage = Stage::new(AppConfig::default(), (1200, 800));
        assert_eq!(stage.scene().mesh_count(), 0);
        assert_eq!(stage.scene().light_count(), 2);
        assert_eq!(stage.cube(), None);
        assert_eq!(stage.animation().state(), LoopState::Idle);
    }

    #[test]
    fn camera_follows_viewport() {
        let stage = Stage::new(AppConfig::default(), (1920, 1080));
        let camera = stage.camera();
        assert_relative_eq!(camera.aspect, 1.7777778, max_relative = 1e-6);
        assert_eq!(camera.fovy, Deg(75.0));
        assert_eq!(camera.znear, 0.1);
        assert_eq!(camera.zfar, 1000.0);
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn resize_respects_tracking_switch() {
        let mut stage = Stage::new(AppConfig::default(), (800, 800));
        stage.resize(1600, 800);
        assert_relative_eq!(stage.camera().aspect, 2.0);

        let mut config = AppConfig::default();
        config.viewport.track_resize = false;
        let mut fixed = Stage::new(config, (800, 800));
        fixed.resize(1600, 800);
        assert_relative_eq!(fixed.camera().aspect, 1.0);
    }

    #[test]
    fn lights_match_configuration() {
        let (ambient, spot) = build_lights(&LightingConfig::default());
        assert_eq!(ambient.color, [1.0, 1.0, 1.0]);
        assert_eq!(spot.position, Point3::new(100.0, 1000.0, 1000.0));
        assert_eq!(spot.target, Point3::new(0.0, 0.0, 0.0));
        assert!(spot.cast_shadow);

        let stage = Stage::new(AppConfig::default(), (10, 10));
        assert!(matches!(stage.scene().lights()[0], Light::Ambient(_)));
        assert!(matches!(stage.scene().lights()[1], Light::Spot(_)));
    }

    #[test]
    fn idle_before_loading() {
        let mut stage = Stage::new(AppConfig::default(), (10, 10));
        assert_eq!(stage.poll_resources().unwrap(), PollOutcome::Idle);
        assert_eq!(stage.frame(Duration::from_millis(16)), FrameOutcome::Halted);
    }

    #[test]
    fn loaded_texture_adds_cube_once() {
        let path = write_png("once");
        let mut stage = Stage::new(config_with_texture(path.clone()), (1200, 800));
        stage.begin_loading();
        stage.begin_loading();
        assert!(stage.is_loading());

        let PollOutcome::Loaded(id) = poll_until_done(&mut stage).unwrap() else {
            panic!("expected the cube to load");
        };
        assert_eq!(stage.cube(), Some(id));
        assert_eq!(stage.scene().object_count(), 3);
        assert!(stage.animation().is_running());

        assert_eq!(stage.poll_resources().unwrap(), PollOutcome::Idle);
        stage.begin_loading();
        assert!(!stage.is_loading());
        for _ in 0..5 {
            stage.frame(Duration::from_millis(16));
        }
        assert_eq!(stage.scene().object_count(), 3);

        let rotation = stage.scene().mesh(id).unwrap().rotation;
        assert_relative_eq!(rotation.x.0, 0.05, max_relative = 1e-5);
        assert_relative_eq!(rotation.y.0, 0.05, max_relative = 1e-5);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn cube_texture_tiles_twice() {
        let path = write_png("tiles");
        let mut stage = Stage::new(config_with_texture(path.clone()), (10, 10));
        stage.begin_loading();
        let PollOutcome::Loaded(id) = poll_until_done(&mut stage).unwrap() else {
            panic!("expected the cube to load");
        };

        let mesh = stage.scene().mesh(id).unwrap();
        let map = mesh.material.map.as_ref().unwrap();
        assert_eq!(map.options.wrap_s, WrapMode::Repeat);
        assert_eq!(map.options.wrap_t, WrapMode::Repeat);
        assert_eq!(map.options.repeat, [2.0, 2.0]);
        assert_eq!(map.dimensions(), (4, 4));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn failed_load_keeps_lights_only() {
        let missing = std::env::temp_dir().join("tumbler-stage-does-not-exist.png");
        let mut stage = Stage::new(config_with_texture(missing), (10, 10));
        stage.begin_loading();

        assert!(poll_until_done(&mut stage).is_err());
        assert_eq!(stage.scene().object_count(), 2);
        assert_eq!(stage.cube(), None);
        assert!(!stage.animation().is_running());
        assert_eq!(stage.poll_resources().unwrap(), PollOutcome::Idle);
    }

    #[test]
    fn autostart_can_be_disabled() {
        let path = write_png("manual");
        let mut config = config_with_texture(path.clone());
        config.animation.autostart = false;
        let mut stage = Stage::new(config, (10, 10));
        stage.begin_loading();
        poll_until_done(&mut stage).unwrap();

        assert_eq!(stage.animation().state(), LoopState::Idle);
        assert!(stage.animation().target().is_some());

        let _ = std::fs::remove_file(path);
    }
}
