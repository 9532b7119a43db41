use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use approx::assert_relative_eq;
use tumbler::prelude::*;

fn texture_fixture(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("tumbler-it-{}-{name}.png", std::process::id()));
    let mut image = image::RgbaImage::new(8, 8);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let on = (x / 4 + y / 4) % 2 == 0;
        *pixel = if on {
            image::Rgba([180, 180, 190, 255])
        } else {
            image::Rgba([60, 60, 70, 255])
        };
    }
    image.save(&path).unwrap();
    path
}

fn load(stage: &mut Stage) -> tumbler::Result<PollOutcome> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        match stage.poll_resources()? {
            PollOutcome::Waiting if Instant::now() < deadline => {
                std::thread::sleep(Duration::from_millis(2))
            }
            outcome => return Ok(outcome),
        }
    }
}

#[test]
fn cube_tumbles_once_texture_is_loaded() {
    let path = texture_fixture("tumble");
    let mut config = AppConfig::default();
    config.cube.texture = path.clone();

    let mut stage = Stage::new(config, (1920, 1080));
    assert_relative_eq!(stage.camera().aspect, 1920.0 / 1080.0);

    // Frames before the load neither advance nor create anything
    assert_eq!(stage.frame(Duration::from_millis(16)), FrameOutcome::Halted);
    assert_eq!(stage.scene().object_count(), 2);

    stage.begin_loading();
    let PollOutcome::Loaded(cube) = load(&mut stage).unwrap() else {
        panic!("texture did not load");
    };
    assert_eq!(stage.scene().object_count(), 3);

    let mesh = stage.scene().mesh(cube).unwrap();
    let map = mesh.material.map.as_ref().unwrap();
    assert_eq!(map.options, TextureOptions::tiled(2.0, 2.0));
    assert_eq!(map.options.wrap_s, WrapMode::Repeat);
    assert_eq!(map.options.wrap_t, WrapMode::Repeat);
    assert_eq!(mesh.geometry.vertex_count(), 24);
    assert_eq!(mesh.geometry.indices.len(), 36);

    for _ in 0..250 {
        assert_eq!(stage.frame(Duration::from_millis(16)), FrameOutcome::Advanced);
    }
    assert!(stage.animation().schedules_next_frame());
    assert_eq!(stage.scene().object_count(), 3);

    let rotation = stage.scene().mesh(cube).unwrap().rotation;
    assert_relative_eq!(rotation.x.0, 2.5, max_relative = 1e-3);
    assert_relative_eq!(rotation.y.0, 2.5, max_relative = 1e-3);
    assert_eq!(rotation.z.0, 0.0);

    stage.animation_mut().stop();
    assert!(!stage.animation().schedules_next_frame());
    assert_eq!(stage.frame(Duration::from_millis(16)), FrameOutcome::Halted);

    let _ = std::fs::remove_file(path);
}

#[test]
fn missing_texture_is_reported() {
    let mut config = AppConfig::default();
    config.cube.texture = PathBuf::from("definitely/not/here/metal003.png");

    let mut stage = Stage::new(config, (1200, 800));
    stage.begin_loading();

    let err = load(&mut stage).unwrap_err();
    assert!(matches!(err, TumblerError::TextureLoad { .. }));
    assert!(err.to_string().contains("metal003.png"));
    assert_eq!(stage.scene().mesh_count(), 0);
    assert_eq!(stage.scene().light_count(), 2);
}

#[test]
fn config_file_drives_the_stage() {
    let path = std::env::temp_dir().join(format!("tumbler-it-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        r#"
        [camera]
        fov_degrees = 60.0

        [animation]
        mode = "per_second"
        radians = 1.0
        autostart = false
        "#,
    )
    .unwrap();

    let config = AppConfig::load_from_file(&path).unwrap();
    let stage = Stage::new(config, (800, 600));
    assert_eq!(stage.camera().fovy, cgmath::Deg(60.0));
    assert_eq!(stage.animation().step(), RotationStep::PerSecond(1.0));
    assert_eq!(stage.config().cube.repeat, [2.0, 2.0]);

    let _ = std::fs::remove_file(path);
}
