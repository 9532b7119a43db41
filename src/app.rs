use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::AppConfig,
    error::{Result, TumblerError},
    gfx::rendering::RenderEngine,
    stage::{PollOutcome, Stage},
};

/// How often the event loop wakes up to check on a loading texture
const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct TumblerApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    stage: Option<Stage>,
    last_frame: Option<Instant>,
    /// First fatal error; returned from [`TumblerApp::run`]
    error: Option<TumblerError>,
}

impl TumblerApp {
    /// Create the application; the window and renderer are created once the
    /// event loop is running
    pub fn new(config: AppConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                stage: None,
                last_frame: None,
                error: None,
            },
        })
    }

    /// Run the application until the window closes
    ///
    /// A texture that fails to load, or a host without a usable GPU, ends the
    /// loop and is returned here.
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Wait);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: TumblerError) {
        log::error!("{err}");
        if let Some(stage) = self.stage.as_mut() {
            stage.animation_mut().stop();
        }
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    fn request_redraw(&self) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key_code: KeyCode) {
        match key_code {
            KeyCode::Escape => {
                if let Some(stage) = self.stage.as_mut() {
                    stage.animation_mut().stop();
                }
                event_loop.exit();
            }
            KeyCode::Space => {
                let Some(stage) = self.stage.as_mut() else {
                    return;
                };
                stage.animation_mut().toggle_pause();
                log::info!("Animation {:?}", stage.animation().state());
                // Time spent paused does not count towards the next frame.
                self.last_frame = None;
                if stage.animation().schedules_next_frame() {
                    self.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(render_engine), Some(stage)) = (self.render_engine.as_mut(), self.stage.as_mut())
        else {
            return;
        };

        let now = Instant::now();
        let elapsed = self
            .last_frame
            .map(|last| now.duration_since(last))
            .unwrap_or_default();
        self.last_frame = Some(now);

        stage.frame(elapsed);

        let (scene, camera) = stage.view_mut();
        render_engine.prepare_scene(scene);
        match render_engine.render(scene, camera) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, TumblerError::OutOfMemory);
                return;
            }
            Err(e) => log::warn!("Frame dropped: {e}"),
        }

        if stage.animation().schedules_next_frame() {
            self.request_redraw();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        log::info!("Window created ({width}x{height})");

        let options = (&self.config.render).into();
        let renderer = match pollster::block_on(RenderEngine::new(window, width, height, options))
        {
            Ok(renderer) => renderer,
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        };
        self.render_engine = Some(renderer);

        let mut stage = Stage::new(self.config.clone(), (width, height));
        stage.begin_loading();
        self.stage = Some(stage);

        event_loop.set_control_flow(ControlFlow::wait_duration(LOAD_POLL_INTERVAL));
        // Lights-only frame while the texture loads
        self.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key_code),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(stage) = self.stage.as_mut() {
                    stage.resize(width, height);
                }
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                self.request_redraw();
            }
            WindowEvent::CloseRequested => {
                if let Some(stage) = self.stage.as_mut() {
                    stage.animation_mut().stop();
                }
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };

        match stage.poll_resources() {
            Ok(PollOutcome::Waiting) => {
                event_loop.set_control_flow(ControlFlow::wait_duration(LOAD_POLL_INTERVAL));
            }
            Ok(PollOutcome::Loaded(id)) => {
                log::info!("Cube {id:?} added to the scene");
                event_loop.set_control_flow(ControlFlow::Wait);
                self.last_frame = None;
                self.request_redraw();
            }
            Ok(PollOutcome::Idle) => event_loop.set_control_flow(ControlFlow::Wait),
            Err(e) => self.fail(event_loop, e),
        }
    }
}
