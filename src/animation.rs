//! Frame-driven animation loop
//!
//! [`AnimationLoop`] owns an explicit handle to the mesh it animates and a
//! small state machine controlling whether frames advance. The application
//! asks [`AnimationLoop::schedules_next_frame`] after every frame to decide
//! whether to request another redraw, so pausing or stopping the loop stops
//! the redraw chain as well.

use std::time::Duration;

use cgmath::Rad;

use crate::gfx::scene::{MeshId, Scene};

/// How far the animated mesh turns on each axis per iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationStep {
    /// Fixed radians every frame, independent of elapsed time
    PerFrame(f32),
    /// Radians per second of wall-clock time
    PerSecond(f32),
}

impl RotationStep {
    /// Angle increment for a frame that took `elapsed`
    pub fn delta(&self, elapsed: Duration) -> Rad<f32> {
        match *self {
            RotationStep::PerFrame(radians) => Rad(radians),
            RotationStep::PerSecond(radians) => Rad(radians * elapsed.as_secs_f32()),
        }
    }
}

impl Default for RotationStep {
    fn default() -> Self {
        RotationStep::PerFrame(0.01)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Created, never started
    Idle,
    Running,
    Paused,
    /// Torn down; cannot be restarted
    Stopped,
}

/// Result of a single [`AnimationLoop::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The bound mesh was rotated
    Advanced,
    /// Running, but there is no mesh to animate yet
    Skipped,
    /// The loop is not running
    Halted,
}

#[derive(Debug)]
pub struct AnimationLoop {
    state: LoopState,
    target: Option<MeshId>,
    step: RotationStep,
    frames: u64,
    /// Set once a missing target has been reported
    target_missing: bool,
}

impl AnimationLoop {
    pub fn new(step: RotationStep) -> Self {
        Self {
            state: LoopState::Idle,
            target: None,
            step,
            frames: 0,
            target_missing: false,
        }
    }

    /// Sets the mesh the loop rotates
    pub fn bind(&mut self, mesh: MeshId) {
        self.target = Some(mesh);
        self.target_missing = false;
    }

    pub fn target(&self) -> Option<MeshId> {
        self.target
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn step(&self) -> RotationStep {
        self.step
    }

    /// Number of frames that actually rotated the mesh
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Starts or resumes the loop. Returns false once the loop is stopped.
    pub fn start(&mut self) -> bool {
        match self.state {
            LoopState::Idle | LoopState::Paused => {
                self.state = LoopState::Running;
                true
            }
            LoopState::Running => true,
            LoopState::Stopped => {
                log::warn!("Ignoring start request on a stopped animation loop");
                false
            }
        }
    }

    pub fn resume(&mut self) -> bool {
        self.start()
    }

    pub fn pause(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Paused;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            LoopState::Running => self.pause(),
            LoopState::Paused => {
                self.resume();
            }
            LoopState::Idle | LoopState::Stopped => {}
        }
    }

    /// Stops the loop for good
    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    /// Whether the caller should schedule another frame after this one
    pub fn schedules_next_frame(&self) -> bool {
        self.is_running()
    }

    /// Runs one iteration: rotates the bound mesh about X and Y
    pub fn tick(&mut self, scene: &mut Scene, elapsed: Duration) -> FrameOutcome {
        if !self.is_running() {
            return FrameOutcome::Halted;
        }

        let Some(id) = self.target else {
            return FrameOutcome::Skipped;
        };

        let Some(mesh) = scene.mesh_mut(id) else {
            if !self.target_missing {
                log::warn!("Animation target {id:?} is not in the scene; skipping frames");
                self.target_missing = true;
            }
            return FrameOutcome::Skipped;
        };
        self.target_missing = false;

        let delta = self.step.delta(elapsed);
        mesh.rotation.x += delta;
        mesh.rotation.y += delta;
        self.frames += 1;

        FrameOutcome::Advanced
    }
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new(RotationStep::default())
    }
}
