use super::camera_utils::{Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Perspective projection with a free-standing eye position
///
/// The camera looks down -Z from its position, with +Y up; this is the
/// default orientation of a camera that was only ever moved, never turned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view
    pub fovy: Deg<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    pub position: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera for PerspectiveCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let view = Matrix4::look_to_rh(self.position, -Vector3::unit_z(), self.up);
        let proj = OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl PerspectiveCamera {
    pub fn new(fovy: Deg<f32>, aspect: f32, znear: f32, zfar: f32) -> Self {
        Self {
            fovy,
            aspect,
            znear,
            zfar,
            position: Point3::origin(),
            up: Vector3::unit_y(),
        }
    }

    /// Aspect ratio taken from a viewport size in pixels
    ///
    /// A zero height is treated as one pixel so the ratio stays finite.
    pub fn aspect_for(width: u32, height: u32) -> f32 {
        width as f32 / height.max(1) as f32
    }

    pub fn for_viewport(fovy: Deg<f32>, width: u32, height: u32, znear: f32, zfar: f32) -> Self {
        Self::new(fovy, Self::aspect_for(width, height), znear, zfar)
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Point3::new(x, y, z);
        self
    }

    /// Recomputes the aspect ratio after the viewport changed
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = Self::aspect_for(width, height);
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_position: self.position.to_homogeneous().into(),
            view_proj: self.build_view_projection_matrix().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn aspect_follows_viewport() {
        let camera = PerspectiveCamera::for_viewport(Deg(75.0), 1920, 1080, 0.1, 1000.0);
        assert_relative_eq!(camera.aspect, 1.777_777_8, max_relative = 1e-6);

        for (w, h) in [(1, 1), (800, 600), (1080, 1920), (3440, 1440)] {
            let camera = PerspectiveCamera::for_viewport(Deg(75.0), w, h, 0.1, 1000.0);
            assert_relative_eq!(camera.aspect, w as f32 / h as f32);
        }
    }

    #[test]
    fn zero_size_resize_is_ignored() {
        let mut camera = PerspectiveCamera::for_viewport(Deg(75.0), 1200, 800, 0.1, 1000.0);
        camera.resize_projection(0, 600);
        assert_relative_eq!(camera.aspect, 1.5);
        camera.resize_projection(600, 600);
        assert_relative_eq!(camera.aspect, 1.0);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = PerspectiveCamera::for_viewport(Deg(75.0), 1920, 1080, 0.1, 1000.0)
            .with_position(0.0, 0.0, 5.0);
        let clip = camera.build_view_projection_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-6);
        // wgpu depth range is 0..1
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn points_behind_camera_are_clipped() {
        let camera = PerspectiveCamera::for_viewport(Deg(75.0), 800, 600, 0.1, 1000.0)
            .with_position(0.0, 0.0, 5.0);
        let clip = camera.build_view_projection_matrix() * Vector4::new(0.0, 0.0, 10.0, 1.0);
        assert!(clip.w < 0.0);
    }

    #[test]
    fn uniform_carries_eye_position() {
        let camera = PerspectiveCamera::new(Deg(75.0), 1.0, 0.1, 1000.0).with_position(0.0, 0.0, 5.0);
        assert_eq!(camera.uniform().view_position, [0.0, 0.0, 5.0, 1.0]);
    }
}
