//! Scene lights
//!
//! Two kinds are supported: an ambient term that lights every surface evenly
//! and a spot light shining a cone from a position towards a target.

use cgmath::{InnerSpace, Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(color: [f32; 3]) -> Self {
        Self {
            color,
            intensity: 1.0,
        }
    }

    pub fn radiance(&self) -> [f32; 3] {
        self.color.map(|c| c * self.intensity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    /// Half-angle of the cone in radians
    pub angle: f32,
    /// Recorded for completeness; nothing in the scene receives shadows
    pub cast_shadow: bool,
}

impl SpotLight {
    pub fn new(color: [f32; 3]) -> Self {
        Self {
            color,
            intensity: 1.0,
            position: Point3::new(0.0, 1.0, 0.0),
            target: Point3::new(0.0, 0.0, 0.0),
            angle: std::f32::consts::FRAC_PI_3,
            cast_shadow: false,
        }
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Point3::new(x, y, z);
        self
    }

    pub fn with_cast_shadow(mut self, cast_shadow: bool) -> Self {
        self.cast_shadow = cast_shadow;
        self
    }

    /// Unit vector from the light towards its target
    pub fn direction(&self) -> Vector3<f32> {
        let dir = self.target - self.position;
        if dir.magnitude2() > 0.0 {
            dir.normalize()
        } else {
            -Vector3::unit_y()
        }
    }

    pub fn radiance(&self) -> [f32; 3] {
        self.color.map(|c| c * self.intensity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient(AmbientLight),
    Spot(SpotLight),
}

impl From<AmbientLight> for Light {
    fn from(light: AmbientLight) -> Self {
        Light::Ambient(light)
    }
}

impl From<SpotLight> for Light {
    fn from(light: SpotLight) -> Self {
        Light::Spot(light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn spot_direction_points_at_target() {
        let spot = SpotLight::new([1.0; 3]).with_position(0.0, 0.0, 10.0);
        let dir = spot.direction();
        assert_relative_eq!(dir.z, -1.0);
        assert_relative_eq!(dir.magnitude(), 1.0);
    }

    #[test]
    fn degenerate_spot_points_down() {
        let spot = SpotLight::new([1.0; 3]).with_position(0.0, 0.0, 0.0);
        assert_eq!(spot.direction(), Vector3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn radiance_scales_color() {
        let ambient = AmbientLight {
            color: [1.0, 0.5, 0.0],
            intensity: 0.5,
        };
        assert_eq!(ambient.radiance(), [0.5, 0.25, 0.0]);
    }
}
