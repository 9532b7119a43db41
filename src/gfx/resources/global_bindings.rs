//! Global uniform bindings for camera and lighting
//!
//! One uniform buffer bound at group 0 in every pipeline, holding the camera
//! matrices and the collapsed [`LightEnvironment`].

use cgmath::InnerSpace;

use crate::{
    gfx::{camera::CameraUniform, scene::LightEnvironment},
    wgpu_utils::UniformBuffer,
};

/// MUST match the `Globals` struct in `lambert.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_proj: [[f32; 4]; 4],
    view_position: [f32; 4],
    /// rgb radiance, w unused
    ambient: [f32; 4],
    /// xyz position, w = 1 when a spot light is present
    spot_position: [f32; 4],
    /// xyz direction, w = cos(cone half-angle)
    spot_direction: [f32; 4],
    /// rgb radiance, w unused
    spot_color: [f32; 4],
}

impl GlobalUBOContent {
    pub fn new(camera: CameraUniform, lights: &LightEnvironment) -> Self {
        let a = lights.ambient;
        let (spot_position, spot_direction, spot_color) = match lights.spot {
            Some(spot) => {
                let p = spot.position;
                let d = spot.direction().normalize();
                let c = spot.radiance();
                (
                    [p.x, p.y, p.z, 1.0],
                    [d.x, d.y, d.z, spot.angle.cos()],
                    [c[0], c[1], c[2], 0.0],
                )
            }
            None => ([0.0; 4], [0.0, -1.0, 0.0, 1.0], [0.0; 4]),
        };

        Self {
            view_proj: camera.view_proj,
            view_position: camera.view_position,
            ambient: [a[0], a[1], a[2], 0.0],
            spot_position,
            spot_direction,
            spot_color,
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

pub struct GlobalBindings {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
