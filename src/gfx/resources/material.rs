//! Lambert (diffuse-only) material
//!
//! A material is a base color optionally modulated by a diffuse map. The GPU
//! side is one bind group: material uniform, map view, map sampler.

use std::sync::Arc;

use super::{texture::Texture, texture_resource::TextureResource};
use crate::wgpu_utils::UniformBuffer;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 4],
    /// UV scale applied before sampling the map
    pub repeat: [f32; 2],
    _padding: [f32; 2],
}

#[derive(Debug, Clone)]
pub struct LambertMaterial {
    pub color: [f32; 3],
    pub map: Option<Arc<Texture>>,
}

impl Default for LambertMaterial {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            map: None,
        }
    }
}

impl LambertMaterial {
    pub fn with_map(map: Arc<Texture>) -> Self {
        Self {
            map: Some(map),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.color = [r, g, b];
        self
    }

    pub fn uniform(&self) -> MaterialUniform {
        let repeat = self
            .map
            .as_ref()
            .map_or([1.0, 1.0], |map| map.options.repeat);
        MaterialUniform {
            color: [self.color[0], self.color[1], self.color[2], 1.0],
            repeat,
            _padding: [0.0; 2],
        }
    }
}

pub fn material_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Material Bind Group Layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// GPU resources backing one [`LambertMaterial`]
pub struct MaterialGpu {
    ubo: UniformBuffer<MaterialUniform>,
    /// Uploaded map, `None` when the shared white texture is bound instead
    _map: Option<TextureResource>,
    bind_group: wgpu::BindGroup,
}

impl MaterialGpu {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        material: &LambertMaterial,
        fallback: &TextureResource,
    ) -> Self {
        let ubo = UniformBuffer::new_with_data(device, &material.uniform());
        let map = material
            .map
            .as_ref()
            .map(|texture| TextureResource::from_texture(device, queue, texture));
        let bound = map.as_ref().unwrap_or(fallback);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&bound.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&bound.sampler),
                },
            ],
        });

        Self {
            ubo,
            _map: map,
            bind_group,
        }
    }

    /// Syncs color and repeat changes to the GPU
    pub fn update(&mut self, queue: &wgpu::Queue, material: &LambertMaterial) {
        self.ubo.update_content(queue, material.uniform());
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::texture::TextureOptions;

    #[test]
    fn uniform_carries_map_repeat() {
        let texture = Texture::from_rgba8(
            "tile",
            image::RgbaImage::new(1, 1),
            TextureOptions::tiled(2.0, 3.0),
        );
        let material = LambertMaterial::with_map(Arc::new(texture));
        assert_eq!(material.uniform().repeat, [2.0, 3.0]);
        assert_eq!(material.uniform().color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn untextured_material_uses_unit_repeat() {
        let material = LambertMaterial::default().with_color(0.2, 0.4, 0.6);
        let uniform = material.uniform();
        assert_eq!(uniform.repeat, [1.0, 1.0]);
        assert_eq!(uniform.color, [0.2, 0.4, 0.6, 1.0]);
        assert_eq!(std::mem::size_of::<MaterialUniform>() % 16, 0);
    }
}
