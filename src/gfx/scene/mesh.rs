use cgmath::{Euler, Matrix4, Rad, Vector3, Zero};
use wgpu::util::DeviceExt;

use crate::{
    gfx::{
        geometry::GeometryData,
        resources::{
            material::{LambertMaterial, MaterialGpu},
            texture_resource::TextureResource,
        },
    },
    wgpu_utils::UniformBuffer,
};

/// Per-mesh uniform: the model matrix
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    pub model: [[f32; 4]; 4],
}

/// Layouts a mesh needs to build its bind groups
pub struct MeshLayouts<'a> {
    pub transform: &'a wgpu::BindGroupLayout,
    pub material: &'a wgpu::BindGroupLayout,
    /// Bound when the material has no map
    pub fallback_map: &'a TextureResource,
}

pub struct MeshGpuResources {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    transform_ubo: UniformBuffer<MeshUniform>,
    transform_bind_group: wgpu::BindGroup,
    material: MaterialGpu,
}

/// A renderable object: geometry plus surface appearance, with its own
/// position and Euler rotation
pub struct Mesh {
    pub name: String,
    pub geometry: GeometryData,
    pub material: LambertMaterial,
    pub position: Vector3<f32>,
    /// Applied in X, Y, Z order
    pub rotation: Euler<Rad<f32>>,
    pub visible: bool,
    gpu_resources: Option<MeshGpuResources>,
}

impl Mesh {
    pub fn new(geometry: GeometryData, material: LambertMaterial) -> Self {
        Self {
            name: "Mesh".to_string(),
            geometry,
            material,
            position: Vector3::zero(),
            rotation: Euler::new(Rad(0.0), Rad(0.0), Rad(0.0)),
            visible: true,
            gpu_resources: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Model matrix: translation * Rx * Ry * Rz
    pub fn transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(self.rotation.x)
            * Matrix4::from_angle_y(self.rotation.y)
            * Matrix4::from_angle_z(self.rotation.z)
    }

    pub fn uniform(&self) -> MeshUniform {
        MeshUniform {
            model: self.transform().into(),
        }
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.gpu_resources.is_some()
    }

    /// Uploads geometry and creates transform/material bind groups
    pub fn init_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layouts: &MeshLayouts<'_>,
    ) {
        let vertices = self.geometry.to_vertices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", self.name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let transform_ubo = UniformBuffer::new_with_data(device, &self.uniform());
        let transform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transform Bind Group"),
            layout: layouts.transform,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_ubo.binding_resource(),
            }],
        });

        let material = MaterialGpu::new(
            device,
            queue,
            layouts.material,
            &self.material,
            layouts.fallback_map,
        );

        log::debug!(
            "Uploaded mesh '{}': {} vertices, {} triangles",
            self.name,
            vertices.len(),
            self.geometry.triangle_count()
        );

        self.gpu_resources = Some(MeshGpuResources {
            vertex_buffer,
            index_buffer,
            index_count: self.geometry.indices.len() as u32,
            transform_ubo,
            transform_bind_group,
            material,
        });
    }

    /// Syncs the current transform and material to the GPU
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        let uniform = self.uniform();
        if let Some(gpu) = self.gpu_resources.as_mut() {
            gpu.transform_ubo.update_content(queue, uniform);
            gpu.material.update(queue, &self.material);
        }
    }
}

pub fn transform_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Transform Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

pub trait DrawMesh<'a> {
    /// Binds the mesh's transform (group 1) and material (group 2) and draws it
    fn draw_mesh(&mut self, mesh: &'a Mesh);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        let Some(gpu) = mesh.gpu_resources.as_ref() else {
            return; // Not uploaded yet
        };

        self.set_bind_group(1, &gpu.transform_bind_group, &[]);
        self.set_bind_group(2, gpu.material.bind_group(), &[]);
        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        self.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..gpu.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;
    use approx::assert_relative_eq;
    use cgmath::{SquareMatrix, Vector4};

    #[test]
    fn new_mesh_has_identity_transform() {
        let mesh = Mesh::new(generate_cube(), LambertMaterial::default());
        assert_eq!(mesh.transform(), Matrix4::identity());
        assert!(!mesh.has_gpu_resources());
    }

    #[test]
    fn rotation_about_x_then_y() {
        let mut mesh = Mesh::new(generate_cube(), LambertMaterial::default());
        mesh.rotation.y = Rad(std::f32::consts::FRAC_PI_2);

        // +X rotates onto -Z under a quarter turn about Y
        let rotated = mesh.transform() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(rotated.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn translation_is_applied_last() {
        let mut mesh = Mesh::new(generate_cube(), LambertMaterial::default());
        mesh.position = Vector3::new(0.0, 2.0, 0.0);
        mesh.rotation.x = Rad(std::f32::consts::PI);
        let moved = mesh.transform() * Vector4::new(0.0, 1.0, 0.0, 1.0);
        assert_relative_eq!(moved.y, 1.0, epsilon = 1e-6);
    }
}
