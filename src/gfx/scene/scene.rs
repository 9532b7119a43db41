use crate::gfx::scene::{
    light::{AmbientLight, Light, SpotLight},
    mesh::{Mesh, MeshLayouts},
};

/// Stable handle to a mesh inside a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

/// Lighting reduced to what the shader consumes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightEnvironment {
    /// Sum of all ambient lights
    pub ambient: [f32; 3],
    pub spot: Option<SpotLight>,
}

/// The set of renderable meshes and lights composing the world
///
/// Objects are only ever added, so a [`MeshId`] stays valid for the
/// lifetime of the scene.
#[derive(Default)]
pub struct Scene {
    meshes: Vec<Mesh>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        log::debug!("Adding mesh '{}' to scene", mesh.name);
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    /// Adds a light. Only the first spot light is rendered; later ones are
    /// reported when added and otherwise ignored.
    pub fn add_light(&mut self, light: impl Into<Light>) {
        let light = light.into();
        if matches!(light, Light::Spot(_)) && self.has_spot_light() {
            log::warn!("Only one spot light is rendered; ignoring the extra one");
        }
        self.lights.push(light);
    }

    fn has_spot_light(&self) -> bool {
        self.lights.iter().any(|l| matches!(l, Light::Spot(_)))
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.get_mut(id.0)
    }

    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Meshes plus lights
    pub fn object_count(&self) -> usize {
        self.meshes.len() + self.lights.len()
    }

    /// Collapses the light list: ambient lights add up, the first spot light
    /// wins.
    pub fn light_environment(&self) -> LightEnvironment {
        let mut ambient = [0.0f32; 3];
        let mut spot = None;

        for light in &self.lights {
            match light {
                Light::Ambient(a) => {
                    let radiance = a.radiance();
                    for (total, c) in ambient.iter_mut().zip(radiance) {
                        *total += c;
                    }
                }
                Light::Spot(s) if spot.is_none() => spot = Some(*s),
                Light::Spot(_) => {}
            }
        }

        LightEnvironment { ambient, spot }
    }

    /// Uploads meshes added since the last call
    pub fn init_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layouts: &MeshLayouts<'_>,
    ) {
        for mesh in self.meshes.iter_mut().filter(|m| !m.has_gpu_resources()) {
            mesh.init_gpu_resources(device, queue, layouts);
        }
    }

    /// Syncs every mesh's transform and material to the GPU
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        for mesh in &mut self.meshes {
            mesh.update_gpu(queue);
        }
    }

    pub fn get_statistics(&self) -> SceneStatistics {
        SceneStatistics {
            mesh_count: self.meshes.len(),
            light_count: self.lights.len(),
            total_triangles: self.meshes.iter().map(|m| m.geometry.triangle_count()).sum(),
            total_vertices: self.meshes.iter().map(|m| m.geometry.vertex_count()).sum(),
        }
    }
}

/// Scene statistics for logging
#[derive(Debug, PartialEq, Eq)]
pub struct SceneStatistics {
    pub mesh_count: usize,
    pub light_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}
