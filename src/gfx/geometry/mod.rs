//! # Procedural Geometry Generation
//!
//! Shapes are generated on the CPU and uploaded by the renderer, so no model
//! files are needed.
//!
//! ```rust
//! use tumbler::gfx::geometry::generate_box;
//!
//! let cube = generate_box(2.4, 2.4, 2.4);
//! assert_eq!(cube.triangle_count(), 12);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Generated geometry data ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v), v pointing down the image
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions, normals and texture coordinates into vertices
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mut min, mut max), v| {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
            (min, max)
        }))
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
