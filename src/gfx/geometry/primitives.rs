//! # Primitive Shape Generation

use cgmath::Vector3;

use super::GeometryData;

/// (normal, u axis, v axis) per face, with u × v = normal so that each face
/// winds counter-clockwise seen from outside.
const BOX_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

/// Generate a box centered at the origin with the given edge lengths
///
/// Every face gets its own four vertices so normals stay flat, and the full
/// 0..1 UV range so a texture covers each face once before repetition.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let half = Vector3::new(width * 0.5, height * 0.5, depth * 0.5);
    let extent_along = |axis: Vector3<f32>| {
        axis.x.abs() * half.x + axis.y.abs() * half.y + axis.z.abs() * half.z
    };

    for (normal, u_axis, v_axis) in BOX_FACES {
        let n = Vector3::from(normal);
        let u = Vector3::from(u_axis);
        let v = Vector3::from(v_axis);

        let center = n * extent_along(n);
        let u = u * extent_along(u);
        let v = v * extent_along(v);

        let base = data.vertices.len() as u32;
        let corners = [
            (center - u - v, [0.0, 1.0]),
            (center + u - v, [1.0, 1.0]),
            (center + u + v, [1.0, 0.0]),
            (center - u + v, [0.0, 0.0]),
        ];
        for (position, uv) in corners {
            data.vertices.push(position.into());
            data.normals.push(normal);
            data.tex_coords.push(uv);
        }

        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a unit cube centered at the origin
pub fn generate_cube() -> GeometryData {
    generate_box(1.0, 1.0, 1.0)
}
