//! Procedural mesh generation for the demo scene.

use glam::{Vec2, Vec3};
use sr_raster::Vertex;

/// A triangle mesh: vertex buffer plus triangle-list indices.
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Unit cube centered at the origin, four vertices per face so each face
/// gets its own normal and a full UV quad.
pub fn cube() -> Mesh {
    let h = 0.5;

    // Four corners per face, counterclockwise as seen from outside
    let positions = [
        // Front face (+Z)
        [
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ],
        // Back face (-Z)
        [
            Vec3::new(h, -h, -h),
            Vec3::new(-h, -h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(h, h, -h),
        ],
        // Top face (+Y)
        [
            Vec3::new(-h, h, h),
            Vec3::new(h, h, h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
        ],
        // Bottom face (-Y)
        [
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, -h, h),
            Vec3::new(-h, -h, h),
        ],
        // Right face (+X)
        [
            Vec3::new(h, -h, h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(h, h, h),
        ],
        // Left face (-X)
        [
            Vec3::new(-h, -h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(-h, h, h),
            Vec3::new(-h, h, -h),
        ],
    ];

    let normals = [
        Vec3::Z,
        Vec3::NEG_Z,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::X,
        Vec3::NEG_X,
    ];

    let uvs = [
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 0.0),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (face, corners) in positions.iter().enumerate() {
        let base = vertices.len() as u32;
        for (corner, &position) in corners.iter().enumerate() {
            vertices.push(Vertex::new(position, normals[face], uvs[corner]));
        }
        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let cube = cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_cube_normals_point_away_from_center() {
        for v in cube().vertices {
            // Each face normal agrees with the direction from the center to
            // its face
            assert!(v.normal.dot(v.position) > 0.0);
            assert!((v.normal.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_cube_indices_in_range() {
        let cube = cube();
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertices.len()));
    }
}
