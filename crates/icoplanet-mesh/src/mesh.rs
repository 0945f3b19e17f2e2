//! Planet mesh buffers shared by the builder, the displacer and the export glue.

use glam::{Vec2, Vec3};

/// A single mesh vertex as produced by subdivision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    /// Position on the unit sphere (before displacement).
    pub position: Vec3,
    /// Texture coordinate. Only meaningful for [`crate::IcosphereLayout::UvSeams`].
    pub uv: Vec2,
}

impl Vertex {
    /// Create a vertex at `position` with a zero UV.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            uv: Vec2::ZERO,
        }
    }

    /// Create a vertex with an explicit UV.
    pub fn with_uv(position: Vec3, uv: Vec2) -> Self {
        Self { position, uv }
    }
}

/// Indexed triangle mesh in structure-of-arrays form.
///
/// Every triangle index is `< positions.len()`. `uvs` and `normals` are always
/// the same length as `positions`; `colors`, when present, is too.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex texture coordinates.
    pub uvs: Vec<Vec2>,
    /// Per-vertex normals. For a generated planet these stay equal to the
    /// pre-displacement unit positions.
    pub normals: Vec<Vec3>,
    /// Triangles as ordered index triples.
    pub triangles: Vec<[u32; 3]>,
    /// Optional per-vertex RGB colors.
    pub colors: Option<Vec<[f32; 3]>>,
}

impl Mesh {
    /// Assemble a mesh from vertices and triangles. Normals are set to the
    /// vertex positions, which is exact for a unit sphere.
    pub fn from_vertices(vertices: &[Vertex], triangles: Vec<[u32; 3]>) -> Self {
        let positions: Vec<Vec3> = vertices.iter().map(|v| v.position).collect();
        let uvs = vertices.iter().map(|v| v.uv).collect();
        let normals = positions.clone();
        Self {
            positions,
            uvs,
            normals,
            triangles,
            colors: None,
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns the vertex at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= vertex_count()`.
    pub fn vertex(&self, index: usize) -> Vertex {
        Vertex::with_uv(self.positions[index], self.uvs[index])
    }

    /// Flatten the triangle list into an index buffer.
    pub fn indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        let vertices = [
            Vertex::with_uv(Vec3::X, Vec2::new(1.0, 0.0)),
            Vertex::with_uv(Vec3::Y, Vec2::new(0.0, 1.0)),
            Vertex::with_uv(Vec3::Z, Vec2::new(0.5, 0.5)),
            Vertex::new(Vec3::NEG_X),
        ];
        Mesh::from_vertices(&vertices, vec![[0, 1, 2], [0, 2, 3]])
    }

    #[test]
    fn test_from_vertices_copies_positions_into_normals() {
        let mesh = quad();
        assert_eq!(mesh.positions, mesh.normals);
        assert!(mesh.colors.is_none());
    }

    #[test]
    fn test_indices_are_flattened_in_order() {
        let mesh = quad();
        assert_eq!(mesh.indices(), vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_vertex_accessor_returns_uv() {
        let mesh = quad();
        let v = mesh.vertex(2);
        assert_eq!(v.position, Vec3::Z);
        assert_eq!(v.uv, Vec2::new(0.5, 0.5));
        assert_eq!(mesh.vertex(3).uv, Vec2::ZERO);
    }

    #[test]
    fn test_counts() {
        let mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
    }
}
