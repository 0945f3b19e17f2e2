//! Icosphere generation by recursive midpoint subdivision of an icosahedron.
//!
//! Two base shapes are available. [`IcosphereLayout::Minimal`] is the classic
//! 12-vertex icosahedron. [`IcosphereLayout::UvSeams`] unfolds the same
//! icosahedron into a 22-vertex net so that every triangle has continuous
//! texture coordinates; poles and the seam column are duplicated.
//!
//! Each subdivision splits every triangle into four. Edge midpoints are shared
//! between the two triangles of an edge through a cache keyed by the unordered
//! index pair, packed into a `u32` with 16 bits per index. That packing caps
//! vertex indices at `u16::MAX`, which is why [`MAX_LEVEL`] is 6.

use glam::{Vec2, Vec3};
use hashbrown::HashMap;
use tracing::debug;

use crate::mesh::{Mesh, Vertex};

/// Highest accepted subdivision level.
pub const MAX_LEVEL: i32 = 6;

/// Bits per endpoint index in a midpoint cache key.
pub const MIDPOINT_KEY_BITS: u32 = 16;

/// Number of vertex indices representable in a midpoint cache key.
pub const MIDPOINT_INDEX_CAPACITY: u64 = 1 << MIDPOINT_KEY_BITS;

/// Errors raised before an icosphere is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    /// The requested subdivision level is outside `0..=MAX_LEVEL`.
    #[error("subdivision level {level} is out of range (0..={max})")]
    OutOfRange {
        /// Requested level.
        level: i32,
        /// Highest supported level.
        max: i32,
    },
    /// The requested level would create more vertices than the midpoint key can index.
    #[error(
        "subdivision level {level} needs {vertices} vertices, midpoint keys hold at most {capacity}"
    )]
    IndexCapacity {
        /// Requested level.
        level: i32,
        /// Vertex count the level would produce.
        vertices: u64,
        /// Maximum vertex count addressable by the cache key.
        capacity: u64,
    },
}

/// Base shape used before subdivision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IcosphereLayout {
    /// 12 shared vertices, no texture coordinates.
    #[default]
    Minimal,
    /// 22 vertices with duplicated seam/pole vertices and a flat UV net.
    UvSeams,
}

impl IcosphereLayout {
    /// `(vertices, edges, faces)` of the level-0 shape.
    fn base_counts(self) -> (u64, u64, u64) {
        match self {
            // Closed icosahedron: V - E + F = 2.
            IcosphereLayout::Minimal => (12, 30, 20),
            // Unfolded net is a disk: V - E + F = 1.
            IcosphereLayout::UvSeams => (22, 41, 20),
        }
    }
}

/// Vertex and triangle counts produced by `level` subdivisions of `layout`.
///
/// Each pass adds one vertex per edge, turns every edge into two and adds
/// three interior edges per face.
pub fn predicted_counts(level: u32, layout: IcosphereLayout) -> (u64, u64) {
    let (mut vertices, mut edges, mut faces) = layout.base_counts();
    for _ in 0..level {
        vertices += edges;
        edges = 2 * edges + 3 * faces;
        faces *= 4;
    }
    (vertices, faces)
}

/// Builds icosphere meshes. Owns the vertex list and midpoint cache for the
/// duration of a single build.
pub struct IcosphereBuilder {
    vertices: Vec<Vertex>,
    triangles: Vec<[u32; 3]>,
}

/// Check that `level` can be built with `layout` and return the predicted
/// `(vertices, triangles)` counts.
///
/// # Errors
///
/// Same conditions as [`IcosphereBuilder::build`].
pub fn validate_level(level: i32, layout: IcosphereLayout) -> Result<(u64, u64), MeshError> {
    if !(0..=MAX_LEVEL).contains(&level) {
        return Err(MeshError::OutOfRange {
            level,
            max: MAX_LEVEL,
        });
    }
    let (vertices, triangles) = predicted_counts(level as u32, layout);
    if vertices > MIDPOINT_INDEX_CAPACITY {
        return Err(MeshError::IndexCapacity {
            level,
            vertices,
            capacity: MIDPOINT_INDEX_CAPACITY,
        });
    }
    Ok((vertices, triangles))
}

impl IcosphereBuilder {
    /// Build an icosphere subdivided `level` times.
    ///
    /// Positions lie on the unit sphere, normals equal positions and colors
    /// are absent.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::OutOfRange`] when `level` is negative or above
    /// [`MAX_LEVEL`], and [`MeshError::IndexCapacity`] when the layout would
    /// outgrow the midpoint key. Both are checked before allocating.
    pub fn build(level: i32, layout: IcosphereLayout) -> Result<Mesh, MeshError> {
        let (vertex_count, triangle_count) = validate_level(level, layout)?;

        let mut builder = Self::base(layout);
        builder.vertices.reserve(vertex_count as usize - builder.vertices.len());
        for _ in 0..level {
            builder.subdivide();
        }

        debug_assert_eq!(builder.vertices.len() as u64, vertex_count);
        debug_assert_eq!(builder.triangles.len() as u64, triangle_count);
        debug!(
            level,
            ?layout,
            vertices = builder.vertices.len(),
            triangles = builder.triangles.len(),
            "built icosphere"
        );

        Ok(Mesh::from_vertices(&builder.vertices, builder.triangles))
    }

    fn base(layout: IcosphereLayout) -> Self {
        match layout {
            IcosphereLayout::Minimal => Self {
                vertices: minimal_vertices().into_iter().map(Vertex::new).collect(),
                triangles: minimal_triangles(),
            },
            IcosphereLayout::UvSeams => Self {
                vertices: uv_vertices(),
                triangles: uv_triangles(),
            },
        }
    }

    /// Replace every triangle `(a, b, c)` with four:
    ///
    /// ```text
    ///          a
    ///         / \
    ///       ca---ab
    ///       / \ / \
    ///      c---bc--b
    /// ```
    fn subdivide(&mut self) {
        let mut cache: HashMap<u32, u32> = HashMap::with_capacity(self.triangles.len() * 3 / 2);
        let mut triangles = Vec::with_capacity(self.triangles.len() * 4);

        for i in 0..self.triangles.len() {
            let [a, b, c] = self.triangles[i];
            let ab = self.midpoint(&mut cache, a, b);
            let bc = self.midpoint(&mut cache, b, c);
            let ca = self.midpoint(&mut cache, c, a);

            triangles.push([a, ab, ca]);
            triangles.push([ab, bc, ca]);
            triangles.push([ca, bc, c]);
            triangles.push([ab, b, bc]);
        }

        self.triangles = triangles;
    }

    fn midpoint(&mut self, cache: &mut HashMap<u32, u32>, a: u32, b: u32) -> u32 {
        let key = midpoint_key(a, b);
        if let Some(&index) = cache.get(&key) {
            return index;
        }

        let va = self.vertices[a as usize];
        let vb = self.vertices[b as usize];
        let position = va.position.lerp(vb.position, 0.5).normalize();
        // UVs are averaged as-is; wrap-around at seams and poles is not corrected.
        let uv = va.uv.lerp(vb.uv, 0.5);

        let index = self.vertices.len() as u32;
        self.vertices.push(Vertex::with_uv(position, uv));
        cache.insert(key, index);
        index
    }
}

/// Order-independent cache key for the edge `(a, b)`.
fn midpoint_key(a: u32, b: u32) -> u32 {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    debug_assert!(u64::from(hi) < MIDPOINT_INDEX_CAPACITY);
    (lo << MIDPOINT_KEY_BITS) | hi
}

/// Poles at ±Y (indices 0 and 11) and two pentagonal rings (1..=5 upper,
/// 6..=10 lower) at latitude ±atan(1/2), the lower ring rotated half a step.
fn minimal_vertices() -> [Vec3; 12] {
    let h_step = 72.0_f32.to_radians();
    let v_angle = 0.5_f32.atan();
    let y = v_angle.sin();
    let xz = v_angle.cos();
    let mut upper = -std::f32::consts::FRAC_PI_2 - h_step / 2.0;
    let mut lower = -std::f32::consts::FRAC_PI_2;

    let mut vertices = [Vec3::ZERO; 12];
    vertices[0] = Vec3::Y;
    for i in 1..6 {
        vertices[i] = Vec3::new(xz * upper.cos(), y, xz * upper.sin());
        vertices[i + 5] = Vec3::new(xz * lower.cos(), -y, xz * lower.sin());
        upper += h_step;
        lower += h_step;
    }
    vertices[11] = Vec3::NEG_Y;
    vertices
}

fn minimal_triangles() -> Vec<[u32; 3]> {
    let mut triangles = vec![[0; 3]; 20];
    for i in 0..5 {
        let upper_a = i as u32 + 1;
        let upper_b = upper_a % 5 + 1;
        let lower_a = upper_a + 5;
        let lower_b = upper_b + 5;
        triangles[i] = [0, upper_b, upper_a];
        triangles[i + 5] = [lower_a, upper_a, upper_b];
        triangles[i + 10] = [upper_b, lower_b, lower_a];
        triangles[i + 15] = [11, lower_a, lower_b];
    }
    triangles
}

/// Minimal vertex index behind each of the 22 net vertices.
const UV_SOURCE: [usize; 22] = [
    0, 0, 0, 0, 0, //
    1, 2, 3, 4, 5, 1, //
    6, 7, 8, 9, 10, 6, //
    11, 11, 11, 11, 11,
];

/// The icosahedron unfolded into a sheared strip of equilateral triangles
/// with side 0.2, centered on (0.5, 0.5). Net vertices 0..5 are copies of the
/// north pole, 5..11 and 11..17 the two rings with the seam vertex repeated,
/// 17..22 copies of the south pole.
fn uv_vertices() -> Vec<Vertex> {
    let side = 0.2_f32;
    let row = 3.0_f32.sqrt() / 2.0 * side;
    let bottom = 0.5 - row * 2.5;
    let v: [f32; 6] = std::array::from_fn(|i| bottom + row * i as f32);
    let right_u: [f32; 6] = std::array::from_fn(|i| 0.5 - side * 2.75 + side * (i as f32 * 0.5));

    let mut uv = [Vec2::ZERO; 22];
    for i in 0..5 {
        uv[i] = Vec2::new(right_u[i + 1], v[i + 1]);
        uv[17 + i] = Vec2::new(right_u[i] + side * 3.0, v[i]);
    }
    for i in 0..6 {
        uv[5 + i] = Vec2::new(right_u[i] + side, v[i]);
        uv[11 + i] = Vec2::new(right_u[i] + side * 2.0, v[i]);
    }

    let positions = minimal_vertices();
    UV_SOURCE
        .iter()
        .zip(uv)
        .map(|(&source, uv)| Vertex::with_uv(positions[source], uv))
        .collect()
}

fn uv_triangles() -> Vec<[u32; 3]> {
    let mut triangles = vec![[0; 3]; 20];
    for i in 0..5 {
        let n = i as u32;
        triangles[i] = [n, n + 6, n + 5];
        triangles[i + 5] = [n + 11, n + 5, n + 6];
        triangles[i + 10] = [n + 6, n + 12, n + 11];
        triangles[i + 15] = [n + 17, n + 11, n + 12];
    }
    triangles
}
