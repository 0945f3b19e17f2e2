//! Geodesic sphere meshes: icosahedron subdivision with shared-midpoint deduplication.

mod icosphere;
mod mesh;

pub use icosphere::{
    IcosphereBuilder, IcosphereLayout, MAX_LEVEL, MIDPOINT_INDEX_CAPACITY, MIDPOINT_KEY_BITS,
    MeshError, predicted_counts, validate_level,
};
pub use mesh::{Mesh, Vertex};
