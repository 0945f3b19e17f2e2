//! Procedural terrain on the icosphere: layered noise, global normalization
//! and radial displacement.

mod displacer;
mod noise_field;

pub use displacer::{GeneralConfig, TerrainDisplacer, vertex_color};
pub use noise_field::{
    Displacement, LandscapeConfig, NoiseField, NoiseLayer, ROLLED_SEED_MAX, compute_displacement,
};
