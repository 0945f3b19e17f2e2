//! Radial terrain displacement and per-vertex height/latitude colors.

use glam::Vec3;
use icoplanet_mesh::{IcosphereLayout, Mesh};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::noise_field::{LandscapeConfig, compute_displacement};

/// Planet-wide shape settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Icosphere subdivision level, `0..=6`.
    pub subdivision_level: i32,
    /// Base radius of the sphere. Expected `> 0`.
    pub radius: f32,
    /// Offset from `radius` below which terrain is clamped flat (ocean surface).
    pub liquid_level: f32,
    /// Build the seam-duplicated UV icosphere instead of the minimal one.
    pub uv_layout: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            subdivision_level: 3,
            radius: 1.0,
            liquid_level: 0.2,
            uv_layout: false,
        }
    }
}

impl GeneralConfig {
    /// Icosphere base shape selected by [`Self::uv_layout`].
    pub fn layout(&self) -> IcosphereLayout {
        if self.uv_layout {
            IcosphereLayout::UvSeams
        } else {
            IcosphereLayout::Minimal
        }
    }
}

/// Pushes unit-sphere vertices outward by the landscape noise.
///
/// Normals are left as the pre-displacement unit directions.
pub struct TerrainDisplacer<'a> {
    general: &'a GeneralConfig,
    landscape: &'a LandscapeConfig,
}

impl<'a> TerrainDisplacer<'a> {
    /// Create a displacer for one generation call.
    pub fn new(general: &'a GeneralConfig, landscape: &'a LandscapeConfig) -> Self {
        Self { general, landscape }
    }

    /// Distance added to the base radius for a normalized displacement value.
    ///
    /// Anything below the liquid level is raised to exactly the liquid level.
    pub fn radial_offset(&self, normalized: f32) -> f32 {
        let noise = normalized * self.landscape.strength;
        self.general.liquid_level.max(noise)
    }

    /// Displace `mesh` in place and attach per-vertex colors.
    ///
    /// `mesh.positions` must still be on the unit sphere, as produced by
    /// [`icoplanet_mesh::IcosphereBuilder`].
    pub fn apply(&self, mut mesh: Mesh) -> Mesh {
        let displacement = compute_displacement(&mesh.positions, self.landscape);

        let mut colors = Vec::with_capacity(mesh.positions.len());
        for (position, &normalized) in mesh.positions.iter_mut().zip(&displacement.values) {
            let unit = *position;
            colors.push(vertex_color(unit, normalized));
            *position = unit * (self.general.radius + self.radial_offset(normalized));
        }
        mesh.colors = Some(colors);

        info!(
            vertices = mesh.vertex_count(),
            raw_min = displacement.raw_min,
            raw_max = displacement.raw_max,
            "displaced terrain"
        );
        mesh
    }
}

/// Color channels for a vertex: red is normalized height, green runs from
/// 0 at the south pole to 1 at the north pole, blue is unused.
pub fn vertex_color(unit_position: Vec3, normalized: f32) -> [f32; 3] {
    let north = 1.0 - unit_position.y.clamp(-1.0, 1.0).acos() / std::f32::consts::PI;
    [normalized, north, 0.0]
}
