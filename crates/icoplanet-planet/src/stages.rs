//! The built-in mesh and surface stages.

use std::sync::Arc;

use icoplanet_mesh::{IcosphereBuilder, Mesh};
use icoplanet_surface::GradientBlender;
use icoplanet_terrain::TerrainDisplacer;
use tracing::debug;

use crate::settings::PlanetSettings;
use crate::stage::{Artifact, GenerationStage, PipelineError, StageId, SurfaceTexture};

/// Builds the icosphere and displaces it by the landscape noise.
#[derive(Debug, Default)]
pub struct MeshStage {
    mesh: Option<Arc<Mesh>>,
}

impl MeshStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mesh from the last successful run, if not cleared.
    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        self.mesh.as_ref()
    }
}

impl GenerationStage for MeshStage {
    fn id(&self) -> StageId {
        StageId::Mesh
    }

    fn generate(&mut self, settings: &PlanetSettings) -> Result<Option<Artifact>, PipelineError> {
        let general = &settings.general;
        let base = IcosphereBuilder::build(general.subdivision_level, general.layout())?;
        debug!(
            vertices = base.vertex_count(),
            triangles = base.triangle_count(),
            "built base icosphere"
        );

        let mesh = TerrainDisplacer::new(general, &settings.landscape).apply(base);
        if let Some(index) = mesh.positions.iter().position(|p| !p.is_finite()) {
            return Err(PipelineError::StageFailed {
                stage: self.id().name(),
                reason: format!(
                    "vertex {index} is not finite (radius {}, strength {})",
                    general.radius, settings.landscape.strength
                ),
            });
        }

        let mesh = Arc::new(mesh);
        self.mesh = Some(Arc::clone(&mesh));
        Ok(Some(Artifact::Mesh(mesh)))
    }

    fn clear(&mut self) {
        self.mesh = None;
    }
}

/// Blends the surface gradients into the color lookup texture.
#[derive(Debug, Default)]
pub struct SurfaceStage {
    texture: Option<Arc<SurfaceTexture>>,
}

impl SurfaceStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The texture from the last successful run, if not cleared.
    pub fn texture(&self) -> Option<&Arc<SurfaceTexture>> {
        self.texture.as_ref()
    }
}

impl GenerationStage for SurfaceStage {
    fn id(&self) -> StageId {
        StageId::Surface
    }

    fn generate(&mut self, settings: &PlanetSettings) -> Result<Option<Artifact>, PipelineError> {
        if !settings.surface.enabled {
            debug!("surface texture disabled");
            return Ok(None);
        }

        let normalized_liquid = settings.normalized_liquid_level();
        let pixels = GradientBlender::blend(&settings.surface, normalized_liquid)?;
        let texture = Arc::new(SurfaceTexture {
            pixels,
            normalized_liquid,
        });
        self.texture = Some(Arc::clone(&texture));
        Ok(Some(Artifact::Surface(texture)))
    }

    fn clear(&mut self) {
        self.texture = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icoplanet_mesh::MeshError;
    use icoplanet_surface::{SurfaceError, TextureSize};

    fn small_settings() -> PlanetSettings {
        let mut settings = PlanetSettings::default();
        settings.general.subdivision_level = 1;
        settings.surface.texture_size = TextureSize {
            width: 16,
            height: 8,
        };
        settings
    }

    #[test]
    fn test_mesh_stage_produces_and_holds_mesh() {
        let mut stage = MeshStage::new();
        let artifact = stage.generate(&small_settings()).unwrap();
        let Some(Artifact::Mesh(mesh)) = artifact else {
            panic!("expected a mesh artifact");
        };
        assert_eq!(mesh.vertex_count(), 42);
        assert!(Arc::ptr_eq(&mesh, stage.mesh().unwrap()));
        stage.clear();
        assert!(stage.mesh().is_none());
    }

    #[test]
    fn test_mesh_stage_rejects_out_of_range_level() {
        let mut settings = small_settings();
        settings.general.subdivision_level = 7;
        let mut stage = MeshStage::new();
        let err = stage.generate(&settings).unwrap_err();
        assert!(matches!(err, PipelineError::Mesh(MeshError::OutOfRange { level: 7, .. })));
        assert!(stage.mesh().is_none());
    }

    #[test]
    fn test_mesh_stage_rejects_non_finite_radius() {
        let mut settings = small_settings();
        settings.general.radius = f32::NAN;
        let err = MeshStage::new().generate(&settings).unwrap_err();
        assert!(matches!(err, PipelineError::StageFailed { stage: "mesh", .. }), "{err}");
    }

    #[test]
    fn test_surface_stage_carries_liquid_fraction() {
        let mut settings = small_settings();
        settings.general.liquid_level = 0.5;
        settings.landscape.strength = 2.0;
        let mut stage = SurfaceStage::new();
        let Some(Artifact::Surface(texture)) = stage.generate(&settings).unwrap() else {
            panic!("expected a surface artifact");
        };
        assert_eq!(texture.normalized_liquid, 0.25);
        assert_eq!(texture.pixels.dimensions(), (16, 8));
    }

    #[test]
    fn test_surface_stage_disabled_returns_none() {
        let mut settings = small_settings();
        settings.surface.enabled = false;
        let mut stage = SurfaceStage::new();
        assert!(stage.generate(&settings).unwrap().is_none());
        assert!(stage.texture().is_none());
    }

    #[test]
    fn test_surface_stage_rejects_zero_width() {
        let mut settings = small_settings();
        settings.surface.texture_size.width = 0;
        let err = SurfaceStage::new().generate(&settings).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Surface(SurfaceError::InvalidDimensions { width: 0, height: 8 })
        ));
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(MeshStage::new().name(), "mesh");
        assert_eq!(SurfaceStage::new().name(), "surface");
    }
}
