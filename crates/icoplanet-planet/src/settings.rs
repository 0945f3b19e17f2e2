//! The complete set of planet generation parameters.

use icoplanet_mesh::validate_level;
use icoplanet_surface::{SurfaceConfig, SurfaceError, normalized_liquid_level};
use icoplanet_terrain::{GeneralConfig, LandscapeConfig};
use serde::{Deserialize, Serialize};

use crate::stage::PipelineError;

/// Immutable inputs for one planet. Passed by reference into every stage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetSettings {
    pub general: GeneralConfig,
    pub landscape: LandscapeConfig,
    pub surface: SurfaceConfig,
}

impl PlanetSettings {
    /// Liquid level relative to the landscape strength, as used on the
    /// surface texture's x axis.
    pub fn normalized_liquid_level(&self) -> f32 {
        normalized_liquid_level(self.general.liquid_level, self.landscape.strength)
    }

    /// Check the inputs every stage rejects, without generating anything.
    ///
    /// The texture size is only checked when the surface is enabled.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Mesh`] for an unbuildable subdivision level and
    /// [`PipelineError::Surface`] for a zero texture dimension.
    pub fn validate(&self) -> Result<(), PipelineError> {
        validate_level(self.general.subdivision_level, self.general.layout())?;
        if self.surface.enabled {
            let size = self.surface.texture_size;
            SurfaceError::check_dimensions(size.width, size.height)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = PlanetSettings::default();
        assert_eq!(settings.general.subdivision_level, 3);
        assert_eq!(settings.landscape.layers.len(), 4);
        assert!(settings.surface.enabled);
        assert!((settings.normalized_liquid_level() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_normalized_liquid_uses_strength() {
        let mut settings = PlanetSettings::default();
        settings.general.liquid_level = 0.3;
        settings.landscape.strength = 0.6;
        assert!((settings.normalized_liquid_level() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_validate_rejects_bad_level_and_texture() {
        assert!(PlanetSettings::default().validate().is_ok());

        let mut settings = PlanetSettings::default();
        settings.general.subdivision_level = 7;
        assert!(matches!(settings.validate(), Err(PipelineError::Mesh(_))));

        let mut settings = PlanetSettings::default();
        settings.surface.texture_size.width = 0;
        assert_eq!(
            settings.validate(),
            Err(PipelineError::Surface(SurfaceError::InvalidDimensions {
                width: 0,
                height: 512
            }))
        );

        settings.surface.enabled = false;
        assert!(settings.validate().is_ok());
    }
}
