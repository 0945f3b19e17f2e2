//! Two-axis surface color lookup built from height, depth and climate gradients.
//!
//! The x axis runs from the deepest sea floor at 0 through the liquid level up
//! to the highest peak at 1. The y axis is a latitude-like coordinate used by
//! the climate gradients, which are overlaid on top of the base color.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::buffer::PixelBuffer;
use crate::color::{Rgb, inverse_lerp, overlay};
use crate::error::SurfaceError;
use crate::gradient::{AlphaKey, ColorKey, Gradient};

/// Width and height of the generated surface texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}

impl Default for TextureSize {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
        }
    }
}

/// Surface texture settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Whether the surface texture is generated at all.
    pub enabled: bool,
    pub texture_size: TextureSize,
    /// Land color from the shoreline (0) to the highest terrain (1).
    pub height_gradient: Gradient,
    /// Sea color from the deepest point (0) to the shoreline (1).
    pub depth_gradient: Gradient,
    /// Latitude overlay applied to land columns.
    pub climate_height_gradient: Gradient,
    /// Latitude overlay applied to sea columns.
    pub climate_depth_gradient: Gradient,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            texture_size: TextureSize::default(),
            height_gradient: Gradient::opaque(vec![
                ColorKey::hsv(40.0, 1.0, 0.9, 0.0),
                ColorKey::hsv(120.0, 0.85, 0.6, 0.05),
                ColorKey::hsv(120.0, 0.8, 0.4, 0.2),
                ColorKey::hsv(30.0, 0.8, 0.4, 0.5),
                ColorKey::hsv(20.0, 0.2, 0.6, 1.0),
            ]),
            depth_gradient: Gradient::opaque(vec![
                ColorKey::hsv(220.0, 0.8, 0.4, 0.0),
                ColorKey::hsv(220.0, 0.8, 1.0, 1.0),
            ]),
            climate_height_gradient: Gradient::new(
                vec![
                    ColorKey::hsv(0.0, 0.0, 0.0, 0.0),
                    ColorKey::hsv(60.0, 1.0, 1.0, 0.3),
                    ColorKey::hsv(60.0, 1.0, 1.0, 0.7),
                    ColorKey::hsv(240.0, 0.2, 1.0, 0.75),
                    ColorKey::hsv(240.0, 0.2, 1.0, 1.0),
                ],
                vec![
                    AlphaKey::new(0.0, 0.0),
                    AlphaKey::new(0.3, 0.0),
                    AlphaKey::new(0.5, 0.5),
                    AlphaKey::new(0.7, 0.0),
                    AlphaKey::new(0.75, 0.0),
                    AlphaKey::new(0.85, 0.75),
                    AlphaKey::new(1.0, 1.0),
                ],
            ),
            climate_depth_gradient: Gradient::new(
                vec![
                    ColorKey::hsv(0.0, 0.0, 0.0, 0.0),
                    ColorKey::hsv(240.0, 0.2, 1.0, 0.75),
                    ColorKey::hsv(240.0, 0.2, 1.0, 1.0),
                ],
                vec![
                    AlphaKey::new(0.0, 0.0),
                    AlphaKey::new(0.75, 0.0),
                    AlphaKey::new(0.85, 1.0),
                    AlphaKey::new(1.0, 1.0),
                ],
            ),
        }
    }
}

impl SurfaceConfig {
    /// The four gradients paired with a display label, in declaration order.
    pub fn named_gradients(&self) -> [(&'static str, &Gradient); 4] {
        [
            ("height", &self.height_gradient),
            ("depth", &self.depth_gradient),
            ("climate height", &self.climate_height_gradient),
            ("climate depth", &self.climate_depth_gradient),
        ]
    }
}

/// Liquid level expressed on the texture's x axis.
///
/// Values outside `[0, 1]` are passed through; a level above 1 makes every
/// column sea, a level at or below 0 makes every column land.
pub fn normalized_liquid_level(liquid_level: f32, strength: f32) -> f32 {
    liquid_level / strength
}

/// Synthesizes the surface color lookup texture.
pub struct GradientBlender;

impl GradientBlender {
    /// Blend the four gradients of `config` into a `width x height` texture.
    ///
    /// Columns at or below `normalized_liquid` are sea, the rest land.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidDimensions`] before allocating if either
    /// texture dimension is zero.
    pub fn blend(
        config: &SurfaceConfig,
        normalized_liquid: f32,
    ) -> Result<PixelBuffer, SurfaceError> {
        let TextureSize { width, height } = config.texture_size;
        SurfaceError::check_dimensions(width, height)?;

        let mut buffer = PixelBuffer::new(width, height);
        let mut land_columns = 0u32;
        for x in 0..width {
            let px = x as f32 / width as f32;
            let (base, climate) = if px > normalized_liquid {
                land_columns += 1;
                let pg = inverse_lerp(normalized_liquid, 1.0, px);
                (config.height_gradient.evaluate(pg).rgb(), &config.climate_height_gradient)
            } else {
                let pg = inverse_lerp(0.0, normalized_liquid, px);
                (config.depth_gradient.evaluate(pg).rgb(), &config.climate_depth_gradient)
            };
            Self::fill_column(&mut buffer, x, base, climate);
        }

        debug!(land_columns, sea_columns = width - land_columns, "blended surface columns");
        info!(width, height, normalized_liquid, "generated surface texture");
        Ok(buffer)
    }

    fn fill_column(buffer: &mut PixelBuffer, x: u32, base: Rgb, climate: &Gradient) {
        let height = buffer.height;
        for y in 0..height {
            let py = y as f32 / height as f32;
            buffer.set_pixel(x, y, overlay(base, climate.evaluate(py)));
        }
    }
}
