//! Keyframed color gradients with independent color and alpha tracks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::color::{Rgb, Rgba, lerp};
use crate::error::SurfaceError;

/// Default width of a gradient preview strip.
pub const PREVIEW_WIDTH: u32 = 128;
/// Default height of a gradient preview strip.
pub const PREVIEW_HEIGHT: u32 = 8;

/// A color keyframe at normalized position `time`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorKey {
    pub time: f32,
    pub color: Rgb,
}

/// An alpha keyframe at normalized position `time`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlphaKey {
    pub time: f32,
    pub alpha: f32,
}

impl ColorKey {
    pub fn new(time: f32, color: Rgb) -> Self {
        Self { time, color }
    }

    /// Key from hue in degrees plus saturation and value in `[0, 1]`.
    pub fn hsv(hue_degrees: f32, saturation: f32, value: f32, time: f32) -> Self {
        Self::new(time, Rgb::from_hsv(hue_degrees / 360.0, saturation, value))
    }
}

impl AlphaKey {
    pub fn new(time: f32, alpha: f32) -> Self {
        Self { time, alpha }
    }
}

/// Piecewise-linear color function over `[0, 1]`.
///
/// Color and alpha are interpolated separately between the two keys that
/// bracket the query position and held constant beyond the first and last
/// key. An empty color track evaluates to white; an empty alpha track to 1.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gradient {
    pub color_keys: Vec<ColorKey>,
    pub alpha_keys: Vec<AlphaKey>,
}

impl Gradient {
    /// Build a gradient, sorting both tracks by time.
    pub fn new(mut color_keys: Vec<ColorKey>, mut alpha_keys: Vec<AlphaKey>) -> Self {
        color_keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        alpha_keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            color_keys,
            alpha_keys,
        }
    }

    /// Opaque gradient with only color keys.
    pub fn opaque(color_keys: Vec<ColorKey>) -> Self {
        Self::new(color_keys, Vec::new())
    }

    /// Evaluate color and alpha at `t`.
    pub fn evaluate(&self, t: f32) -> Rgba {
        let color = match bracket(&self.color_keys, |k| k.time, t) {
            Some((lo, hi, f)) => lo.color.lerp(hi.color, f),
            None => Rgb::WHITE,
        };
        let alpha = match bracket(&self.alpha_keys, |k| k.time, t) {
            Some((lo, hi, f)) => lerp(lo.alpha, hi.alpha, f),
            None => 1.0,
        };
        color.with_alpha(alpha)
    }

    /// Render a horizontal strip: column `x` holds `evaluate(x / width)`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidDimensions`] if either dimension is zero.
    pub fn to_texture(&self, width: u32, height: u32) -> Result<PixelBuffer, SurfaceError> {
        SurfaceError::check_dimensions(width, height)?;
        let mut buffer = PixelBuffer::new(width, height);
        for x in 0..width {
            let color = self.evaluate(x as f32 / width as f32).rgb();
            for y in 0..height {
                buffer.set_pixel(x, y, color);
            }
        }
        Ok(buffer)
    }
}

impl fmt::Display for Gradient {
    /// Lists the keys in HSV form, hue in whole degrees.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "color keys:")?;
        for key in &self.color_keys {
            let (h, s, v) = key.color.to_hsv();
            writeln!(
                f,
                "  {:.2}  hsv({}, {:.2}, {:.2})",
                key.time,
                (h * 360.0).round() as i32,
                s,
                v
            )?;
        }
        write!(f, "alpha keys:")?;
        for key in &self.alpha_keys {
            write!(f, "\n  {:.2}  {:.2}", key.time, key.alpha)?;
        }
        Ok(())
    }
}

/// Find the keys around `t` and the interpolation fraction between them.
///
/// Works on unsorted input: the lower key is the latest one at or before `t`,
/// the upper key the earliest one at or after it. Returns `None` only for an
/// empty track.
fn bracket<K>(keys: &[K], time: impl Fn(&K) -> f32, t: f32) -> Option<(&K, &K, f32)> {
    let first = keys.first()?;
    let mut lower: Option<&K> = None;
    let mut upper: Option<&K> = None;
    for key in keys {
        let kt = time(key);
        if kt <= t && lower.is_none_or(|l| time(l) <= kt) {
            lower = Some(key);
        }
        if kt >= t && upper.is_none_or(|u| time(u) > kt) {
            upper = Some(key);
        }
    }

    match (lower, upper) {
        (Some(lo), Some(hi)) => {
            let (t0, t1) = (time(lo), time(hi));
            let fraction = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            Some((lo, hi, fraction))
        }
        (Some(only), None) | (None, Some(only)) => Some((only, only, 0.0)),
        // NaN query.
        (None, None) => Some((first, first, 0.0)),
    }
}
