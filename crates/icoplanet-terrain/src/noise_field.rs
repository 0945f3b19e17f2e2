//! Layered noise field sampled on the sphere surface.
//!
//! A single seeded simplex generator is sampled once per enabled
//! [`NoiseLayer`], each layer with its own frequency, offset and shaping. The
//! weighted sum is then normalized across the whole mesh so the lowest vertex
//! maps to 0 and the highest to 1.

use glam::Vec3;
use noise::{NoiseFn, Simplex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bound of the seed range drawn by [`LandscapeConfig::with_rolled_seed`].
pub const ROLLED_SEED_MAX: u32 = 100_000;

/// One octave of the landscape noise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseLayer {
    /// Disabled layers are skipped entirely.
    pub enabled: bool,
    /// Contribution of this layer to the summed height. Expected `>= 0`.
    pub weight: f32,
    /// Per-layer sample offset, added to the landscape offset.
    pub offset: Vec3,
    /// Sampling frequency ("roughness"). Expected `> 0`.
    pub frequency: f32,
    /// Exponent applied to the remapped sample when greater than 1. Expected in `[1, 5]`.
    pub sharpness: f32,
    /// Invert the shaped sample (`1 - v`).
    pub flip: bool,
}

impl NoiseLayer {
    /// An enabled layer with zero offset.
    pub fn new(weight: f32, frequency: f32, sharpness: f32, flip: bool) -> Self {
        Self {
            enabled: true,
            weight,
            offset: Vec3::ZERO,
            frequency,
            sharpness,
            flip,
        }
    }

    /// Map a raw noise sample in `[-1, 1]` to the layer's `[0, 1]` value.
    ///
    /// The absolute value folds the sample, giving ridged terrain in the
    /// upper half of the range.
    pub fn shape(&self, raw: f32) -> f32 {
        let mut value = raw.abs() * 0.5 + 0.5;
        if self.sharpness > 1.0 {
            value = value.powf(self.sharpness);
        }
        if self.flip {
            value = 1.0 - value;
        }
        value
    }
}

impl Default for NoiseLayer {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, false)
    }
}

/// Seed, global strength and the ordered list of noise layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandscapeConfig {
    /// Seed for the underlying noise generator.
    pub seed: u32,
    /// Radial scale applied to the normalized displacement.
    pub strength: f32,
    /// Global sample offset shared by all layers.
    pub offset: Vec3,
    /// Noise layers, evaluated in order.
    pub layers: Vec<NoiseLayer>,
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            strength: 1.0,
            offset: Vec3::ZERO,
            layers: vec![
                NoiseLayer::new(1.0, 0.75, 1.0, true),
                NoiseLayer::new(0.5, 1.5, 1.0, false),
                NoiseLayer::new(0.25, 3.0, 5.0, false),
                NoiseLayer::new(0.125, 5.0, 1.0, false),
            ],
        }
    }
}

impl LandscapeConfig {
    /// Layers that take part in evaluation.
    pub fn enabled_layers(&self) -> impl Iterator<Item = &NoiseLayer> {
        self.layers.iter().filter(|layer| layer.enabled)
    }

    /// Sum of the weights of enabled layers.
    pub fn enabled_weight_sum(&self) -> f32 {
        self.enabled_layers().map(|layer| layer.weight).sum()
    }

    /// Enabled weight sum scaled by [`Self::strength`].
    pub fn total_strength(&self) -> f32 {
        self.enabled_weight_sum() * self.strength
    }

    /// A copy of this config with a fresh seed in `0..ROLLED_SEED_MAX`.
    pub fn with_rolled_seed(&self, rng: &mut impl Rng) -> Self {
        Self {
            seed: rng.random_range(0..ROLLED_SEED_MAX),
            ..self.clone()
        }
    }
}

/// Seeded 3D coherent noise.
///
/// Output is smooth, roughly within `[-1, 1]`, and identical for the same seed
/// and point within one build of this crate.
pub struct NoiseField {
    noise: Simplex,
}

impl NoiseField {
    /// Create a field for the given seed.
    pub fn new(seed: u32) -> Self {
        Self {
            noise: Simplex::new(seed),
        }
    }

    /// Sample the raw noise at `point`.
    pub fn evaluate(&self, point: Vec3) -> f32 {
        let p = point.as_dvec3();
        self.noise.get([p.x, p.y, p.z]) as f32
    }

    /// Weighted sum of all enabled layers at `point`, before normalization.
    pub fn sample_layers(&self, point: Vec3, landscape: &LandscapeConfig) -> f32 {
        landscape
            .enabled_layers()
            .map(|layer| {
                let sample_point = (point + landscape.offset + layer.offset) * layer.frequency;
                layer.shape(self.evaluate(sample_point)) * layer.weight
            })
            .sum()
    }
}

/// Per-vertex displacement normalized over the whole mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Displacement {
    /// One value per input position, in `[0, 1]`.
    pub values: Vec<f32>,
    /// Lowest raw layered sum observed.
    pub raw_min: f32,
    /// Highest raw layered sum observed.
    pub raw_max: f32,
}

impl Displacement {
    /// `true` when every raw sum was equal (including the empty and
    /// all-layers-disabled cases). All values are 0 then.
    pub fn is_degenerate(&self) -> bool {
        !(self.raw_max > self.raw_min)
    }
}

/// Evaluate the landscape at every position and normalize the sums to `[0, 1]`.
///
/// The first pass samples and tracks the running min/max; the second remaps
/// each sum by inverse-lerp against that global range. When min equals max the
/// output is 0 everywhere.
pub fn compute_displacement(positions: &[Vec3], landscape: &LandscapeConfig) -> Displacement {
    let field = NoiseField::new(landscape.seed);

    let mut raw_min = f32::INFINITY;
    let mut raw_max = f32::NEG_INFINITY;
    let mut values: Vec<f32> = positions
        .iter()
        .map(|&p| {
            let sum = field.sample_layers(p, landscape);
            raw_min = raw_min.min(sum);
            raw_max = raw_max.max(sum);
            sum
        })
        .collect();

    let displacement_range = raw_max - raw_min;
    if raw_max > raw_min {
        for value in &mut values {
            *value = ((*value - raw_min) / displacement_range).clamp(0.0, 1.0);
        }
    } else {
        debug!(
            raw_min,
            raw_max,
            vertices = positions.len(),
            "degenerate displacement range, using 0"
        );
        values.fill(0.0);
    }

    Displacement {
        values,
        raw_min,
        raw_max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const EPSILON: f32 = 1e-6;

    fn sphere_points() -> Vec<Vec3> {
        let mut points = Vec::new();
        for i in 0..24 {
            for j in 1..12 {
                let lon = i as f32 / 24.0 * std::f32::consts::TAU;
                let lat = j as f32 / 12.0 * std::f32::consts::PI;
                points.push(Vec3::new(lat.sin() * lon.cos(), lat.cos(), lat.sin() * lon.sin()));
            }
        }
        points
    }

    fn single_layer() -> LandscapeConfig {
        LandscapeConfig {
            seed: 42,
            strength: 1.0,
            offset: Vec3::ZERO,
            layers: vec![NoiseLayer::new(1.0, 1.0, 1.0, false)],
        }
    }

    #[test]
    fn test_evaluate_is_deterministic_per_seed() {
        let a = NoiseField::new(7);
        let b = NoiseField::new(7);
        let p = Vec3::new(0.3, -0.2, 0.9);
        assert_eq!(a.evaluate(p), b.evaluate(p));
    }

    #[test]
    fn test_different_seeds_produce_different_fields() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(999);
        let differs = sphere_points()
            .iter()
            .any(|&p| (a.evaluate(p * 2.0) - b.evaluate(p * 2.0)).abs() > EPSILON);
        assert!(differs, "Different seeds should produce different samples");
    }

    #[test]
    fn test_evaluate_stays_bounded() {
        let field = NoiseField::new(3);
        for p in sphere_points() {
            let v = field.evaluate(p * 4.0);
            assert!(v.is_finite() && v.abs() <= 1.5, "noise {v} is not bounded");
        }
    }

    #[test]
    fn test_shape_remaps_and_flips() {
        let plain = NoiseLayer::new(1.0, 1.0, 1.0, false);
        assert!((plain.shape(0.0) - 0.5).abs() < EPSILON);
        assert!((plain.shape(-1.0) - 1.0).abs() < EPSILON);
        assert!((plain.shape(0.5) - plain.shape(-0.5)).abs() < EPSILON);

        let sharp = NoiseLayer::new(1.0, 1.0, 2.0, false);
        assert!((sharp.shape(0.0) - 0.25).abs() < EPSILON);

        let flipped = NoiseLayer::new(1.0, 1.0, 2.0, true);
        assert!((flipped.shape(0.0) - 0.75).abs() < EPSILON);
    }

    #[test]
    fn test_sharpness_below_one_is_ignored() {
        let soft = NoiseLayer::new(1.0, 1.0, 0.5, false);
        assert!((soft.shape(0.0) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_displacement_in_unit_range() {
        let result = compute_displacement(&sphere_points(), &LandscapeConfig::default());
        assert!(!result.is_degenerate());
        for &v in &result.values {
            assert!((0.0..=1.0).contains(&v), "displacement {v} out of [0, 1]");
        }
    }

    #[test]
    fn test_single_layer_min_and_max_map_to_bounds() {
        let points = sphere_points();
        let result = compute_displacement(&points, &single_layer());
        let min = result.values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = result.values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_all_layers_disabled_yields_zero() {
        let mut landscape = LandscapeConfig::default();
        for layer in &mut landscape.layers {
            layer.enabled = false;
        }
        let result = compute_displacement(&sphere_points(), &landscape);
        assert!(result.is_degenerate());
        assert!(result.values.iter().all(|&v| v == 0.0));
        assert_eq!(result.raw_min, 0.0);
        assert_eq!(result.raw_max, 0.0);
    }

    #[test]
    fn test_no_layers_and_no_points() {
        let landscape = LandscapeConfig {
            layers: Vec::new(),
            ..Default::default()
        };
        let result = compute_displacement(&sphere_points(), &landscape);
        assert!(result.values.iter().all(|&v| v == 0.0));

        let empty = compute_displacement(&[], &LandscapeConfig::default());
        assert!(empty.values.is_empty());
        assert!(empty.is_degenerate());
    }

    #[test]
    fn test_disabled_layer_contributes_nothing() {
        let points = sphere_points();
        let base = single_layer();
        let mut with_disabled = base.clone();
        with_disabled.layers.push(NoiseLayer {
            enabled: false,
            weight: 10.0,
            frequency: 8.0,
            ..Default::default()
        });
        assert_eq!(
            compute_displacement(&points, &base),
            compute_displacement(&points, &with_disabled)
        );
        assert_eq!(with_disabled.enabled_weight_sum(), 1.0);
    }

    #[test]
    fn test_offset_shifts_sample_point() {
        let field = NoiseField::new(5);
        let p = Vec3::new(0.2, 0.4, 0.6);
        let mut landscape = single_layer();
        landscape.offset = Vec3::new(1.0, 0.0, 0.0);
        let shifted = field.sample_layers(p, &landscape);

        let mut moved = single_layer();
        moved.layers[0].offset = Vec3::new(1.0, 0.0, 0.0);
        assert!((shifted - field.sample_layers(p, &moved)).abs() < EPSILON);

        let expected = landscape.layers[0].shape(field.evaluate(p + Vec3::X));
        assert!((shifted - expected).abs() < EPSILON);
    }

    #[test]
    fn test_displacement_is_deterministic() {
        let points = sphere_points();
        let landscape = LandscapeConfig {
            seed: 1234,
            ..Default::default()
        };
        assert_eq!(
            compute_displacement(&points, &landscape),
            compute_displacement(&points, &landscape)
        );
    }

    #[test]
    fn test_total_strength() {
        let landscape = LandscapeConfig {
            strength: 2.0,
            ..Default::default()
        };
        assert!((landscape.enabled_weight_sum() - 1.875).abs() < EPSILON);
        assert!((landscape.total_strength() - 3.75).abs() < EPSILON);
    }

    #[test]
    fn test_rolled_seed_keeps_layers() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let landscape = LandscapeConfig::default();
        let rolled = landscape.with_rolled_seed(&mut rng);
        assert!(rolled.seed < ROLLED_SEED_MAX);
        assert_eq!(rolled.layers, landscape.layers);

        let mut again = ChaCha8Rng::seed_from_u64(9);
        assert_eq!(landscape.with_rolled_seed(&mut again).seed, rolled.seed);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let landscape: LandscapeConfig = ron::from_str("(seed: 17)").unwrap();
        assert_eq!(landscape.seed, 17);
        assert_eq!(landscape.layers, LandscapeConfig::default().layers);

        let layer: NoiseLayer = ron::from_str("(weight: 0.5, flip: true)").unwrap();
        assert!(layer.enabled);
        assert!(layer.flip);
        assert_eq!(layer.frequency, 1.0);
    }
}
