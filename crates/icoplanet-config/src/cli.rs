//! Command-line argument parsing for the planet generator.

use std::path::PathBuf;

use clap::Parser;
use rand::Rng;

use crate::Config;

/// Planet generator command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "icoplanet", about = "Procedural icosphere planet generator")]
pub struct CliArgs {
    /// Icosphere subdivision level (0-6).
    #[arg(long, allow_negative_numbers = true)]
    pub level: Option<i32>,

    /// Base planet radius.
    #[arg(long)]
    pub radius: Option<f32>,

    /// Liquid level, as an offset from the radius.
    #[arg(long)]
    pub liquid: Option<f32>,

    /// Noise seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Landscape strength multiplier.
    #[arg(long)]
    pub strength: Option<f32>,

    /// Surface texture width in pixels.
    #[arg(long)]
    pub texture_width: Option<u32>,

    /// Surface texture height in pixels.
    #[arg(long)]
    pub texture_height: Option<u32>,

    /// Build the UV-seamed icosphere.
    #[arg(long)]
    pub uv_layout: bool,

    /// Pick a random seed, ignoring `--seed`.
    #[arg(long)]
    pub roll_seed: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log the surface gradients before generating.
    #[arg(long)]
    pub log_gradients: bool,

    /// Output directory for exported files.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// `rng` is only drawn from when `--roll-seed` is given.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs, rng: &mut impl Rng) {
        let planet = &mut self.planet;
        if let Some(level) = args.level {
            planet.general.subdivision_level = level;
        }
        if let Some(radius) = args.radius {
            planet.general.radius = radius;
        }
        if let Some(liquid) = args.liquid {
            planet.general.liquid_level = liquid;
        }
        if args.uv_layout {
            planet.general.uv_layout = true;
        }
        if let Some(seed) = args.seed {
            planet.landscape.seed = seed;
        }
        if args.roll_seed {
            planet.landscape = planet.landscape.with_rolled_seed(rng);
            log::info!("Rolled seed {}", planet.landscape.seed);
        }
        if let Some(strength) = args.strength {
            planet.landscape.strength = strength;
        }
        if let Some(w) = args.texture_width {
            planet.surface.texture_size.width = w;
        }
        if let Some(h) = args.texture_height {
            planet.surface.texture_size.height = h;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if args.log_gradients {
            self.debug.log_gradients = true;
        }
        if let Some(ref dir) = args.output {
            self.output.directory = dir.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            level: Some(5),
            seed: Some(99),
            texture_width: Some(256),
            uv_layout: true,
            output: Some(PathBuf::from("/tmp/planets")),
            ..Default::default()
        };
        config.apply_cli_overrides(&args, &mut StdRng::seed_from_u64(0));
        assert_eq!(config.planet.general.subdivision_level, 5);
        assert!(config.planet.general.uv_layout);
        assert_eq!(config.planet.landscape.seed, 99);
        assert_eq!(config.planet.surface.texture_size.width, 256);
        assert_eq!(config.output.directory, PathBuf::from("/tmp/planets"));
        // Non-overridden fields retain defaults
        assert_eq!(config.planet.surface.texture_size.height, 512);
        assert_eq!(config.planet.general.radius, 1.0);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default(), &mut StdRng::seed_from_u64(0));
        assert_eq!(config, original);
    }

    #[test]
    fn test_roll_seed_wins_over_seed() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(100_000),
            roll_seed: true,
            ..Default::default()
        };
        config.apply_cli_overrides(&args, &mut StdRng::seed_from_u64(7));
        assert!(config.planet.landscape.seed < 100_000);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::try_parse_from([
            "icoplanet",
            "--level",
            "-1",
            "--liquid",
            "0.3",
            "--texture-height",
            "64",
            "--log-gradients",
        ])
        .unwrap();
        assert_eq!(args.level, Some(-1));
        assert_eq!(args.liquid, Some(0.3));
        assert_eq!(args.texture_height, Some(64));
        assert!(args.log_gradients);
        assert!(!args.roll_seed);
    }
}
