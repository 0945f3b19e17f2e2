//! Command-line planet generator.
//!
//! Loads `config.ron` (creating it on first run), applies command-line
//! overrides, runs the generation pipeline and exports the mesh as OBJ and the
//! surface lookup texture as PNG.

mod export;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use icoplanet_config::{CliArgs, Config, ConfigError, default_config_dir};
use icoplanet_planet::{Pipeline, PipelineError};
use icoplanet_surface::{PREVIEW_HEIGHT, PREVIEW_WIDTH, SurfaceError};
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors that end a generator run.
#[derive(Error, Debug)]
pub enum DemoError {
    #[error("no config directory available; pass --config")]
    NoConfigDir,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("gradient preview failed: {0}")]
    Preview(#[from] SurfaceError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let Some(config_dir) = args.config.clone().or_else(default_config_dir) else {
        eprintln!("{}", DemoError::NoConfigDir);
        return ExitCode::FAILURE;
    };

    // The log level comes from the config, so loading happens before logging
    // is up. Anything worth keeping from this phase is logged again below.
    let (mut config, load_error) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args, &mut rand::rng());

    let log_dir = config_dir.join("logs");
    icoplanet_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match load_error {
        None => info!(dir = %config_dir.display(), "using config"),
        Some(e) => warn!(error = %e, "failed to load config, using defaults"),
    }
    if let Some(seed) = rolled_seed(&args, &config) {
        info!(seed, "rolled seed");
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "planet generation failed");
            ExitCode::FAILURE
        }
    }
}

/// The seed picked by `--roll-seed`, if one was rolled.
fn rolled_seed(args: &CliArgs, config: &Config) -> Option<u32> {
    args.roll_seed.then_some(config.planet.landscape.seed)
}

fn run(config: &Config) -> Result<(), DemoError> {
    let settings = &config.planet;
    info!(
        level = settings.general.subdivision_level,
        seed = settings.landscape.seed,
        radius = settings.general.radius,
        "generating planet"
    );
    settings.validate()?;

    if config.debug.log_gradients {
        log_gradients(config)?;
    }

    let mut pipeline = Pipeline::default();
    let output = pipeline.generate(settings)?;

    let out = &config.output;
    if out.write_mesh || out.write_texture {
        std::fs::create_dir_all(&out.directory)?;
    }

    match output.mesh {
        Some(mesh) if out.write_mesh => {
            let path = out.mesh_path();
            export::write_obj(&mesh, &path)?;
            info!(path = %path.display(), vertices = mesh.vertex_count(), "wrote mesh");
        }
        _ => {}
    }

    match output.surface {
        Some(surface) if out.write_texture => {
            let path = out.texture_path();
            export::write_png(&surface.pixels, &path)?;
            info!(
                path = %path.display(),
                normalized_liquid = surface.normalized_liquid,
                "wrote surface texture"
            );
        }
        None if out.write_texture => warn!("surface disabled, no texture written"),
        _ => {}
    }

    pipeline.clear();
    Ok(())
}

/// Log each surface gradient and write a preview strip next to the outputs.
fn log_gradients(config: &Config) -> Result<(), DemoError> {
    let dir = &config.output.directory;
    std::fs::create_dir_all(dir)?;
    for (name, gradient) in config.planet.surface.named_gradients() {
        info!("{name} gradient\n{gradient}");
        let preview = gradient.to_texture(PREVIEW_WIDTH, PREVIEW_HEIGHT)?;
        export::write_png(&preview, &preview_path(dir, name))?;
    }
    Ok(())
}

fn preview_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("gradient_{}.png", name.replace(' ', "_")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.planet.general.subdivision_level = 2;
        config.planet.surface.texture_size.width = 32;
        config.planet.surface.texture_size.height = 16;
        config.output.directory = dir.to_path_buf();
        config
    }

    #[test]
    fn test_run_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        run(&config).unwrap();
        assert!(config.output.mesh_path().exists());
        assert!(config.output.texture_path().exists());
    }

    #[test]
    fn test_run_respects_write_flags() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.output.write_mesh = false;
        run(&config).unwrap();
        assert!(!config.output.mesh_path().exists());
        assert!(config.output.texture_path().exists());
    }

    #[test]
    fn test_run_reports_out_of_range_level() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.planet.general.subdivision_level = -1;
        let err = run(&config).unwrap_err();
        assert!(matches!(err, DemoError::Pipeline(PipelineError::Mesh(_))));
        assert!(!config.output.mesh_path().exists());
    }

    #[test]
    fn test_log_gradients_writes_previews() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.debug.log_gradients = true;
        config.output.write_mesh = false;
        config.output.write_texture = false;
        run(&config).unwrap();
        for name in ["height", "depth", "climate_height", "climate_depth"] {
            let path = dir.path().join(format!("gradient_{name}.png"));
            assert!(path.exists(), "missing {}", path.display());
        }
    }

    #[test]
    fn test_invalid_texture_writes_no_previews() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.debug.log_gradients = true;
        config.planet.surface.texture_size.width = 0;
        let err = run(&config).unwrap_err();
        assert!(matches!(err, DemoError::Pipeline(PipelineError::Surface(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_rolled_seed_reported_only_when_rolled() {
        let mut config = Config::default();
        let mut args = CliArgs::default();
        config.apply_cli_overrides(&args, &mut rand::rng());
        assert_eq!(rolled_seed(&args, &config), None);

        args.roll_seed = true;
        config.apply_cli_overrides(&args, &mut rand::rng());
        assert_eq!(rolled_seed(&args, &config), Some(config.planet.landscape.seed));
    }
}
