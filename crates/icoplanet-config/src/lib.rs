//! Configuration for the planet generator.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line via clap. Partial files fill in defaults.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE, Config, DebugConfig, OutputConfig, default_config_dir};
pub use error::ConfigError;
