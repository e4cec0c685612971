//! Configuration file loading for the CLI
//!
//! This module finds and loads the TOML configuration file from the usual
//! locations (explicit path, local directory, platform directory) and applies
//! command-line overrides on top of it.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use tickmark::{TickmarkError, config::AppConfig};

use crate::Args;

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for TickmarkError {
    fn from(err: ConfigError) -> Self {
        TickmarkError::Configuration(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (tickmark/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, TickmarkError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("tickmark/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "tickmark", "tickmark") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Apply the render flags given on the command line.
pub fn apply_overrides(config: &mut AppConfig, args: &Args) {
    let render = config.render_mut();
    let mut updated = render.clone();

    if let Some(cell_height) = args.cell_height {
        updated = updated.with_cell_height(cell_height);
    }
    if let Some(cell_width) = args.cell_width {
        updated = updated.with_cell_width(cell_width);
    }
    if let Some(line_width) = args.line_width {
        updated = updated.with_line_width(line_width);
    }
    if let Some(font) = &args.font {
        updated = updated.with_font(font.as_str());
    }
    if let Some(font_size) = args.font_size {
        updated = updated.with_font_size(font_size);
    }
    if args.grid {
        updated = updated.with_grid(true);
    }

    debug!(render:? = updated; "Render configuration");
    *render = updated;
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, TickmarkError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}
