//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use ontoscope::{OntoscopeError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for OntoscopeError {
    fn from(err: ConfigError) -> Self {
        OntoscopeError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (ontoscope/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or fails validation
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, OntoscopeError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("ontoscope/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "ontoscope", "ontoscope") {
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

/// Load and validate configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, OntoscopeError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let layout = config.layout();
    let min_radius = layout.min_circle_radius();
    if !min_radius.is_finite() || min_radius < 0.0 {
        return Err(ConfigError::Validation(
            "layout.min_circle_radius must not be negative".to_string(),
        ));
    }
    let spacing = layout.spacing_per_class();
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(ConfigError::Validation(
            "layout.spacing_per_class must be positive".to_string(),
        ));
    }
    if config.resolve().strategies().is_empty() {
        return Err(ConfigError::Validation(
            "resolve.strategies must name at least one strategy".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_explicit_path_loaded() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[layout]\nmin_circle_radius = 12.0\n").expect("write config");

        let config = load_config(Some(&path)).expect("config loads");
        assert_eq!(config.layout().min_circle_radius(), 12.0);
        assert_eq!(config.layout().spacing_per_class(), 5.0);
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempdir().expect("temp dir");
        let result = load_config(Some(dir.path().join("absent.toml")));
        assert!(matches!(result, Err(OntoscopeError::Config(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[layout\n").expect("write config");

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(OntoscopeError::Config(msg)) if msg.contains("parse")));
    }

    #[test]
    fn test_empty_strategy_list_rejected() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[resolve]\nstrategies = []\n").expect("write config");

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(OntoscopeError::Config(msg)) if msg.contains("strategies")));
    }
}
