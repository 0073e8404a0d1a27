//! Configuration file loading and discovery.

use super::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAMES};
use super::types::AppConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (`~/.config/cvrf-tools/`)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path.filter(|p| p.exists()) {
        return Some(path.to_path_buf());
    }

    let cwd = std::env::current_dir().ok();
    let candidates = [
        cwd.clone(),
        cwd.as_deref().and_then(find_git_root),
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME)),
        dirs::home_dir(),
    ];
    candidates
        .iter()
        .flatten()
        .find_map(|dir| find_config_in_dir(dir))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up from `start`.
fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Error type for config file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    // an empty file is a valid, all-default config
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only values that differ from the defaults override, so CLI flags that
    /// were not given leave the file settings alone.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        if other.parsing.max_depth != defaults.parsing.max_depth {
            self.parsing.max_depth = other.parsing.max_depth;
        }
        if other.parsing.max_file_size_mb != defaults.parsing.max_file_size_mb {
            self.parsing.max_file_size_mb = other.parsing.max_file_size_mb;
        }

        if other.output.format != defaults.output.format {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.no_color {
            self.output.no_color = true;
        }

        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
        if other.behavior.verbose {
            self.behavior.verbose = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    format!(
        "# cvrf-tools configuration\n\
         # Place this file at .cvrf-tools.yaml in your project root or ~/.config/cvrf-tools/\n\n\
         {}",
        serde_yaml::to_string(&AppConfig::default()).unwrap_or_default()
    )
}
