//! Configuration for cvrf-tools.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```
//! use cvrf_tools::config::{AppConfig, Validatable};
//! use cvrf_tools::reports::ReportFormat;
//!
//! let config = AppConfig::builder()
//!     .max_depth(64)
//!     .output_format(ReportFormat::Json)
//!     .build();
//! assert!(config.is_valid());
//! ```
//!
//! # Configuration File
//!
//! Place a `.cvrf-tools.yaml` file in your project root or `~/.config/cvrf-tools/`:
//!
//! ```yaml
//! parsing:
//!   max_depth: 64
//!   max_file_size_mb: 32
//! output:
//!   format: table
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_PARSING_MAX_DEPTH, MAX_PARSING_DEPTH};
pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};
pub use types::{AppConfig, AppConfigBuilder, BehaviorConfig, OutputConfig, ParsingConfig};
pub use validation::{ConfigError, Validatable};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use it to validate and autocomplete `.cvrf-tools.yaml`.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
