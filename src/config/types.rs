//! Configuration types for cvrf-tools.

use super::defaults::{DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_PARSING_MAX_DEPTH};
use crate::parsers::CvrfParser;
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI flags are merged over file settings with [`AppConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Parser limits
    pub parsing: ParsingConfig,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the product tree nesting ceiling.
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.parsing.max_depth = max_depth;
        self
    }

    /// Set the advisory size limit in megabytes.
    pub const fn max_file_size_mb(mut self, size: u64) -> Self {
        self.config.parsing.max_file_size_mb = size;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Enable verbose logging.
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.config.behavior.verbose = verbose;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

/// Limits applied while reading advisories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ParsingConfig {
    /// Maximum product tree nesting depth; the root counts as depth 1
    pub max_depth: usize,
    /// Largest advisory file accepted, in megabytes
    pub max_file_size_mb: u64,
}

impl ParsingConfig {
    /// Size limit in bytes.
    #[must_use]
    pub const fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// A parser honoring these limits.
    #[must_use]
    pub fn parser(&self) -> CvrfParser {
        CvrfParser::new().max_depth(self.max_depth)
    }
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_PARSING_MAX_DEPTH,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

/// Behavior flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Suppress non-essential output
    pub quiet: bool,
    /// Enable debug logging
    pub verbose: bool,
}
