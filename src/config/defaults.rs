//! Default values and limits for configuration.

use crate::tree::{DEFAULT_MAX_DEPTH, MAX_SUPPORTED_DEPTH};

/// Default product tree nesting ceiling.
pub const DEFAULT_PARSING_MAX_DEPTH: usize = DEFAULT_MAX_DEPTH;

/// Highest accepted `parsing.max_depth`.
pub const MAX_PARSING_DEPTH: usize = MAX_SUPPORTED_DEPTH;

/// Default advisory size limit in megabytes.
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 256;

/// Config file names searched for, in order of preference.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".cvrf-tools.yaml",
    ".cvrf-tools.yml",
    "cvrf-tools.yaml",
    "cvrf-tools.yml",
];

/// Directory name below the user config directory.
pub const CONFIG_DIR_NAME: &str = "cvrf-tools";
