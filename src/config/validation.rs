//! Configuration validation.

use super::defaults::MAX_PARSING_DEPTH;
use super::types::{AppConfig, BehaviorConfig, OutputConfig, ParsingConfig};
use crate::error::CvrfError;

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.parsing.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl AppConfig {
    /// Validate and hand the config back, joining every problem into one
    /// [`CvrfError::Config`].
    pub fn validated(self) -> crate::Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(self);
        }
        let details: Vec<_> = errors.iter().map(ToString::to_string).collect();
        Err(CvrfError::config(details.join("; ")))
    }
}

impl Validatable for ParsingConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !(1..=MAX_PARSING_DEPTH).contains(&self.max_depth) {
            errors.push(ConfigError {
                field: "parsing.max_depth".to_string(),
                message: format!(
                    "Max depth must be between 1 and {MAX_PARSING_DEPTH}, got {}",
                    self.max_depth
                ),
            });
        }
        if self.max_file_size_mb == 0 {
            errors.push(ConfigError {
                field: "parsing.max_file_size_mb".to_string(),
                message: "Max file size must be at least 1 MB".to_string(),
            });
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(parent) = self.file.as_deref().and_then(std::path::Path::parent) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                errors.push(ConfigError {
                    field: "output.file".to_string(),
                    message: format!("Parent directory does not exist: {}", parent.display()),
                });
            }
        }
        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.quiet && self.verbose {
            errors.push(ConfigError {
                field: "behavior".to_string(),
                message: "'quiet' and 'verbose' cannot both be set".to_string(),
            });
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_validated() {
        assert!(AppConfig::default().validated().is_ok());

        let err = AppConfig::builder()
            .max_depth(0)
            .max_file_size_mb(0)
            .build()
            .validated()
            .unwrap_err();
        assert!(matches!(err, CvrfError::Config(_)));
        assert_eq!(
            err.to_string(),
            format!(
                "Invalid configuration: parsing.max_depth: Max depth must be between 1 and {MAX_PARSING_DEPTH}, got 0; \
                 parsing.max_file_size_mb: Max file size must be at least 1 MB"
            )
        );
    }

    #[test]
    fn test_max_depth_bounds() {
        let mut parsing = ParsingConfig::default();
        parsing.max_depth = 0;
        let errors = parsing.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "parsing.max_depth");

        parsing.max_depth = MAX_PARSING_DEPTH;
        assert!(parsing.is_valid());
        parsing.max_depth = MAX_PARSING_DEPTH + 1;
        assert!(!parsing.is_valid());
    }

    #[test]
    fn test_zero_file_size() {
        let parsing = ParsingConfig {
            max_file_size_mb: 0,
            ..ParsingConfig::default()
        };
        assert_eq!(parsing.validate()[0].field, "parsing.max_file_size_mb");
    }

    #[test]
    fn test_output_file_parent_must_exist() {
        let output = OutputConfig {
            file: Some(PathBuf::from("/nonexistent/dir/report.json")),
            ..OutputConfig::default()
        };
        assert_eq!(output.validate()[0].field, "output.file");

        let output = OutputConfig {
            file: Some(PathBuf::from("report.json")),
            ..OutputConfig::default()
        };
        assert!(output.is_valid());
    }

    #[test]
    fn test_errors_are_collected_across_sections() {
        let config = AppConfig::builder()
            .max_depth(0)
            .max_file_size_mb(0)
            .quiet(true)
            .verbose(true)
            .build();
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["parsing.max_depth", "parsing.max_file_size_mb", "behavior"]
        );
    }
}
