//! Output handling for reports.

use crate::error::{CvrfError, ErrorContext, Result};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }

    /// Check if output is to a terminal
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stdout) && std::io::stdout().is_terminal()
    }
}

fn color_allowed(no_color_flag: bool) -> bool {
    !no_color_flag && std::env::var_os("NO_COLOR").is_none()
}

/// Determine if color should be used based on flags, environment and target.
///
/// Files never get ANSI escapes.
#[must_use]
pub fn should_use_color(no_color_flag: bool, target: &OutputTarget) -> bool {
    color_allowed(no_color_flag) && target.is_terminal()
}

/// Same decision for log lines, which go to stderr.
#[must_use]
pub fn should_color_logs(no_color_flag: bool) -> bool {
    color_allowed(no_color_flag) && std::io::stderr().is_terminal()
}

/// Write output to the target (stdout or file)
pub fn write_output(content: &str, target: &OutputTarget, quiet: bool) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            println!("{content}");
        }
        OutputTarget::File(path) => {
            std::fs::write(path, content)
                .map_err(|err| CvrfError::io(path, err))
                .context("Failed to write output")?;
            if !quiet {
                tracing::info!("Report written to {}", path.display());
            }
        }
    }
    Ok(())
}
