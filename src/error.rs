//! Crate-level error type.
//!
//! Library modules return their own narrow errors ([`TreeError`],
//! [`ParseError`]). [`CvrfError`] is what the pipeline hands to the command
//! handlers: it wraps them together with a readable trail of what was being
//! done when the error happened, built with [`ErrorContext`].

use crate::parsers::ParseError;
use crate::tree::TreeError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cvrf-tools operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CvrfError {
    /// Errors while reading an advisory or resolving its product tree
    #[error("Failed to parse advisory: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseError,
    },

    /// IO errors with context
    #[error("IO error: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenient Result type for cvrf-tools operations
pub type Result<T> = std::result::Result<T, CvrfError>;

impl CvrfError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error naming the file involved
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        Self::Io {
            message: path.display().to_string(),
            path: Some(path),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The product tree failure behind this error, if any.
    #[must_use]
    pub fn tree_error(&self) -> Option<&TreeError> {
        match self {
            Self::Parse {
                source: ParseError::Tree(err),
                ..
            } => Some(err),
            _ => None,
        }
    }
}

impl From<ParseError> for CvrfError {
    fn from(err: ParseError) -> Self {
        Self::parse(String::new(), err)
    }
}

impl From<TreeError> for CvrfError {
    fn from(err: TreeError) -> Self {
        Self::parse("resolving product tree", ParseError::Tree(err))
    }
}

/// Extension trait for adding context to errors.
///
/// Context strings are chained outermost first, so the rendered message
/// reads like a call trail:
///
/// ```
/// use cvrf_tools::error::{CvrfError, ErrorContext, Result};
///
/// fn inner() -> Result<()> {
///     Err(CvrfError::config("max_depth must be positive"))
/// }
///
/// let err = inner().context("loading .cvrf-tools.yaml").unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Invalid configuration: loading .cvrf-tools.yaml: max_depth must be positive"
/// );
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<CvrfError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| add_context_to_error(e.into(), &f().into()))
    }
}

fn add_context_to_error(err: CvrfError, new_ctx: &str) -> CvrfError {
    match err {
        CvrfError::Parse { context, source } => CvrfError::Parse {
            context: chain_context(new_ctx, &context),
            source,
        },
        CvrfError::Io {
            path,
            message,
            source,
        } => CvrfError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        CvrfError::Config(msg) => CvrfError::Config(chain_context(new_ctx, &msg)),
    }
}

/// "`new`: `existing`", or just `new` when there is nothing to chain onto.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
