//! Shared orchestration for the CLI commands.
//!
//! Every command follows the same read → resolve → report → write flow;
//! this module holds the steps that do not depend on the command.

mod output;
mod parse;

pub use output::{should_color_logs, should_use_color, write_output, OutputTarget};
pub use parse::parse_document_with_context;

/// Process exit codes
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// `validate` found problems in the advisory
    pub const VALIDATION_FAILED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}
