//! CLI command handlers.
//!
//! Testable command handlers invoked by main.rs. Each handler reads one
//! advisory, builds its report and writes it to the configured target.

mod branches;
mod products;
pub mod validate;
mod view;

pub use branches::run_branches;
pub use products::{run_products, ProductFilter};
pub use validate::{collect_findings, run_validate};
pub use view::run_view;

use crate::config::AppConfig;
use crate::pipeline::{should_use_color, write_output, OutputTarget};
use crate::reports::{create_reporter, ReportError, ReportGenerator};
use anyhow::Result;

/// Generate a report with the configured format and write it out.
fn emit<F>(config: &AppConfig, generate: F) -> Result<()>
where
    F: FnOnce(&dyn ReportGenerator) -> Result<String, ReportError>,
{
    let target = OutputTarget::from_option(config.output.file.clone());
    let colored = should_use_color(config.output.no_color, &target);
    let reporter = create_reporter(config.output.format, colored);
    let report = generate(reporter.as_ref())?;
    write_output(&report, &target, config.behavior.quiet)?;
    Ok(())
}
