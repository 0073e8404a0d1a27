//! cvrf-tools: CVRF advisory product tree inspection tool
//!
//! Reads CVRF 1.1/1.2 XML advisories, resolves their product trees and
//! reports products, branches and consistency problems.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use cvrf_tools::{
    cli::{self, ProductFilter},
    config::{self, AppConfig},
    pipeline::{exit_codes, should_color_logs},
    reports::ReportFormat,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported advisory formats:",
        "\n  CVRF: 1.1, 1.2 (XML)",
        "\n\nOutput formats:",
        "\n  summary, table, json"
    )
}

#[derive(Parser)]
#[command(name = "cvrf-tools")]
#[command(version, long_version = build_long_version())]
#[command(about = "Inspect the product trees of CVRF security advisories", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Validation found problems
    3  Error occurred

EXAMPLES:
    # Show the product tree of an advisory
    cvrf-tools view advisory.xml

    # List every product as JSON
    cvrf-tools products advisory.xml -o json > products.json

    # Products below a vendor branch that carry a CPE
    cvrf-tools products advisory.xml --vendor Cisco --cpe -o table

    # CI check
    cvrf-tools validate advisory.xml --fail-on-warning")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum product tree nesting depth
    #[arg(long, global = true, value_name = "N")]
    max_depth: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

/// Output options shared by the report commands
#[derive(clap::Args)]
struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show document metadata and the product tree
    View {
        /// Path to the advisory
        file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List the products of an advisory in document order
    Products {
        /// Path to the advisory
        file: PathBuf,

        /// Only products below a branch with this name (case-insensitive)
        #[arg(long)]
        vendor: Option<String>,

        /// Only products that carry a CPE
        #[arg(long)]
        cpe: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List the branches of an advisory, descendants first
    Branches {
        /// Path to the advisory
        file: PathBuf,

        /// Only branches of this type, e.g. Vendor or "Product Version"
        #[arg(long = "type", value_name = "TYPE")]
        branch_type: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Check an advisory for duplicate ids, bad CPEs and dangling references
    Validate {
        /// Path to the advisory
        file: PathBuf,

        /// Exit with code 1 on warnings as well as errors
        #[arg(long)]
        fail_on_warning: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print the discovered config file
    Path,
    /// Generate an example .cvrf-tools.yaml in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so reports on stdout stay machine-readable
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(should_color_logs(cli.no_color))
                .with_writer(io::stderr),
        )
        .init();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::View { ref file, ref output } => {
            let config = effective_config(&cli, output)?;
            cli::run_view(file, &config)?;
            Ok(exit_codes::SUCCESS)
        }

        Commands::Products {
            ref file,
            ref vendor,
            cpe,
            ref output,
        } => {
            let config = effective_config(&cli, output)?;
            let filter = ProductFilter {
                vendor: vendor.clone(),
                cpe_only: cpe,
            };
            cli::run_products(file, &config, &filter)?;
            Ok(exit_codes::SUCCESS)
        }

        Commands::Branches {
            ref file,
            ref branch_type,
            ref output,
        } => {
            let config = effective_config(&cli, output)?;
            cli::run_branches(file, &config, branch_type.as_deref())?;
            Ok(exit_codes::SUCCESS)
        }

        Commands::Validate {
            ref file,
            fail_on_warning,
            ref output,
        } => {
            let config = effective_config(&cli, output)?;
            cli::run_validate(file, &config, fail_on_warning)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "cvrf-tools", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { ref output } => {
            let schema =
                config::generate_json_schema().context("failed to generate config schema")?;
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { ref action } => {
            run_config_action(action, cli.config.as_deref())?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

/// Merge the config file with global flags and command output options, then validate.
fn effective_config(cli: &Cli, output: &OutputArgs) -> Result<AppConfig> {
    let overrides = AppConfig::builder()
        .no_color(cli.no_color)
        .quiet(cli.quiet)
        .verbose(cli.verbose)
        .build();
    let (mut config, loaded_from) =
        AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }

    // explicit values win even when they equal the defaults
    if let Some(depth) = cli.max_depth {
        config.parsing.max_depth = depth;
    }
    if let Some(format) = output.output {
        config.output.format = format;
    }
    if output.output_file.is_some() {
        config.output.file.clone_from(&output.output_file);
    }

    Ok(config.validated()?)
}

fn run_config_action(action: &ConfigAction, explicit: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let (config, loaded_from) = config::load_or_default(explicit);
            match &loaded_from {
                Some(path) => eprintln!("# Loaded from: {}", path.display()),
                None => eprintln!("# No config file found; showing defaults"),
            }
            let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => match config::discover_config_file(explicit) {
            Some(path) => println!("{}", path.display()),
            None => eprintln!("No config file found."),
        },
        ConfigAction::Init => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".cvrf-tools.yaml");
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            std::fs::write(&target, config::generate_example_config())
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
        }
    }
    Ok(())
}
