//! bem-lint CLI tool.
//!
//! Usage:
//! ```bash
//! bem-lint check [OPTIONS] [PATH]
//! bem-lint list-rules
//! bem-lint init
//! ```
//!
//! `check` reads stylesheet AST dumps (`*.ast.json`) produced by a CSS
//! parser such as postcss.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Checks BEM block/element/modifier naming in nested stylesheets.
///
/// Nested selectors are resolved against their parents before checking, and
/// every finding points back at the text that was written.
#[derive(Parser)]
#[command(name = "bem-lint")]
#[command(author, version, about)]
struct Cli {
    /// Log resolution and rule progress (debug level) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// bem-lint.toml to use instead of searching the project
    #[arg(short, long, global = true, env = "BEM_LINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint stylesheet AST dumps
    Check {
        /// A `*.ast.json` dump, or a directory searched for them
        #[arg(default_value = ".")]
        path: PathBuf,

        /// How violations are printed
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run these rules, by name or code (`no-side-effects,BEM002`)
        #[arg(long)]
        rules: Option<String>,

        /// Glob of dumps to skip, e.g. `**/vendor/**` (repeatable)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// Show the BEM rules and presets
    ListRules,

    /// Write a commented bem-lint.toml with default separators
    Init {
        /// Replace an existing bem-lint.toml
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Grouped by file, with labels and fix hints.
    #[default]
    Text,
    /// The full lint result as JSON.
    Json,
    /// `file:line:col: severity [code] message`, one per line.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            exclude,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            commands::check::run(&path, format, rules, exclude, &source)
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
