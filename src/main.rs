mod anchor;
mod commands;
mod config;
mod copyright;
mod diagnostics;
mod error;
mod links;
mod scanner;
mod style;
mod toc;
mod types;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands::{LinksOptions, OutputFormat};
use crate::config::Config;

/// Exit code for failures before any file is checked.
const FATAL: u8 = 2;

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "dochooks", version, about = "Pre-commit checks for markdown documentation")]
struct Cli {
    /// Hook to run.
    #[command(subcommand)]
    command: Commands,
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// One subcommand per pre-commit hook.
#[derive(Subcommand)]
enum Commands {
    /// Check files for a copyright header
    Copyright {
        /// Copyright template; `YYYY` matches any year
        #[arg(long)]
        copyright: Option<String>,
        /// Files to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Replace words discouraged by the Google developer documentation style guide
    DocStyle {
        /// Markdown files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Validate relative links and anchors
    Links {
        /// Only check `#fragment` anchors, not file existence
        #[arg(long)]
        anchors_only: bool,
        /// Output format for violations
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Markdown files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Root for `/`-prefixed links; defaults to the git top level
        #[arg(long)]
        repo_root: Option<PathBuf>,
    },
    /// Regenerate tables of contents between `<!-- toc -->` and `<!-- tocstop -->`
    Toc {
        /// Markdown files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

/// Parse arguments, set up logging, and run one hook.
fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    return match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(FATAL)
        },
    };
}

/// Load config and dispatch one subcommand.
///
/// # Errors
///
/// Returns fatal errors only: a malformed config, a copyright template that
/// does not compile, or a report that cannot be serialized.
fn run(command: Commands) -> Result<ExitCode, error::Error> {
    let config = Config::load(Path::new("."))?;

    return match command {
        Commands::Copyright {
            copyright: template_arg,
            paths,
        } => {
            let template = template_arg
                .or_else(|| return config.copyright.clone())
                .unwrap_or_else(|| return copyright::DEFAULT_COPYRIGHT.to_string());
            let year = jiff::Zoned::now().year();
            commands::copyright(&paths, &template, year)
        },
        Commands::DocStyle { paths } => commands::doc_style(&paths, &config),
        Commands::Links {
            anchors_only,
            format,
            paths,
            repo_root,
        } => {
            let options = LinksOptions {
                anchors_only: anchors_only || config.anchors_only,
                format,
                repo_root: config::repo_root(repo_root),
            };
            commands::links(&paths, &config, &options)
        },
        Commands::Toc { paths } => Ok(commands::toc(&paths, &config)),
    };
}
