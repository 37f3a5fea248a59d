//! Hook commands for dochooks: toc, links, copyright, doc-style.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use walkdir::WalkDir;

use crate::config::Config;
use crate::copyright::{self, CopyrightCheck, CopyrightValidator};
use crate::diagnostics;
use crate::error::Error;
use crate::links::{DiskContent, LinkChecker, Violation};
use crate::style::StyleChecker;
use crate::toc;

/// How `links` prints violations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON array of violation objects.
    Json,
    /// One `path:line: [label](destination): message` line per violation.
    #[default]
    Text,
}

/// Options for the `links` command after CLI and config are merged.
pub struct LinksOptions {
    /// Skip file existence checks; only validate fragments.
    pub anchors_only: bool,
    /// Output format for violations.
    pub format: OutputFormat,
    /// Root for `/`-prefixed destinations.
    pub repo_root: PathBuf,
}

/// Check every path for a copyright header, printing the header to add
/// for each file that lacks one.
///
/// # Errors
///
/// Returns `Error::Regex` if the copyright template cannot be compiled.
pub fn copyright(paths: &[PathBuf], template: &str, year: i16) -> Result<ExitCode, Error> {
    let validator = CopyrightValidator::new(template, year)?;
    let mut failed = false;

    for path in paths {
        match validator.validate(path) {
            Ok(CopyrightCheck::Missing(suggestion)) => {
                failed = true;
                eprintln!("Missing copyright in {}:\n{suggestion}", path.display());
            },
            Ok(CopyrightCheck::Present) => {},
            Ok(CopyrightCheck::Skipped(copyright::NOT_UTF8)) => {
                log::warn!("skipping {}: {}", path.display(), copyright::NOT_UTF8);
            },
            Ok(CopyrightCheck::Skipped(reason)) => {
                log::debug!("skipping {}: {reason}", path.display());
            },
            Err(e) => {
                failed = true;
                diagnostics::print_file_error(path, &e);
            },
        }
    }

    return Ok(exit_code(failed));
}

/// Rewrite discouraged words in every markdown path.
///
/// # Errors
///
/// Returns `Error::Regex` if the word pattern cannot be compiled.
pub fn doc_style(paths: &[PathBuf], config: &Config) -> Result<ExitCode, Error> {
    let checker = StyleChecker::new()?;
    let failed = rewrite_each(paths, config, |content| return checker.apply(content));
    return Ok(exit_code(failed));
}

/// Map "anything failed" to the process exit code.
fn exit_code(failed: bool) -> ExitCode {
    if failed {
        return ExitCode::from(1);
    }
    return ExitCode::SUCCESS;
}

/// Whether `path` has the `.md` extension.
fn is_markdown(path: &Path) -> bool {
    return path.extension().is_some_and(|ext| return ext == "md");
}

/// Validate links in every markdown path, sharing one parse cache.
///
/// # Errors
///
/// Returns `Error::Json` if the JSON report cannot be serialized.
pub fn links(paths: &[PathBuf], config: &Config, options: &LinksOptions) -> Result<ExitCode, Error> {
    let mut checker = LinkChecker::new(options.repo_root.clone(), options.anchors_only, DiskContent);
    let mut violations: Vec<Violation> = Vec::new();
    let mut failed = false;

    for path in markdown_files(paths, config) {
        let result = checker.check_file(&path, |violation| {
            if options.format == OutputFormat::Text {
                println!(
                    "{}:{}: [{}]({}): {}",
                    violation.file.display(),
                    violation.line_number,
                    violation.label,
                    violation.destination,
                    violation.message
                );
            }
            failed = true;
            violations.push(violation);
        });
        match result {
            Ok(_) => {},
            Err(Error::Io(e)) => log::warn!("skipping {}: {e}", path.display()),
            Err(e) => {
                failed = true;
                diagnostics::print_file_error(&path, &e);
            },
        }
    }
    log::debug!("parsed {} markdown files", checker.cache().parsed_files());

    if options.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&violations)?);
    }
    return Ok(exit_code(failed));
}

/// Expand the given paths into the markdown files to check.
///
/// Directories are walked recursively; other paths without `.md` are skipped.
/// The config's include/exclude filters apply to every candidate.
fn markdown_files(paths: &[PathBuf], config: &Config) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(Result::ok)
                    .filter(|e| return e.file_type().is_file() && is_markdown(e.path()))
                    .map(walkdir::DirEntry::into_path),
            );
        } else if is_markdown(path) {
            files.push(path.clone());
        } else {
            log::debug!("skipping non-markdown {}", path.display());
        }
    }

    files.retain(|file| {
        let keep = config.should_scan(file);
        if !keep {
            log::debug!("excluded by config: {}", file.display());
        }
        return keep;
    });
    return files;
}

/// Read a markdown file, or warn and return `None` if it is unreadable.
fn read_markdown(path: &Path) -> Option<String> {
    return match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            log::warn!("skipping {}: {e}", path.display());
            None
        },
    };
}

/// Apply `transform` to every markdown path, writing files that change.
/// Returns whether any file failed.
fn rewrite_each<F>(paths: &[PathBuf], config: &Config, transform: F) -> bool
where
    F: Fn(&str) -> Result<String, Error>,
{
    let mut failed = false;
    for path in markdown_files(paths, config) {
        let Some(content) = read_markdown(&path) else {
            continue;
        };
        let written = transform(&content).and_then(|updated| {
            if updated == content {
                return Ok(());
            }
            std::fs::write(&path, updated)?;
            log::debug!("wrote {}", path.display());
            return Ok(());
        });
        if let Err(e) = written {
            failed = true;
            diagnostics::print_file_error(&path, &e);
        }
    }
    return failed;
}

/// Regenerate the table of contents in every markdown path.
pub fn toc(paths: &[PathBuf], config: &Config) -> ExitCode {
    return exit_code(rewrite_each(paths, config, toc::sync));
}
