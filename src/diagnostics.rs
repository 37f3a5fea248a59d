use std::fmt::Write as _;
use std::path::Path;

use crate::error::Error;
use crate::style::{IGNORE_START, IGNORE_STOP};
use crate::toc::TOC_STOP;

/// ANSI bold.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// One-line instruction for resolving `e`, when the user can act on it.
fn fix_hint(e: &Error) -> Option<String> {
    return match e {
        Error::HeaderTooDeep { previous_level, .. } => Some(format!(
            "use at most level {} here, or add the missing intermediate heading",
            previous_level.saturating_add(1)
        )),
        Error::IgnoreMarker { .. } => Some(format!("pair every `{IGNORE_START}` with a following `{IGNORE_STOP}`")),
        Error::Io(_) | Error::Json(_) => None,
        Error::MissingTocStop => Some(format!("add `{TOC_STOP}` where the table of contents should end")),
        Error::Regex(_) => {
            Some("pass a shorter template with `--copyright`, or set `copyright` in `.dochooks.toml`".to_string())
        },
        Error::TomlDe(_) => Some("correct `.dochooks.toml`, or delete it to use the defaults".to_string()),
    };
}

/// Render an error as markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
    return;
}

/// Print a per-file failure as `Error in `{path}`: {message}` to stderr,
/// followed by the fix hint when there is one.
pub fn print_file_error(path: &Path, e: &Error) {
    eprintln!("Error in `{}`: {e}", path.display());
    if let Some(hint) = fix_hint(e) {
        eprintln!("  fix: {hint}");
    }
    return;
}

/// Render an error as a markdown block: what happened, then how to fix it.
pub fn render_error(e: &Error) -> String {
    let mut out = format!("# Error: {}\n\n{e}\n", title(e));
    if let Some(hint) = fix_hint(e) {
        let _ = write!(out, "\n## Fix\n\n{hint}\n");
    }
    return out;
}

/// Heading for the markdown block of `e`.
const fn title(e: &Error) -> &'static str {
    return match e {
        Error::HeaderTooDeep { .. } => "Header Too Deep",
        Error::IgnoreMarker { .. } => "Unbalanced Doc-Style Markers",
        Error::Io(_) => "I/O",
        Error::Json(_) => "JSON Output",
        Error::MissingTocStop => "Missing tocstop",
        Error::Regex(_) => "Invalid Copyright Template",
        Error::TomlDe(_) => "Invalid Config",
    };
}
