use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::Error;

/// Name of the optional config file in the working directory.
pub const CONFIG_FILE: &str = ".dochooks.toml";

/// Project configuration loaded from `.dochooks.toml`.
/// Include/exclude patterns are path prefixes applied to markdown files.
#[derive(Debug, Default)]
pub struct Config {
    /// Default for `links --anchors-only`.
    pub anchors_only: bool,
    /// Default copyright template for `copyright`.
    pub copyright: Option<String>,
    /// Prefixes to skip.
    exclude: Vec<String>,
    /// Prefixes to check; empty means everything.
    include: Vec<String>,
}

/// Raw TOML structure for `.dochooks.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct DochooksToml {
    /// See [`Config::anchors_only`].
    #[serde(default)]
    anchors_only: bool,
    /// See [`Config::copyright`].
    #[serde(default)]
    copyright: Option<String>,
    /// Path prefixes to skip.
    #[serde(default)]
    exclude: Vec<String>,
    /// Path prefixes to check.
    #[serde(default)]
    include: Vec<String>,
}

impl Config {
    /// Load config from `.dochooks.toml` in `root`.
    /// A missing file yields defaults; a file that exists is never ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: DochooksToml = toml::from_str(&content)?;
        log::debug!("loaded {}", path.display());
        return Ok(Self {
            anchors_only: raw.anchors_only,
            copyright: raw.copyright,
            exclude: raw.exclude,
            include: raw.include,
        });
    }

    /// Whether a markdown path should be checked.
    ///
    /// Included when there are no include prefixes or one of them matches;
    /// then dropped if any exclude prefix matches.
    pub fn should_scan(&self, path: &Path) -> bool {
        let path = path.strip_prefix(".").unwrap_or(path);
        let text = path.to_string_lossy();
        let included =
            self.include.is_empty() || self.include.iter().any(|p| return text.starts_with(p.as_str()));
        if !included {
            return false;
        }
        return !self.exclude.iter().any(|p| return text.starts_with(p.as_str()));
    }
}

/// Root used to resolve `/`-prefixed link paths.
///
/// Uses `explicit` when given, else asks git for the top level of the working
/// tree, else falls back to the current directory with a warning.
pub fn repo_root(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(root) = explicit {
        return root;
    }
    let output = Command::new("git").args(["rev-parse", "--show-toplevel"]).output();
    if let Ok(out) = output
        && out.status.success()
    {
        let top = String::from_utf8_lossy(&out.stdout).trim().to_string();
        if !top.is_empty() {
            return PathBuf::from(top);
        }
    }
    log::warn!("not inside a git repository; resolving `/` links from the current directory");
    return PathBuf::from(".");
}
