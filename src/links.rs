//! Link validation across markdown files, with a per-run parse cache.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Error;
use crate::scanner;
use crate::types::Link;

/// Reported when a destination has a host but no scheme (`//host/path`).
pub const MISSING_SCHEME: &str = "Link is missing a scheme, such as https://.";

/// Reported when a fragment does not match any anchor in the target document.
pub const NONEXISTENT_ANCHOR: &str = "Link points at a non-existent anchor.";

/// Reported when a path destination resolves to nothing on disk.
pub const NONEXISTENT_FILE: &str = "Link points at a non-existent file.";

/// Reported when a linked file exists but cannot be read as UTF-8 text.
pub const UNREADABLE_FILE: &str = "Link points at a file that cannot be read.";

/// File a directory link stands for when it carries a fragment.
const DIRECTORY_INDEX: &str = "README.md";

/// Supplies the text of markdown files to the link cache.
pub trait ContentProvider {
    /// Read the full UTF-8 contents of `path`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read or is not UTF-8.
    fn read(&self, path: &Path) -> Result<String, Error>;
}

/// Anchors and links of one parsed file.
#[derive(Debug)]
struct CachedFile {
    /// Anchors of every heading in the file.
    anchors: HashSet<String>,
    /// Links in document order.
    links: Vec<Link>,
}

/// A destination split into URL components. Empty means absent.
#[derive(Debug, PartialEq, Eq)]
struct Destination<'a> {
    /// Text after the first `#`.
    fragment: &'a str,
    /// Host part after `//`.
    netloc: &'a str,
    /// Path part, without query or fragment.
    path: &'a str,
    /// Scheme before the first `:`, when well-formed.
    scheme: &'a str,
}

/// Reads files straight from disk.
pub struct DiskContent;

/// Parses each file at most once per run, keyed by canonical path.
pub struct LinkCache<P> {
    /// Parsed files by canonical path.
    files: HashMap<PathBuf, CachedFile>,
    /// Where file contents come from.
    provider: P,
}

/// Validates the links of markdown files against the repository tree.
pub struct LinkChecker<P> {
    /// Skip file-existence and cross-file checks.
    anchors_only: bool,
    /// Parsed files shared by every file checked in this run.
    cache: LinkCache<P>,
    /// Directory that `/`-rooted paths resolve against.
    repo_root: PathBuf,
}

/// One broken link, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Raw link destination.
    pub destination: String,
    /// File containing the link, as given on the command line.
    pub file: PathBuf,
    /// Rendered link text.
    pub label: String,
    /// One-based line of the link.
    pub line_number: usize,
    /// Human-readable reason.
    pub message: &'static str,
}

impl ContentProvider for DiskContent {
    fn read(&self, path: &Path) -> Result<String, Error> {
        return Ok(std::fs::read_to_string(path)?);
    }
}

impl<P: ContentProvider> LinkCache<P> {
    /// Anchors and links for `path`, parsing it on first request.
    ///
    /// # Errors
    ///
    /// Returns read errors from the provider or heading errors from extraction.
    fn get(&mut self, path: &Path) -> Result<&CachedFile, Error> {
        let cached = match self.files.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                log::debug!("link cache miss: {}", path.display());
                let content = self.provider.read(path)?;
                let document = scanner::scan(&content)?;
                entry.insert(CachedFile {
                    anchors: document.headers.into_iter().map(|h| return h.anchor).collect(),
                    links: document.links,
                })
            },
        };
        return Ok(cached);
    }

    /// Whether `path` has a heading with `anchor`.
    ///
    /// # Errors
    ///
    /// Returns errors from parsing `path`.
    fn has_anchor(&mut self, path: &Path, anchor: &str) -> Result<bool, Error> {
        return Ok(self.get(path)?.anchors.contains(anchor));
    }

    /// Create an empty cache over `provider`.
    pub fn new(provider: P) -> Self {
        return Self {
            files: HashMap::new(),
            provider,
        };
    }

    /// Number of distinct files parsed so far.
    pub fn parsed_files(&self) -> usize {
        return self.files.len();
    }
}

impl<P: ContentProvider> LinkChecker<P> {
    /// Parsed files shared across this run.
    pub const fn cache(&self) -> &LinkCache<P> {
        return &self.cache;
    }

    /// Validate every link in `path`, calling `report` once per broken link.
    ///
    /// Returns whether any link was broken.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if `path` itself cannot be read, or
    /// `Error::HeaderTooDeep` if this file or a file it links to with a
    /// fragment has invalid heading levels. Linked files that cannot be read
    /// are reported as violations instead.
    pub fn check_file<F>(&mut self, path: &Path, mut report: F) -> Result<bool, Error>
    where
        F: FnMut(Violation),
    {
        let absolute = std::fs::canonicalize(path)?;
        let links = self.cache.get(&absolute)?.links.clone();

        let mut has_errors = false;
        for link in links {
            let Some(message) = self.check_link(&absolute, &link)? else {
                continue;
            };
            has_errors = true;
            report(Violation {
                destination: link.destination,
                file: path.to_path_buf(),
                label: link.label,
                line_number: link.line_number,
                message,
            });
        }
        return Ok(has_errors);
    }

    /// Check a single link, returning the violation message if it is broken.
    ///
    /// # Errors
    ///
    /// Returns errors from canonicalizing or parsing a linked file.
    fn check_link(&mut self, file: &Path, link: &Link) -> Result<Option<&'static str>, Error> {
        let destination = split_destination(&link.destination);

        if !destination.scheme.is_empty() {
            return Ok(None);
        }
        if !destination.netloc.is_empty() {
            return Ok(Some(MISSING_SCHEME));
        }
        if !destination.path.is_empty() {
            if self.anchors_only {
                return Ok(None);
            }
            return self.check_path_link(file, &destination);
        }
        if !destination.fragment.is_empty() && !self.cache.has_anchor(file, destination.fragment)? {
            return Ok(Some(NONEXISTENT_ANCHOR));
        }
        return Ok(None);
    }

    /// Resolve a path destination on disk and check its fragment, if any.
    ///
    /// # Errors
    ///
    /// Returns errors from canonicalizing or parsing the target file.
    fn check_path_link(
        &mut self,
        file: &Path,
        destination: &Destination<'_>,
    ) -> Result<Option<&'static str>, Error> {
        let mut target = match destination.path.strip_prefix('/') {
            Some(rooted) => self.repo_root.join(rooted),
            None => file.parent().unwrap_or(Path::new("")).join(destination.path),
        };

        if target.is_dir() {
            if destination.fragment.is_empty() {
                return Ok(None);
            }
            target.push(DIRECTORY_INDEX);
        }
        if !target.is_file() {
            return Ok(Some(NONEXISTENT_FILE));
        }
        if destination.fragment.is_empty() {
            return Ok(None);
        }

        let target = std::fs::canonicalize(&target)?;
        return match self.cache.has_anchor(&target, destination.fragment) {
            Ok(true) => Ok(None),
            Ok(false) => Ok(Some(NONEXISTENT_ANCHOR)),
            Err(Error::Io(e)) => {
                log::debug!("cannot read link target {}: {e}", target.display());
                Ok(Some(UNREADABLE_FILE))
            },
            Err(e) => Err(e),
        };
    }

    /// Create a checker for one run.
    pub fn new(repo_root: PathBuf, anchors_only: bool, provider: P) -> Self {
        return Self {
            anchors_only,
            cache: LinkCache::new(provider),
            repo_root,
        };
    }
}

/// Whether `candidate` is a well-formed URL scheme (`[A-Za-z][A-Za-z0-9+.-]*`).
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    return first.is_ascii_alphabetic()
        && chars.all(|c| return c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
}

/// Split a link destination into scheme, host, path, and fragment, in the
/// manner of a generic URI split. The query is dropped.
fn split_destination(raw: &str) -> Destination<'_> {
    let (rest, fragment) = raw.split_once('#').unwrap_or((raw, ""));

    let (scheme, rest) = match rest.split_once(':') {
        Some((scheme, after)) if is_scheme(scheme) => (scheme, after),
        _ => ("", rest),
    };

    let (netloc, rest) = match rest.strip_prefix("//") {
        Some(authority) => authority.split_at(authority.find(['/', '?']).unwrap_or(authority.len())),
        None => ("", rest),
    };

    let path = rest.split_once('?').map_or(rest, |(path, _)| return path);

    return Destination {
        fragment,
        netloc,
        path,
        scheme,
    };
}
