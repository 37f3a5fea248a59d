//! Copyright header checks, with comment syntax chosen by file extension.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;

use crate::error::Error;

/// Apache-2.0 header used when neither the CLI nor the config names one.
pub const DEFAULT_COPYRIGHT: &str = "\
Copyright YYYY Google LLC

Licensed under the Apache License, Version 2.0 (the \"License\");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    https://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an \"AS IS\" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.";

/// Skip reason for files that cannot be decoded.
pub const NOT_UTF8: &str = "not valid UTF-8";

/// Placeholder for the year in copyright templates.
const YEAR_PLACEHOLDER: &str = "YYYY";

/// Outcome of checking one path.
#[derive(Debug, PartialEq, Eq)]
pub enum CopyrightCheck {
    /// No matching header; carries the header to add.
    Missing(String),
    /// A matching header is present.
    Present,
    /// The path is not checked, with the reason.
    Skipped(&'static str),
}

/// A compiled header: a pattern accepting any year and the text to suggest.
#[derive(Debug)]
pub struct CopyrightMatcher {
    /// Matches the header with any year.
    pattern: Regex,
    /// The header with the current year filled in.
    suggestion: String,
}

/// Checks files for a copyright header in their comment syntax.
#[derive(Debug)]
pub struct CopyrightValidator {
    /// Per-extension matchers; `None` means files with that extension are skipped.
    by_ext: HashMap<&'static str, Option<CopyrightMatcher>>,
    /// Matcher for extensions without an entry (`#` comments).
    default: CopyrightMatcher,
}

impl CopyrightMatcher {
    /// Compile a header so `YYYY` accepts any run of digits.
    ///
    /// # Errors
    ///
    /// Returns `Error::Regex` if the escaped header is too large to compile.
    fn new(header: &str, year: i16) -> Result<Self, Error> {
        let pattern = regex::escape(header).replace(YEAR_PLACEHOLDER, r"\d+");
        return Ok(Self {
            pattern: Regex::new(&pattern)?,
            suggestion: header.replace(YEAR_PLACEHOLDER, &year.to_string()),
        });
    }

    /// The header with the current year, as it should be added to a file.
    pub fn suggestion(&self) -> &str {
        return &self.suggestion;
    }
}

impl CopyrightValidator {
    /// Matcher for `path`, or `None` when the path is not checked.
    pub fn matcher_for(&self, path: &Path) -> Option<&CopyrightMatcher> {
        if path.file_name().is_some_and(|name| return name == "LICENSE") {
            return None;
        }
        let ext = path.extension().and_then(|e| return e.to_str()).unwrap_or("");
        return match self.by_ext.get(ext) {
            Some(entry) => entry.as_ref(),
            None => Some(&self.default),
        };
    }

    /// Build matchers for every supported comment syntax from one template.
    ///
    /// # Errors
    ///
    /// Returns `Error::Regex` if a header cannot be compiled.
    pub fn new(copyright: &str, year: i16) -> Result<Self, Error> {
        let text = copyright.trim_matches('\n');
        let slash = prefix_lines(text, "// ");

        let mut by_ext = HashMap::new();
        by_ext.insert("cpp", Some(CopyrightMatcher::new(&slash, year)?));
        by_ext.insert("h", Some(CopyrightMatcher::new(&slash, year)?));
        by_ext.insert("js", Some(CopyrightMatcher::new(&format!("/*\n{text}\n*/"), year)?));
        by_ext.insert("json", None);
        by_ext.insert("md", Some(CopyrightMatcher::new(&format!("<!--\n{text}\n-->\n"), year)?));
        by_ext.insert(
            "py",
            Some(CopyrightMatcher::new(&format!("__copyright__ = \"\"\"\n{text}\n\"\"\"\n"), year)?),
        );
        by_ext.insert("rs", Some(CopyrightMatcher::new(&slash, year)?));

        return Ok(Self {
            by_ext,
            default: CopyrightMatcher::new(&prefix_lines(text, "# "), year)?,
        });
    }

    /// Check one path for its copyright header.
    ///
    /// Directories, `LICENSE`, extensions without comments, files that are not
    /// UTF-8, and files of at most one byte are skipped.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read.
    pub fn validate(&self, path: &Path) -> Result<CopyrightCheck, Error> {
        if path.is_dir() {
            return Ok(CopyrightCheck::Skipped("directory"));
        }
        let Some(matcher) = self.matcher_for(path) else {
            return Ok(CopyrightCheck::Skipped("no copyright for this file type"));
        };

        let Ok(content) = String::from_utf8(std::fs::read(path)?) else {
            return Ok(CopyrightCheck::Skipped(NOT_UTF8));
        };
        if content.len() <= 1 {
            return Ok(CopyrightCheck::Skipped("empty file"));
        }

        if matcher.pattern.is_match(&content) {
            return Ok(CopyrightCheck::Present);
        }
        return Ok(CopyrightCheck::Missing(matcher.suggestion().to_string()));
    }
}

/// Comment out every line of `text` with `prefix`, ending with a newline.
/// Blank lines get the prefix without its trailing space.
fn prefix_lines(text: &str, prefix: &str) -> String {
    let bare = prefix.trim_end();
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        if line.trim().is_empty() {
            out.push_str(bare);
        } else {
            out.push_str(prefix);
            out.push_str(line);
        }
        out.push('\n');
    }
    return out;
}
