//! Google developer documentation style word replacements.

use regex::{Captures, Regex};

use crate::error::Error;

/// Turns checking back on after [`IGNORE_START`].
pub const IGNORE_STOP: &str = "<!-- google-doc-style-resume -->";

/// Turns checking off until [`IGNORE_STOP`].
pub const IGNORE_START: &str = "<!-- google-doc-style-ignore -->";

/// Discouraged words and abbreviations, lowercase, with their replacements.
const REPLACEMENTS: [(&str, &str); 4] = [
    ("cons", "disadvantages"),
    ("e.g.", "for example"),
    ("i.e.", "that is"),
    ("pros", "advantages"),
];

/// Whole words are bounded on both sides; abbreviations end in `.` already.
const WORD_PATTERN: &str = r"(?i)\b(?:(?:cons|pros)\b|e\.g\.|i\.e\.)";

/// Rewrites discouraged words outside ignore regions.
pub struct StyleChecker {
    /// Matches any discouraged word.
    pattern: Regex,
}

impl StyleChecker {
    /// Rewrite discouraged words in `content`, leaving ignore regions untouched.
    ///
    /// # Errors
    ///
    /// Returns `Error::IgnoreMarker` if ignore/resume markers are unbalanced.
    pub fn apply(&self, content: &str) -> Result<String, Error> {
        let mut out = String::with_capacity(content.len());
        for (segment, checked) in split_ignore_regions(content)? {
            if checked {
                out.push_str(&self.pattern.replace_all(segment, |caps: &Captures<'_>| {
                    return replacement_for(caps.get(0).map_or("", |m| return m.as_str()));
                }));
            } else {
                out.push_str(segment);
            }
        }
        return Ok(out);
    }

    /// Compile the word pattern.
    ///
    /// # Errors
    ///
    /// Returns `Error::Regex` if the pattern fails to compile.
    pub fn new() -> Result<Self, Error> {
        return Ok(Self {
            pattern: Regex::new(WORD_PATTERN)?,
        });
    }
}

/// Find the earliest ignore or resume marker at or after `from`.
fn next_marker(content: &str, from: usize) -> Option<(usize, &'static str)> {
    let rest = content.get(from..)?;
    let start = rest.find(IGNORE_START).map(|at| return (at, IGNORE_START));
    let stop = rest.find(IGNORE_STOP).map(|at| return (at, IGNORE_STOP));
    let (offset, marker) = match (start, stop) {
        (Some(a), Some(b)) => std::cmp::min(a, b),
        (found, None) | (None, found) => found?,
    };
    return Some((from.saturating_add(offset), marker));
}

/// The replacement for one matched word, capitalized if the match was.
fn replacement_for(found: &str) -> String {
    let lowered = found.to_lowercase();
    let Some((_, replacement)) = REPLACEMENTS.iter().find(|(word, _)| return *word == lowered) else {
        return found.to_string();
    };
    if !found.starts_with(|c: char| return c.is_uppercase()) {
        return (*replacement).to_string();
    }
    let mut chars = replacement.chars();
    return chars
        .next()
        .map(|first| return first.to_uppercase().chain(chars).collect())
        .unwrap_or_default();
}

/// Split `content` into segments, each flagged with whether it is checked.
/// Markers themselves are unchecked segments.
///
/// # Errors
///
/// Returns `Error::IgnoreMarker` for a resume without an ignore, a repeated
/// ignore, or an ignore that is never resumed.
fn split_ignore_regions(content: &str) -> Result<Vec<(&str, bool)>, Error> {
    let mut segments = Vec::new();
    let mut ignoring = false;
    let mut pos = 0_usize;

    while let Some((at, marker)) = next_marker(content, pos) {
        if marker == IGNORE_START && ignoring {
            return Err(Error::IgnoreMarker {
                reason: format!("`{IGNORE_START}` repeated before `{IGNORE_STOP}`"),
            });
        }
        if marker == IGNORE_STOP && !ignoring {
            return Err(Error::IgnoreMarker {
                reason: format!("`{IGNORE_STOP}` without a preceding `{IGNORE_START}`"),
            });
        }
        let end = at.saturating_add(marker.len());
        segments.push((content.get(pos..at).unwrap_or(""), !ignoring));
        segments.push((content.get(at..end).unwrap_or(""), false));
        ignoring = !ignoring;
        pos = end;
    }

    if ignoring {
        return Err(Error::IgnoreMarker {
            reason: format!("`{IGNORE_START}` is never followed by `{IGNORE_STOP}`"),
        });
    }
    segments.push((content.get(pos..).unwrap_or(""), true));
    return Ok(segments);
}
