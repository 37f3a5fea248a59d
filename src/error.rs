//! Crate-level error types for dochooks diagnostics.

/// Every error names the heading, marker, or file operation that failed so a
/// pre-commit log is enough to fix the document without re-running anything.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A heading skips one or more levels relative to the heading before it.
    #[error(
        "Header {label:?} has level {level}, which is too deep versus previous header \
         {previous_label:?} with level {previous_level}."
    )]
    HeaderTooDeep {
        /// Rendered label of the offending heading.
        label: String,
        /// Level of the offending heading.
        level: u8,
        /// Rendered label of the heading before it.
        previous_label: String,
        /// Level of the heading before it.
        previous_level: u8,
    },

    /// Doc-style ignore/resume markers are unbalanced.
    #[error("{reason}")]
    IgnoreMarker {
        /// Which marker was misplaced and how.
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of a report failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// A `<!-- toc -->` marker has no `<!-- tocstop -->` after it.
    #[error("Missing tocstop")]
    MissingTocStop,

    /// A copyright template could not be compiled into a matcher.
    #[error("regex: {0}")]
    Regex(
        /// The wrapped regex error.
        #[from]
        regex::Error,
    ),

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
