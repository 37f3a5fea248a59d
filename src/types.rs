//! Core domain types shared by the markdown checkers.

/// Everything the structure extractor pulls out of one markdown document,
/// both lists in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Headings, one per heading node.
    pub headers: Vec<Header>,
    /// Inline links, one per link node.
    pub links: Vec<Link>,
}

/// A heading with its rendered label and document-unique anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// GitHub-compatible anchor, unique within the document.
    pub anchor: String,
    /// Inline text with code, bold, and italic markers re-synthesized.
    pub label: String,
    /// Heading depth, 1 for `#`.
    pub level: u8,
}

/// An inline link as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Raw, unresolved destination.
    pub destination: String,
    /// Rendered link text, same rules as [`Header::label`].
    pub label: String,
    /// One-based line of the nearest positioned node.
    pub line_number: usize,
}
