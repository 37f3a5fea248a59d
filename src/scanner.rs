//! Markdown structure extraction: headings with anchors, and inline links.

use comrak::nodes::{AstNode, NodeValue};
use comrak::options::Options;
use comrak::{Arena, parse_document};

use crate::anchor::{Collisions, make_anchor};
use crate::error::Error;
use crate::types::{Document, Header, Link};

/// Label reported as the "previous" heading before any heading is seen.
const FIRST_HEADER_LABEL: &str = "(first header)";

/// The heading that the next heading's level is validated against.
struct PreviousHeader {
    /// Rendered label, for the error message.
    label: String,
    /// Heading level.
    level: u8,
}

/// Append the plain text of `node`'s inline children: text and code literals
/// only, no formatting markers. This is what anchors are built from.
fn push_plain_text<'a>(node: &'a AstNode<'a>, text: &mut String) {
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Code(code) => text.push_str(&code.literal),
            NodeValue::Text(literal) => text.push_str(literal),
            _ => push_plain_text(child, text),
        }
    }
}

/// Append the rendered label of `node`'s inline children, re-synthesizing
/// markers from the node type: `` `code` ``, `**strong**`, `_emph_`.
fn push_rendered_label<'a>(node: &'a AstNode<'a>, label: &mut String) {
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Code(code) => {
                label.push('`');
                label.push_str(&code.literal);
                label.push('`');
            },
            NodeValue::Emph => {
                label.push('_');
                push_rendered_label(child, label);
                label.push('_');
            },
            NodeValue::Strong => {
                label.push_str("**");
                push_rendered_label(child, label);
                label.push_str("**");
            },
            NodeValue::Text(literal) => label.push_str(literal),
            _ => push_rendered_label(child, label),
        }
    }
}

/// Render the label of a heading or link node.
fn render_label<'a>(node: &'a AstNode<'a>) -> String {
    let mut label = String::new();
    push_rendered_label(node, &mut label);
    return label;
}

/// Parse markdown content and extract its headings and links in document order.
///
/// Each heading gets an anchor from a collision table local to this call.
/// Links take the line of the nearest positioned node visited so far, which is
/// the link itself whenever the parser records inline positions.
///
/// # Errors
///
/// Returns `Error::HeaderTooDeep` if a heading is more than one level deeper
/// than the heading before it. The first heading may be level 1 or 2.
pub fn scan(content: &str) -> Result<Document, Error> {
    let arena = Arena::new();
    let root = parse_document(&arena, content, &Options::default());

    let mut collisions = Collisions::new();
    let mut document = Document::default();
    let mut previous = PreviousHeader {
        label: FIRST_HEADER_LABEL.to_string(),
        level: 1,
    };
    let mut last_known_line = 0_usize;

    for node in root.descendants() {
        let ast = node.data.borrow();
        if ast.sourcepos.start.line > 0 {
            last_known_line = ast.sourcepos.start.line;
        }

        match &ast.value {
            NodeValue::Heading(heading) => {
                let label = render_label(node);
                check_heading_depth(&previous, &label, heading.level)?;

                let mut plain = String::new();
                push_plain_text(node, &mut plain);
                document.headers.push(Header {
                    anchor: make_anchor(&plain, &mut collisions),
                    label: label.clone(),
                    level: heading.level,
                });
                previous = PreviousHeader {
                    label,
                    level: heading.level,
                };
            },
            NodeValue::Link(link) => {
                document.links.push(Link {
                    destination: link.url.clone(),
                    label: render_label(node),
                    line_number: last_known_line,
                });
            },
            _ => {},
        }
    }

    return Ok(document);
}

/// Reject a heading that skips a level below the previous heading.
///
/// # Errors
///
/// Returns `Error::HeaderTooDeep` naming both headings.
fn check_heading_depth(previous: &PreviousHeader, label: &str, level: u8) -> Result<(), Error> {
    if level.saturating_sub(1) > previous.level {
        return Err(Error::HeaderTooDeep {
            label: label.to_string(),
            level,
            previous_label: previous.label.clone(),
            previous_level: previous.level,
        });
    }
    return Ok(());
}
