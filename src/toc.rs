//! Table-of-contents synchronization between `<!-- toc -->` markers.

use crate::error::Error;
use crate::scanner;
use crate::types::Header;

/// Indentation per nesting level below `##`.
const INDENT: &str = "    ";

/// Heading block that opens every generated table of contents.
const TOC_HEADING: &str = "<!-- toc -->\n\n## Table of contents\n";

/// Start marker, matched verbatim.
pub const TOC_START: &str = "<!-- toc -->";

/// Stop marker, matched verbatim.
pub const TOC_STOP: &str = "<!-- tocstop -->";

/// Build the full marker-delimited block for a list of headers.
///
/// The document title (level 1) and any existing "Table of contents" heading
/// are left out. A blank line separates the entries from the stop marker.
fn render_toc(headers: &[Header]) -> String {
    let mut lines = vec![TOC_HEADING.to_string()];

    for header in headers {
        if header.level == 1 || header.label.to_lowercase() == "table of contents" {
            continue;
        }
        let depth = usize::from(header.level.saturating_sub(2));
        lines.push(format!(
            "{}-   [{}](#{})",
            INDENT.repeat(depth),
            header.label,
            header.anchor
        ));
    }

    if lines.len() > 1 {
        lines.push(String::new());
    }
    lines.push(TOC_STOP.to_string());
    return lines.join("\n");
}

/// Regenerate the table of contents in `content`.
///
/// Returns the content unchanged when there is no start marker. Otherwise the
/// first span from the start marker through the next stop marker is replaced
/// with a list built from the headings outside that span. Running this on its
/// own output returns it unchanged.
///
/// # Errors
///
/// Returns `Error::MissingTocStop` if no stop marker follows the start marker,
/// or `Error::HeaderTooDeep` from heading extraction.
pub fn sync(content: &str) -> Result<String, Error> {
    let Some(start) = content.find(TOC_START) else {
        return Ok(content.to_string());
    };
    let (before, from_start) = content.split_at(start);
    let Some(stop) = from_start.get(TOC_START.len()..).and_then(|rest| return rest.find(TOC_STOP)) else {
        return Err(Error::MissingTocStop);
    };
    let span_len = TOC_START.len().saturating_add(stop).saturating_add(TOC_STOP.len());
    let (_, after) = from_start.split_at(span_len);

    let document = scanner::scan(&format!("{before}\n{after}"))?;
    let toc = render_toc(&document.headers);

    return Ok(format!("{before}{toc}{after}"));
}
