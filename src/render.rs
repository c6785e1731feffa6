//! Code file rendering.

use crate::syntax::markers::OPEN_TAG;
use crate::syntax::ParsedSections;

/// Line comment token used for the description header.
pub const COMMENT_PREFIX: &str = "// ";

/// Renders the standalone code file: the opening tag, the description as line
/// comments, then the body exactly as extracted.
pub fn render(parsed: &ParsedSections) -> String {
    let mut contents = render_header(&parsed.description);
    contents.push_str(&parsed.body);
    contents
}

/// Everything `render` puts before the body.
pub fn render_header(description: &str) -> String {
    let comment = description.replace('\n', &format!("\n{}", COMMENT_PREFIX));
    format!("{}\n{}{}\n", OPEN_TAG, COMMENT_PREFIX, comment)
}
