//! Three-state section scanner.
//!
//! The scanner walks the document line by line through
//! `SeekComment -> SeekBody -> SeekExpectation`. Each state consumes lines until
//! the marker that ends it. Running out of lines in a state is exactly the
//! "section missing" failure for that state, so no section is ever guessed at.

use std::path::Path;

use miette::SourceSpan;
use tracing::{debug, trace};

use crate::diagnostics::{ConvertError, DocumentContext, Section};
use crate::syntax::markers::{boundary, Boundary, ExpectationKind, Marker, CLOSE_TAG, OPEN_TAG};

// ============================================================================
// PUBLIC API
// ============================================================================

/// The three sections pulled out of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSections {
    /// Trimmed description, lines joined with `\n`.
    pub description: String,
    /// Test code without the surrounding `<?php` / `?>` tokens.
    pub body: String,
    /// Everything after the expectation marker, byte for byte.
    pub expected_output: String,
    /// Which expectation marker was matched.
    pub expectation: ExpectationKind,
}

impl ParsedSections {
    pub fn expectation_is_pattern(&self) -> bool {
        self.expectation.is_pattern()
    }

    /// The description lines, for one-line progress reports.
    pub fn description_lines(&self) -> impl Iterator<Item = &str> {
        self.description.lines()
    }
}

/// Extracts the description, body and expectation sections of `raw_text`.
///
/// `source_path` is only used to name the document in diagnostics.
pub fn extract_sections(raw_text: &str, source_path: &Path) -> Result<ParsedSections, ConvertError> {
    let lines = split_lines(raw_text);
    let mut state = State::SeekComment { block_start: None };
    let mut last_marker: Option<SourceSpan> = None;
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        let kind = boundary(&raw_text[line.start..line.content_end]);

        state = match state {
            State::SeekComment { block_start: None } => {
                if kind == Some(Boundary::Known(Marker::Test)) {
                    last_marker = Some(line.marker_span());
                    trace!(offset = line.start, "found comment marker");
                    State::SeekComment {
                        block_start: Some(line.end),
                    }
                } else {
                    State::SeekComment { block_start: None }
                }
            }
            State::SeekComment {
                block_start: Some(start),
            } => {
                if kind.is_none() {
                    State::SeekComment {
                        block_start: Some(start),
                    }
                } else {
                    // The boundary line is re-examined by the next state.
                    match description(&raw_text[start..line.start]) {
                        Some(description) => {
                            debug!(%description, "comment section complete");
                            state = State::SeekBody { description };
                            continue;
                        }
                        None => {
                            trace!(offset = line.start, "empty comment block, seeking another");
                            state = State::SeekComment { block_start: None };
                            continue;
                        }
                    }
                }
            }
            State::SeekBody { description } => {
                if kind == Some(Boundary::Known(Marker::File)) {
                    last_marker = Some(line.marker_span());
                    trace!(offset = line.start, "found body marker");
                    State::SeekExpectation {
                        description,
                        body_start: line.end,
                    }
                } else {
                    State::SeekBody { description }
                }
            }
            State::SeekExpectation {
                description,
                body_start,
            } => {
                let expectation = kind
                    .and_then(|b| b.marker())
                    .and_then(|m| m.expectation_kind());
                match expectation {
                    // A marker on the last, unterminated line introduces no block.
                    Some(expectation) if line.end > line.content_end => {
                        debug!(?expectation, offset = line.start, "expectation section found");
                        return Ok(ParsedSections {
                            description,
                            body: clean_body(&raw_text[body_start..line.start]).to_string(),
                            expected_output: raw_text[line.end..].to_string(),
                            expectation,
                        });
                    }
                    _ => State::SeekExpectation {
                        description,
                        body_start,
                    },
                }
            }
        };
        index += 1;
    }

    let missing = match state {
        State::SeekComment { block_start: None } => Section::Comment,
        State::SeekComment {
            block_start: Some(start),
        } => {
            // A description running to end-of-file is still a description.
            if description(&raw_text[start..]).is_some() {
                Section::Body
            } else {
                Section::Comment
            }
        }
        State::SeekBody { .. } => Section::Body,
        State::SeekExpectation { .. } => Section::Expectation,
    };
    debug!(section = %missing, path = %source_path.display(), "document is missing a section");
    Err(ConvertError::missing_section(
        missing,
        source_path,
        DocumentContext::new(source_path, raw_text, last_marker),
    ))
}

// ============================================================================
// SCANNER STATE
// ============================================================================

#[derive(Debug)]
enum State {
    /// Looking for `--TEST--`; once seen, `block_start` marks the description.
    SeekComment { block_start: Option<usize> },
    /// Description captured; looking for `--FILE--`.
    SeekBody { description: String },
    /// Body starts at `body_start`; looking for an expectation marker.
    SeekExpectation { description: String, body_start: usize },
}

/// Byte offsets of one line: `[start, content_end)` is the text, `[content_end, end)`
/// the `\n` terminator (empty on an unterminated last line).
#[derive(Debug, Clone, Copy)]
struct Line {
    start: usize,
    content_end: usize,
    end: usize,
}

impl Line {
    fn marker_span(&self) -> SourceSpan {
        (self.start, self.content_end - self.start).into()
    }
}

fn split_lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut start = 0;
    while start < text.len() {
        match text[start..].find('\n') {
            Some(pos) => {
                let content_end = start + pos;
                lines.push(Line {
                    start,
                    content_end,
                    end: content_end + 1,
                });
                start = content_end + 1;
            }
            None => {
                lines.push(Line {
                    start,
                    content_end: text.len(),
                    end: text.len(),
                });
                start = text.len();
            }
        }
    }
    lines
}

// ============================================================================
// BLOCK CLEANUP
// ============================================================================

fn description(block: &str) -> Option<String> {
    let trimmed = block.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.lines().collect::<Vec<_>>().join("\n"))
}

/// Strips the `<?php` opener, one blank line, and a trailing `?>` from the raw
/// text between `--FILE--` and the expectation marker.
fn clean_body(raw: &str) -> &str {
    let mut body = raw;

    if let Some(rest) = body.strip_prefix(OPEN_TAG) {
        let after_tag = rest.trim_start_matches([' ', '\t']);
        let token_ends = rest.is_empty()
            || after_tag.len() < rest.len()
            || after_tag.starts_with(['\r', '\n']);
        if token_ends {
            body = strip_leading_break(after_tag);
        }
    }

    if let Some(pos) = body.find('\n') {
        if body[..pos].trim().is_empty() {
            body = &body[pos + 1..];
        }
    }

    body = strip_trailing_break(body);
    if let Some(before_close) = body.strip_suffix(CLOSE_TAG) {
        body = strip_trailing_break(before_close);
    }
    body
}

fn strip_leading_break(text: &str) -> &str {
    text.strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .unwrap_or(text)
}

fn strip_trailing_break(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}
