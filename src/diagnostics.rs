//! # Conversion Diagnostics
//!
//! Every failure mode of the converter is a variant of [`ConvertError`]. The enum
//! derives its messages with `thiserror` and implements `miette::Diagnostic` by
//! hand so that parse failures can point into the offending document.
//!
//! Nothing here is recoverable: the binary renders the error through
//! `miette::Report` and exits with status 1.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode, SourceSpan};
use thiserror::Error;

use crate::syntax::markers::{Marker, EXPECTATION_MARKERS};

// Type aliases for clarity and brevity
pub type SourceArc = Arc<NamedSource<String>>;

/// The three mandatory sections of a test document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Comment,
    Body,
    Expectation,
}

impl Section {
    /// The marker(s) that introduce this section, for help messages.
    pub fn expected_markers(&self) -> String {
        match self {
            Section::Comment => Marker::Test.to_string(),
            Section::Body => Marker::File.to_string(),
            Section::Expectation => EXPECTATION_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Section::Comment => "comment",
            Section::Body => "body",
            Section::Expectation => "expectation",
        };
        f.write_str(name)
    }
}

/// Where scanning stopped inside a malformed document.
///
/// `last_marker` is the span of the last section marker the scanner consumed, if
/// any, so the rendered report can show what was found before the gap.
#[derive(Debug)]
pub struct DocumentContext {
    pub source: SourceArc,
    pub last_marker: Option<SourceSpan>,
}

impl DocumentContext {
    pub fn new(path: &Path, raw_text: &str, last_marker: Option<SourceSpan>) -> Self {
        Self {
            source: Arc::new(NamedSource::new(
                path.display().to_string(),
                raw_text.to_string(),
            )),
            last_marker,
        }
    }
}

/// Unified error type for every converter failure.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Usage: {program} path/to/igbinary_0xy.phpt...")]
    Usage { program: String },

    #[error("{} is not a file of type phpt", path.display())]
    InvalidInputExtension { path: PathBuf },

    #[error("Could not find comment in {}", path.display())]
    MissingCommentSection { path: PathBuf, ctx: DocumentContext },

    #[error("Could not find php test code in {}", path.display())]
    MissingBodySection { path: PathBuf, ctx: DocumentContext },

    #[error("Could not find expected output (EXPECT, EXPECTF or EXPECTREGEX) in {}", path.display())]
    MissingExpectationSection { path: PathBuf, ctx: DocumentContext },

    #[error("Failed to read '{}': {source}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write progress to stdout: {source}")]
    WriteProgress {
        #[source]
        source: io::Error,
    },

    #[error("Failed to walk directory '{}': {source}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("No .phpt files found under {}", display_paths(roots))]
    NoDocuments { roots: Vec<PathBuf> },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ConvertError {
    /// Builds the missing-section error matching `section`.
    pub fn missing_section(section: Section, path: &Path, ctx: DocumentContext) -> Self {
        let path = path.to_path_buf();
        match section {
            Section::Comment => ConvertError::MissingCommentSection { path, ctx },
            Section::Body => ConvertError::MissingBodySection { path, ctx },
            Section::Expectation => ConvertError::MissingExpectationSection { path, ctx },
        }
    }

    /// The section a parse failure is about, if this is a parse failure.
    pub fn missing(&self) -> Option<Section> {
        match self {
            ConvertError::MissingCommentSection { .. } => Some(Section::Comment),
            ConvertError::MissingBodySection { .. } => Some(Section::Body),
            ConvertError::MissingExpectationSection { .. } => Some(Section::Expectation),
            _ => None,
        }
    }

    /// The path the error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConvertError::Usage { .. }
            | ConvertError::WriteProgress { .. }
            | ConvertError::NoDocuments { .. } => None,
            ConvertError::InvalidInputExtension { path }
            | ConvertError::MissingCommentSection { path, .. }
            | ConvertError::MissingBodySection { path, .. }
            | ConvertError::MissingExpectationSection { path, .. }
            | ConvertError::ReadInput { path, .. }
            | ConvertError::WriteOutput { path, .. }
            | ConvertError::Discovery { path, .. } => Some(path),
        }
    }

    fn get_ctx(&self) -> Option<&DocumentContext> {
        match self {
            ConvertError::MissingCommentSection { ctx, .. }
            | ConvertError::MissingBodySection { ctx, .. }
            | ConvertError::MissingExpectationSection { ctx, .. } => Some(ctx),
            _ => None,
        }
    }
}

impl Diagnostic for ConvertError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self {
            ConvertError::Usage { .. } => "phpt::usage",
            ConvertError::InvalidInputExtension { .. } => "phpt::extension",
            ConvertError::MissingCommentSection { .. } => "phpt::missing_comment",
            ConvertError::MissingBodySection { .. } => "phpt::missing_body",
            ConvertError::MissingExpectationSection { .. } => "phpt::missing_expectation",
            ConvertError::ReadInput { .. }
            | ConvertError::WriteOutput { .. }
            | ConvertError::WriteProgress { .. } => "phpt::io",
            ConvertError::Discovery { .. } => "phpt::discovery",
            ConvertError::NoDocuments { .. } => "phpt::no_documents",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let help = match self {
            ConvertError::InvalidInputExtension { .. } => {
                "only .phpt files are converted; pass --recursive to expand directories".to_string()
            }
            ConvertError::NoDocuments { .. } => {
                "--recursive only picks up files ending in .phpt".to_string()
            }
            _ => {
                let section = self.missing()?;
                format!(
                    "the {} section starts at a line containing only {}",
                    section,
                    section.expected_markers()
                )
            }
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .map(|ctx| ctx.source.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ctx = self.get_ctx()?;
        let span = ctx.last_marker?;
        let section = self.missing()?;
        let label = LabeledSpan::new_with_span(
            Some(format!("no {} section after this marker", section)),
            span,
        );
        Some(Box::new(std::iter::once(label)))
    }
}
