//! # Conversion Pipeline
//!
//! Drives a whole run: validate every extension up front, expand directories,
//! then
//! for each document in order read, extract, derive paths, render, write the
//! code file, write the expectation file and report one progress line.
//!
//! The first failure ends the run. Pairs written for earlier documents stay on
//! disk, and the two files of a pair are written one after the other, so a crash
//! between them leaves the code file without its expectation file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info_span};

use crate::cli::output::OutputSink;
use crate::diagnostics::ConvertError;
use crate::discovery::InputDiscoverer;
use crate::document::Document;
use crate::naming::{derive_output_paths, has_input_extension, OutputPaths, DEFAULT_PREFIX};
use crate::render::render;
use crate::syntax::ParsedSections;
use crate::PROGRAM_NAME;

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// File-name prefix stripped from output names.
    pub prefix: String,
    /// Expand directory arguments to the `.phpt` files beneath them.
    pub recursive: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            recursive: false,
        }
    }
}

/// One converted document, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub parsed: ParsedSections,
    pub paths: OutputPaths,
}

impl Conversion {
    /// Parses `document` and works out where its outputs go. No I/O.
    pub fn from_document(document: &Document, options: &ConvertOptions) -> Result<Self, ConvertError> {
        let parsed = document.parse()?;
        let paths = derive_output_paths(
            document.source_path(),
            &options.prefix,
            parsed.expectation_is_pattern(),
        );
        debug!(
            code = %paths.code_path.display(),
            expect = %paths.expect_path.display(),
            "derived output paths"
        );
        Ok(Self { parsed, paths })
    }

    /// Writes the code file, then the expectation file.
    pub fn write(&self) -> Result<(), ConvertError> {
        write_file(&self.paths.code_path, &render(&self.parsed))?;
        write_file(&self.paths.expect_path, &self.parsed.expected_output)?;
        Ok(())
    }

    /// `Wrote <code path>: <description lines joined by "; ">`
    pub fn progress_line(&self) -> String {
        format!(
            "Wrote {}: {}",
            self.paths.code_path.display(),
            self.parsed.description_lines().collect::<Vec<_>>().join("; ")
        )
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Fails on the first path without the `.phpt` extension.
pub fn validate_inputs(paths: &[PathBuf]) -> Result<(), ConvertError> {
    match paths.iter().find(|path| !has_input_extension(path)) {
        Some(path) => Err(ConvertError::InvalidInputExtension { path: path.clone() }),
        None => Ok(()),
    }
}

/// Converts a single file on disk and reports it to `sink`.
pub fn convert_file(
    path: &Path,
    options: &ConvertOptions,
    sink: &mut dyn OutputSink,
) -> Result<OutputPaths, ConvertError> {
    let _span = info_span!("convert", path = %path.display()).entered();
    let document = Document::read(path)?;
    let conversion = Conversion::from_document(&document, options)?;
    conversion.write()?;
    sink.emit(&conversion.progress_line())
        .map_err(|source| ConvertError::WriteProgress { source })?;
    Ok(conversion.paths)
}

/// Converts every input in order, stopping at the first failure.
///
/// Nothing is read or written until every path has passed extension
/// validation. File arguments are checked before any directory is walked; a
/// recursive run that finds no documents at all is an error.
pub fn run(
    inputs: &[PathBuf],
    options: &ConvertOptions,
    sink: &mut dyn OutputSink,
) -> Result<Vec<OutputPaths>, ConvertError> {
    if inputs.is_empty() {
        return Err(ConvertError::Usage {
            program: PROGRAM_NAME.to_string(),
        });
    }

    let (roots, named): (Vec<PathBuf>, Vec<PathBuf>) = inputs
        .iter()
        .cloned()
        .partition(|path| options.recursive && path.is_dir());
    validate_inputs(&named)?;

    let files = InputDiscoverer::new(options.recursive).expand(inputs)?;
    if files.is_empty() {
        return Err(ConvertError::NoDocuments { roots });
    }
    debug!(count = files.len(), "inputs expanded");

    files
        .iter()
        .map(|path| convert_file(path, options, sink))
        .collect()
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn write_file(path: &Path, contents: &str) -> Result<(), ConvertError> {
    fs::write(path, contents).map_err(|source| ConvertError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}
