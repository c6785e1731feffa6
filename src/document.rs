use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::diagnostics::ConvertError;
use crate::syntax::{extract_sections, ParsedSections};

/// The raw text of one `.phpt` file together with where it came from.
#[derive(Debug, Clone)]
pub struct Document {
    raw_text: String,
    source_path: PathBuf,
}

impl Document {
    /// Wraps text that is already in memory.
    pub fn new(source_path: impl Into<PathBuf>, raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            source_path: source_path.into(),
        }
    }

    /// Reads a document from disk.
    pub fn read(path: &Path) -> Result<Self, ConvertError> {
        let raw_text = fs::read_to_string(path).map_err(|source| ConvertError::ReadInput {
            path: path.to_path_buf(),
            source,
        })?;
        trace!(path = %path.display(), bytes = raw_text.len(), "read document");
        Ok(Self::new(path, raw_text))
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Extracts the three sections; see [`extract_sections`].
    pub fn parse(&self) -> Result<ParsedSections, ConvertError> {
        extract_sections(&self.raw_text, &self.source_path)
    }
}
