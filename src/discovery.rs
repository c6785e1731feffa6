use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::diagnostics::ConvertError;
use crate::naming::has_input_extension;

/// Expands command-line inputs into the list of documents to convert.
///
/// With `recursive` off the inputs are returned untouched, so extension
/// validation sees exactly what the user typed. With it on, every directory
/// argument is replaced by the `.phpt` files beneath it.
#[derive(Debug)]
pub struct InputDiscoverer {
    recursive: bool,
}

impl InputDiscoverer {
    pub fn new(recursive: bool) -> Self {
        Self { recursive }
    }

    // =====================
    // Public API - Input Expansion
    // =====================

    /// Expands `inputs` in order. Files found under one directory are sorted so
    /// runs are deterministic; the relative order of arguments is kept.
    pub fn expand(&self, inputs: &[PathBuf]) -> Result<Vec<PathBuf>, ConvertError> {
        let mut files = Vec::with_capacity(inputs.len());
        for input in inputs {
            if self.recursive && input.is_dir() {
                files.extend(Self::discover_phpt_files(input)?);
            } else {
                files.push(input.clone());
            }
        }
        Ok(files)
    }

    /// Recursively scans a directory for `.phpt` files.
    pub fn discover_phpt_files(root: &Path) -> Result<Vec<PathBuf>, ConvertError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|source| ConvertError::Discovery {
                path: root.to_path_buf(),
                source,
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !has_input_extension(path) {
                continue;
            }

            files.push(path.to_path_buf());
        }
        files.sort();
        debug!(root = %root.display(), count = files.len(), "discovered documents");
        Ok(files)
    }
}
