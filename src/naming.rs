//! Output file naming.
//!
//! `tests/igbinary_042.phpt` becomes `tests/042.php` plus `tests/042.php.expect`
//! (or `.expectf`). The two steps are kept as separate pure functions so each can
//! be checked on its own.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension every input must carry.
pub const INPUT_EXTENSION: &str = "phpt";

/// Extension of the generated code file.
pub const CODE_EXTENSION: &str = "php";

/// File-name prefix stripped unless configured otherwise.
pub const DEFAULT_PREFIX: &str = "igbinary_";

/// Where one document's outputs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub code_path: PathBuf,
    pub expect_path: PathBuf,
}

/// True if `path` ends in `.phpt`.
pub fn has_input_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == INPUT_EXTENSION)
}

/// Removes every leading repetition of `prefix` from the file-name component.
/// Directory components are left alone. A prefix is only removed when a
/// non-empty stem follows it, so `igbinary_.phpt` and `igbinary_` are kept.
pub fn strip_name_prefix(path: &Path, prefix: &str) -> PathBuf {
    if prefix.is_empty() {
        return path.to_path_buf();
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return path.to_path_buf();
    };

    let mut stripped = name;
    while let Some(rest) = stripped.strip_prefix(prefix) {
        if rest.is_empty() || rest.starts_with('.') {
            break;
        }
        stripped = rest;
    }

    if stripped.len() == name.len() {
        path.to_path_buf()
    } else {
        path.with_file_name(stripped)
    }
}

/// Swaps the file extension for `extension`.
pub fn replace_extension(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

/// Derives the code file and expectation file paths for `source_path`.
pub fn derive_output_paths(source_path: &Path, prefix: &str, expectation_is_pattern: bool) -> OutputPaths {
    let code_path = replace_extension(&strip_name_prefix(source_path, prefix), CODE_EXTENSION);
    let suffix = if expectation_is_pattern { ".expectf" } else { ".expect" };

    let mut expect_path = OsString::from(code_path.as_os_str());
    expect_path.push(suffix);

    OutputPaths {
        code_path,
        expect_path: PathBuf::from(expect_path),
    }
}
