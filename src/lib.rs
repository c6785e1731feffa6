pub use crate::diagnostics::{ConvertError, Section};
pub use crate::document::Document;
pub use crate::syntax::{extract_sections, ParsedSections};

pub mod cli;
pub mod convert;
pub mod diagnostics;
pub mod discovery;
pub mod document;
pub mod naming;
pub mod render;
pub mod syntax;

/// Name the binary reports itself as in usage messages.
pub const PROGRAM_NAME: &str = "phpt2php";
