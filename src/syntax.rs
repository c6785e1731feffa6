//! Syntax of `.phpt` test documents.
//!
//! A document is a sequence of sections, each introduced by a marker line such as
//! `--TEST--`. Only three sections matter to the converter: the description, the
//! test code and the expected output. Everything else is skipped.

pub mod markers;
pub mod scanner;

pub use markers::{Boundary, ExpectationKind, Marker};
pub use scanner::{extract_sections, ParsedSections};
