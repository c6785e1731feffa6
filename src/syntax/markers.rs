//! Section marker vocabulary.
//!
//! A marker is a line holding nothing but `--NAME--`, where `NAME` is a run of
//! ASCII uppercase letters, digits and underscores. A trailing `\r` belongs to
//! the line terminator, never to the marker.

use std::fmt;

/// Opening token of an embedded PHP block.
pub const OPEN_TAG: &str = "<?php";

/// Closing token of an embedded PHP block.
pub const CLOSE_TAG: &str = "?>";

/// Markers the converter gives meaning to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `--TEST--`: the one-line description.
    Test,
    /// `--FILE--`: the test code.
    File,
    /// `--EXPECT--`: exact expected output.
    Expect,
    /// `--EXPECTF--`: expected output with `%s`-style placeholders.
    ExpectF,
    /// `--EXPECTREGEX--`: expected output as a regular expression.
    ExpectRegex,
}

/// Every marker that can open the expectation section.
pub const EXPECTATION_MARKERS: [Marker; 3] = [Marker::Expect, Marker::ExpectF, Marker::ExpectRegex];

impl Marker {
    /// The section name between the dashes.
    pub fn name(&self) -> &'static str {
        match self {
            Marker::Test => "TEST",
            Marker::File => "FILE",
            Marker::Expect => "EXPECT",
            Marker::ExpectF => "EXPECTF",
            Marker::ExpectRegex => "EXPECTREGEX",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "TEST" => Some(Marker::Test),
            "FILE" => Some(Marker::File),
            "EXPECT" => Some(Marker::Expect),
            "EXPECTF" => Some(Marker::ExpectF),
            "EXPECTREGEX" => Some(Marker::ExpectRegex),
            _ => None,
        }
    }

    /// How output is compared when this marker opens the expectation section.
    pub fn expectation_kind(&self) -> Option<ExpectationKind> {
        match self {
            Marker::Expect => Some(ExpectationKind::Exact),
            Marker::ExpectF => Some(ExpectationKind::Format),
            Marker::ExpectRegex => Some(ExpectationKind::Regex),
            Marker::Test | Marker::File => None,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}--", self.name())
    }
}

/// A marker line, recognized or not. Unknown sections (`--SKIPIF--`, `--INI--`,
/// ...) still end the block before them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Known(Marker),
    Other,
}

impl Boundary {
    pub fn marker(&self) -> Option<Marker> {
        match self {
            Boundary::Known(marker) => Some(*marker),
            Boundary::Other => None,
        }
    }
}

/// Classifies a single line (without its `\n`). Returns `None` for ordinary
/// content lines.
pub fn boundary(line: &str) -> Option<Boundary> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let name = line.strip_prefix("--")?.strip_suffix("--")?;
    if name.is_empty()
        || !name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
    {
        return None;
    }
    Some(match Marker::from_name(name) {
        Some(marker) => Boundary::Known(marker),
        None => Boundary::Other,
    })
}

/// The comparison style of an expectation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpectationKind {
    Exact,
    Format,
    Regex,
}

impl ExpectationKind {
    /// Format and regex expectations are both matched as patterns downstream.
    pub fn is_pattern(&self) -> bool {
        !matches!(self, ExpectationKind::Exact)
    }
}
