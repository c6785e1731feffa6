//! Handles all user-facing output for the CLI.
//!
//! Progress lines go to stdout through an [`OutputSink`]. Errors go to stderr:
//! parse failures as a `miette` report pointing into the document, the rest as
//! one line with the leading "Error" styled through `termcolor`.

use std::io::{self, Write};

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::diagnostics::ConvertError;

// ============================================================================
// OUTPUT SINKS: OutputBuffer and StdoutSink implementations
// ============================================================================

/// Destination for one-line progress records.
pub trait OutputSink {
    fn emit(&mut self, text: &str) -> io::Result<()>;
}

/// OutputBuffer: collects output into a String for testing or programmatic capture.
pub struct OutputBuffer {
    pub buffer: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }
    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for OutputBuffer {
    fn emit(&mut self, text: &str) -> io::Result<()> {
        self.buffer.push_str(text);
        self.buffer.push('\n');
        Ok(())
    }
}

/// StdoutSink: writes output to stdout for CLI use.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, text: &str) -> io::Result<()> {
        write_line(&mut io::stdout().lock(), text)
    }
}

/// Writes one progress line. A reader that went away (`phpt2php ... | head -1`)
/// does not stop the conversion, so a broken pipe is not an error.
fn write_line(writer: &mut impl Write, text: &str) -> io::Result<()> {
    match writeln!(writer, "{}", text).and_then(|()| writer.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS: User-facing CLI output utilities
// ============================================================================

/// Prints an error to stderr. The usage message is printed bare. Errors that
/// carry a source snippet are rendered as a miette report; everything else gets
/// a one-line "Error:" message.
pub fn print_error(error: &ConvertError, color: ColorChoice) {
    let mut stderr = StandardStream::stderr(color);
    if print_error_colored(&mut stderr, error).is_err() {
        eprintln!("Error: {}", error);
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

const REPORT_WIDTH: usize = 400;

fn print_error_colored(writer: &mut impl WriteColor, error: &ConvertError) -> io::Result<()> {
    if let ConvertError::Usage { .. } = error {
        writeln!(writer, "{}", error)?;
        return Ok(());
    }

    if error.source_code().is_some() {
        let theme = if writer.supports_color() {
            GraphicalTheme::unicode()
        } else {
            GraphicalTheme::unicode_nocolor()
        };
        let mut report = String::new();
        // Wide enough that the path in the message is never wrapped.
        GraphicalReportHandler::new_themed(theme)
            .with_width(REPORT_WIDTH)
            .render_report(&mut report, error)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        write!(writer, "{}", report)?;
        return writer.flush();
    }

    writer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(writer, "Error")?;
    writer.reset()?;
    writeln!(writer, ": {}", error)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use termcolor::NoColor;

    use super::*;
    use crate::diagnostics::{DocumentContext, Section};

    fn render_plain(error: &ConvertError) -> String {
        let mut out = NoColor::new(Vec::new());
        print_error_colored(&mut out, error).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_buffer_collects_lines() {
        let mut buffer = OutputBuffer::new();
        buffer.emit("Wrote a.php: A").unwrap();
        buffer.emit("Wrote b.php: B").unwrap();
        assert_eq!(buffer.as_str(), "Wrote a.php: A\nWrote b.php: B\n");
    }

    #[test]
    fn test_usage_is_printed_bare() {
        let error = ConvertError::Usage {
            program: "phpt2php".to_string(),
        };
        assert_eq!(render_plain(&error), "Usage: phpt2php path/to/igbinary_0xy.phpt...\n");
    }

    #[test]
    fn test_extension_error_has_prefix() {
        let error = ConvertError::InvalidInputExtension {
            path: PathBuf::from("notes.txt"),
        };
        assert_eq!(render_plain(&error), "Error: notes.txt is not a file of type phpt\n");
    }

    #[test]
    fn test_parse_error_is_reported_once() {
        let text = "--TEST--\nT\n";
        let ctx = DocumentContext::new(Path::new("t/001.phpt"), text, Some((0, 8).into()));
        let error = ConvertError::missing_section(Section::Body, Path::new("t/001.phpt"), ctx);
        let rendered = render_plain(&error);
        assert_eq!(rendered.matches("Could not find php test code in t/001.phpt").count(), 1);
        assert!(!rendered.contains("Error:"));
        assert!(rendered.contains("phpt::missing_body"));
        assert!(rendered.contains("no body section after this marker"));
    }

    /// A writer whose every write fails with `kind`.
    struct FailingWriter(io::ErrorKind);

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(self.0, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_broken_pipe_is_not_an_error() {
        assert!(write_line(&mut FailingWriter(io::ErrorKind::BrokenPipe), "Wrote a.php: A").is_ok());
    }

    #[test]
    fn test_other_write_errors_propagate() {
        let err = write_line(&mut FailingWriter(io::ErrorKind::PermissionDenied), "Wrote a.php: A")
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_write_line_appends_newline() {
        let mut out = Vec::new();
        write_line(&mut out, "Wrote a.php: A").unwrap();
        assert_eq!(out, b"Wrote a.php: A\n");
    }
}
