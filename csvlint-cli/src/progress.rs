//! Per-row progress glyphs for `--verbose` text output.

use crate::formatters::{paint, GREEN, RED};
use csvlint_core::validator::RowProgress;
use std::io::Write;
use tracing::trace;

/// Prints `!` for a row that added errors and `.` otherwise.
///
/// A reporter belongs to a single source; create a new one per source.
#[derive(Debug, Clone, Default)]
pub struct ProgressReporter {
    last_error_count: usize,
    use_colors: bool,
}

impl ProgressReporter {
    /// Creates a reporter that has seen no errors yet.
    pub fn new(use_colors: bool) -> Self {
        Self {
            last_error_count: 0,
            use_colors,
        }
    }

    /// Returns the glyph for a row and remembers its error count.
    pub fn glyph(&mut self, errors: usize) -> String {
        let glyph = if errors > self.last_error_count {
            paint("!", RED, self.use_colors)
        } else {
            paint(".", GREEN, self.use_colors)
        };
        self.last_error_count = errors;
        glyph
    }

    /// Writes the glyph for a processed row.
    ///
    /// Write failures are ignored so progress output never aborts a run.
    pub fn record<W: Write + ?Sized>(&mut self, progress: &RowProgress, out: &mut W) {
        let glyph = self.glyph(progress.errors);
        if let Err(e) = out.write_all(glyph.as_bytes()).and_then(|()| out.flush()) {
            trace!(row = progress.row, error = %e, "Dropped progress glyph");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(row: u64, errors: usize) -> RowProgress {
        RowProgress { row, errors }
    }

    #[test]
    fn test_glyph_sequence() {
        let mut reporter = ProgressReporter::new(false);
        let mut out = Vec::new();
        for (i, errors) in [0, 0, 1, 1, 3].into_iter().enumerate() {
            reporter.record(&row(i as u64 + 1, errors), &mut out);
        }
        assert_eq!(String::from_utf8(out).unwrap(), "..!.!");
    }

    #[test]
    fn test_colored_glyphs() {
        let mut reporter = ProgressReporter::new(true);
        assert_eq!(reporter.glyph(0), "\x1b[32m.\x1b[0m");
        assert_eq!(reporter.glyph(2), "\x1b[31m!\x1b[0m");
    }

    #[test]
    fn test_write_failure_is_ignored() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut reporter = ProgressReporter::new(false);
        reporter.record(&row(1, 1), &mut Broken);
        assert_eq!(reporter.glyph(1), ".");
    }
}
