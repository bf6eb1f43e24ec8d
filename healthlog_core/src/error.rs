//! Error types for the healthlog_core library.

use std::fmt;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for healthlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Structural defect in imported CSV text
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A record failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Stable, machine-checkable category of a CSV import failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// No header/data section at all
    Empty,
    /// A required column is missing from the header row
    BadHeader,
    /// A data row does not fit the header (column count, half a BP pair)
    BadRow,
    /// A `Date` cell is not a calendar date
    BadDate,
    /// A numeric cell does not parse as its column's type
    BadNumber,
}

impl FormatErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FormatErrorKind::Empty => "EMPTY",
            FormatErrorKind::BadHeader => "BAD_HEADER",
            FormatErrorKind::BadRow => "BAD_ROW",
            FormatErrorKind::BadDate => "BAD_DATE",
            FormatErrorKind::BadNumber => "BAD_NUMBER",
        }
    }
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CSV import failure. Import stops at the first one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("CSV format error [{kind}]{}: {message}", line_suffix(.line))]
pub struct FormatError {
    pub kind: FormatErrorKind,
    pub message: String,
    /// 1-based line number in the input text, when the defect is in a row
    pub line: Option<u64>,
}

impl FormatError {
    pub fn new(kind: FormatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
        }
    }

    pub fn at_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }
}

fn line_suffix(line: &Option<u64>) -> String {
    match line {
        Some(l) => format!(" at line {}", l),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_display_includes_kind_and_line() {
        let err = FormatError::new(FormatErrorKind::BadDate, "invalid date '2024-13-01'").at_line(3);
        assert_eq!(
            err.to_string(),
            "CSV format error [BAD_DATE] at line 3: invalid date '2024-13-01'"
        );
    }

    #[test]
    fn test_format_error_converts_into_core_error() {
        let err: Error = FormatError::new(FormatErrorKind::Empty, "no data rows").into();
        assert!(matches!(
            err,
            Error::Format(FormatError {
                kind: FormatErrorKind::Empty,
                ..
            })
        ));
        assert_eq!(err.to_string(), "CSV format error [EMPTY]: no data rows");
    }
}
