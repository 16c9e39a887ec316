//! Error types for the WireWorld engine

use std::path::PathBuf;
use thiserror::Error;

/// All kinds of errors raised by the simulation library.
#[derive(Debug, Error)]
pub enum WireWorldError {
    /// A coordinate outside the grid was written through the checked path.
    #[error("coordinates ({x}, {y}) out of bounds for {width}x{height} grid")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// A map file could not be opened, read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisted map data is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Auto-cycle rate outside the supported range.
    #[error("invalid auto-cycle rate {0}: must lie between 0.01 and 1000 cycles per second")]
    InvalidRate(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl WireWorldError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A malformed line in a map file or pattern.
///
/// `line` is 1-based so it matches what an editor shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("no `<width>|<height>` header found")]
    MissingHeader,

    #[error("expected {expected} `|`-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("`{0}` is not a valid integer")]
    NotAnInteger(String),

    #[error("unknown cell state code {0}")]
    UnknownStateCode(i64),

    #[error("a {width}x{height} grid is too large")]
    DimensionsTooLarge { width: usize, height: usize },

    #[error("unknown cell glyph '{0}'")]
    UnknownGlyph(char),

    #[error("row has length {found}, expected {expected}")]
    RaggedRow { expected: usize, found: usize },
}

/// Raised when a cell state name such as `head` cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cell state `{0}` (expected dead, wire, head or tail)")]
pub struct ParseStateError(pub String);

pub type Result<T> = std::result::Result<T, WireWorldError>;
