//! Error types for model and image loading

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The closed set of reasons a model load can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    MalformedNumber,
    ExpectedIdentifier,
    UnterminatedQuote,
    ExpectedWhitespace,
    UnexpectedCharacter,
    UnrecognizedStatement,
    PropertyWithoutMaterial,
    TrailingGarbage,
    UnsupportedFormat,
    FileNotFound,
    RedefinedMaterial,
    InvalidIndex,
    MissingProperty,
    Io,
    Image,
}

/// Where in a source file an error was detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// 0-based byte column
    pub col: usize,
}

/// Error raised by the model parsers
///
/// Once a location is attached it is never replaced, so errors raised inside
/// a nested material library keep pointing at the library's own line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    detail: String,
    location: Option<Location>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            location: None,
        }
    }

    /// Attach a location unless one is already present.
    pub fn at(mut self, path: &Path, line: usize, col: usize) -> Self {
        if self.location.is_none() {
            self.location = Some(Location {
                path: path.to_path_buf(),
                line,
                col,
            });
        }
        self
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub(crate) fn io(err: std::io::Error) -> Self {
        Self::new(ParseErrorKind::Io, err.to_string())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(
                f,
                "[{}: line {}, col {}] {}",
                loc.path.display(),
                loc.line,
                loc.col,
                self.detail
            ),
            None => f.write_str(&self.detail),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err)
    }
}

impl From<ImageError> for ParseError {
    fn from(err: ImageError) -> Self {
        Self::new(ParseErrorKind::Image, format!("Error loading texture map: {}", err))
    }
}

/// Errors that can occur while decoding raster images
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Unknown image format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for model parsing
pub type Result<T> = std::result::Result<T, ParseError>;
