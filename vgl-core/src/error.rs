//! Error types for vgl

use thiserror::Error;

/// Main error type for vgl math and geometry operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for vgl operations
pub type Result<T> = std::result::Result<T, Error>;
