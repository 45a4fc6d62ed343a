use thiserror::Error;

/// Main error type for Lineage
#[derive(Error, Debug)]
pub enum LineageError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record decoding errors (malformed JSON/CSV content)
    #[error("Parse error: {0}")]
    Parse(String),

    /// File extension with no registered decoder
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using LineageError
pub type Result<T> = std::result::Result<T, LineageError>;
