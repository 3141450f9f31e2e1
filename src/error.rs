//! Error types for the highlighting engine

use thiserror::Error;

/// Result type alias for highlighting operations
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Highlighting error types
///
/// None of these are fatal. Loading collects them as diagnostics and keeps
/// going with whatever part of the configuration was valid.
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Bad declaration: {0}")]
    Configuration(String),

    #[error("Bad regex {pattern:?}: {source}")]
    PatternCompile {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Out of markers, face {face:?} keeps the default style")]
    MarkerExhausted { face: String },

    #[error("No buffer attached")]
    NoBuffer,

    #[error("Buffer is not registered for edit events")]
    NotRegistered,

    #[error("Position {position} out of range (length {len})")]
    OutOfRange { position: usize, len: usize },
}

impl HighlightError {
    /// Shorthand for a malformed declaration
    pub fn config(msg: impl Into<String>) -> Self {
        HighlightError::Configuration(msg.into())
    }
}
