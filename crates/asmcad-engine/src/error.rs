//! Editor error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the editor runtime
#[derive(Error, Debug)]
pub enum EditorError {
    /// The generated program could not be written. The previous artifact,
    /// if any, is left as it was.
    #[error("Failed to write {}: {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of an event script did not parse
    #[error("Invalid event on line {line}: {message}")]
    InvalidEvent { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, EditorError>;
