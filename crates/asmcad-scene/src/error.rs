//! Error types for the scene crate

use thiserror::Error;

/// Result type alias using the scene's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading scene resources
///
/// Structural operations (take, drop, clone) never fail with an error: a
/// refused operation is reported as a value (`None`, [`crate::DropOutcome::Rejected`]).
#[derive(Error, Debug)]
pub enum Error {
    /// An image asset could not be found
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
