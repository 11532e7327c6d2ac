//! Error types for the parts of the game that can actually fail.
//!
//! The frame simulation itself never errors; only startup configuration, asset
//! decoding and terminal I/O surface a [`RiverError`].

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiverError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse tuning file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not load image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A tuning value is outside the range the simulation can work with.
    #[error("tuning value '{name}' is invalid: {reason}")]
    InvalidTuning {
        name: &'static str,
        reason: &'static str,
    },
}

/// Convenience alias: a `Result` using `RiverError` as the error type.
pub type RiverResult<T> = Result<T, RiverError>;
