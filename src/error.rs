//! Error types for pymaker

use thiserror::Error;

/// Result type alias for pymaker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised outside the decoration and highlighting cores
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No base folder selected")]
    MissingFolder,

    #[error("No file name given")]
    MissingFileName,

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Usage(String),
}
