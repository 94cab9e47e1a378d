//! Error types for splitting.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while splitting a G-code program.
#[derive(Error, Debug)]
pub enum SplitError {
    /// The input G-code file does not exist.
    #[error("G-code file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input G-code file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// No layer numbers were requested.
    #[error("at least one layer number is required")]
    NoLayers,

    /// The output directory could not be created.
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// File that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The input path has no file name to derive output names from.
    #[error("input path has no file name: {}", .0.display())]
    NoFileName(PathBuf),

    /// Configuration file could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for split operations.
pub type Result<T> = std::result::Result<T, SplitError>;
