use std::path::PathBuf;
use thiserror::Error;

/// Why a single file could not be converted.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    #[error("Unsupported format: {}", .0.display())]
    Unsupported(PathBuf),

    #[error("Failed to read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode {}: {reason}", .path.display())]
    Encode { path: PathBuf, reason: String },
}

/// Errors that stop a batch before any file is converted.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Not a directory: {}", .0.display())]
    SourceNotDir(PathBuf),

    #[error("Cannot create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
