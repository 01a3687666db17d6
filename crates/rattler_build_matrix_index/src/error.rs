//! Error types for loading package indices

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading an index from disk
#[derive(Debug, Error)]
pub enum IndexError {
    /// Failed to read the file
    #[error("Could not open file ({0}): {1}")]
    IoError(PathBuf, #[source] std::io::Error),

    /// The file is not valid repodata
    #[error("Could not parse repodata file {}: {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
