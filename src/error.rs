use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a disc id could not be computed. Every failure is terminal.
#[derive(Debug, Error)]
pub enum DiscIdError {
    /// Required path is absent or has the wrong type.
    #[error("\"{}\" could not be found or is not of the expected type", path.display())]
    NotFound { path: PathBuf },

    /// Path exists but could not be opened or read to the expected length.
    #[error("\"{}\" could not be read", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to list files in directory \"{}\"", path.display())]
    ListingFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DiscIdError {
    /// The offending path.
    #[must_use] pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::Unreadable { path, .. }
            | Self::ListingFailure { path, .. } => path.as_path(),
        }
    }
}
