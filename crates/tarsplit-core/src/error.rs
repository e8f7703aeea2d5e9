//! Error types for splitting operations

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while validating or splitting an archive
#[derive(Debug, Error)]
pub enum SplitError {
    /// Input path does not exist
    #[error("file {} does not exist", .0.display())]
    NotFound(PathBuf),

    /// Input path does not carry the `.tar.gz` suffix
    #[error("file {} is not a tar.gz file", .0.display())]
    NotTarGz(PathBuf),

    /// Part size threshold is not a positive, finite, at-least-one-byte value
    #[error("invalid part size: {0} GiB (must be at least one byte)")]
    InvalidPartSize(f64),

    /// Copy buffer size of zero bytes
    #[error("invalid buffer size: {0} bytes (must be non-zero)")]
    InvalidBufferSize(usize),

    /// I/O fault on the input or on a part file
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File the fault concerns
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl SplitError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this is one of the checked input preconditions.
    ///
    /// Precondition failures never leave output files behind.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::NotTarGz(_))
    }
}
