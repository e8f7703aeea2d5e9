//! Part planning.
//!
//! A [`SplitPlan`] is computed from the input's length and the configured
//! part size before any output is created. It answers how many parts there
//! will be, where each one starts and how long it is.

use crate::naming::{is_tar_gz, part_path};
use crate::{DEFAULT_BUFFER_SIZE, DEFAULT_MAX_SIZE_GB, GIB, Result, SplitError};
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Part metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartInfo {
    /// Part index, starting at 1
    pub index: u64,
    /// Byte offset of the first byte in the input
    pub offset: u64,
    /// Part length in bytes
    pub size: u64,
    /// Destination file
    pub path: PathBuf,
}

impl PartInfo {
    /// Offset one past the last byte of this part
    #[must_use]
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }
}

/// Part size threshold and copy buffer size for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOptions {
    part_size: u64,
    buffer_size: usize,
}

impl SplitOptions {
    /// Build options from a real-valued binary gigabyte count.
    ///
    /// The byte threshold is `floor(gb * 2^30)`.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidPartSize`] for non-finite or non-positive
    /// values, or values below one byte.
    pub fn from_gib(gb: f64) -> Result<Self> {
        if !gb.is_finite() || gb <= 0.0 {
            return Err(SplitError::InvalidPartSize(gb));
        }

        let bytes = (gb * GIB as f64).floor();
        if bytes < 1.0 || bytes >= u64::MAX as f64 {
            return Err(SplitError::InvalidPartSize(gb));
        }

        Ok(Self {
            part_size: bytes as u64,
            buffer_size: DEFAULT_BUFFER_SIZE,
        })
    }

    /// Build options from an exact byte threshold
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidPartSize`] if `part_size` is zero.
    pub fn from_bytes(part_size: u64) -> Result<Self> {
        if part_size == 0 {
            return Err(SplitError::InvalidPartSize(0.0));
        }

        Ok(Self {
            part_size,
            buffer_size: DEFAULT_BUFFER_SIZE,
        })
    }

    /// Replace the copy buffer size
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidBufferSize`] if `buffer_size` is zero.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Result<Self> {
        if buffer_size == 0 {
            return Err(SplitError::InvalidBufferSize(buffer_size));
        }
        self.buffer_size = buffer_size;
        Ok(self)
    }

    /// Maximum part length in bytes
    #[must_use]
    pub fn part_size(&self) -> u64 {
        self.part_size
    }

    /// Part threshold expressed in GiB
    #[must_use]
    pub fn part_size_gib(&self) -> f64 {
        self.part_size as f64 / GIB as f64
    }

    /// Copy buffer size in bytes
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            part_size: (DEFAULT_MAX_SIZE_GB * GIB as f64) as u64,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Check the input preconditions: the path exists, then it ends in `.tar.gz`.
///
/// # Errors
///
/// Returns [`SplitError::NotFound`] or [`SplitError::NotTarGz`].
pub fn validate_input(input: &Path) -> Result<()> {
    if !input.exists() {
        return Err(SplitError::NotFound(input.to_path_buf()));
    }

    if !is_tar_gz(input) {
        return Err(SplitError::NotTarGz(input.to_path_buf()));
    }

    Ok(())
}

/// Reject inputs that exist but cannot be read as a byte stream, such as a
/// directory named `*.tar.gz`.
pub(crate) fn ensure_regular_file(path: &Path, metadata: &Metadata) -> Result<()> {
    if metadata.is_file() {
        return Ok(());
    }

    let kind = if metadata.is_dir() {
        io::ErrorKind::IsADirectory
    } else {
        io::ErrorKind::InvalidInput
    };
    Err(SplitError::io(path, io::Error::new(kind, "not a regular file")))
}

/// Layout of all parts for one input
#[derive(Debug, Clone)]
pub struct SplitPlan {
    input: PathBuf,
    total_size: u64,
    part_size: u64,
}

impl SplitPlan {
    /// Validate `input` and compute its layout
    ///
    /// # Errors
    ///
    /// Returns a precondition error if the input is missing or not a
    /// `.tar.gz`, or an I/O error if its metadata cannot be read or it is not
    /// a regular file.
    pub fn new<P: AsRef<Path>>(input: P, options: &SplitOptions) -> Result<Self> {
        let input = input.as_ref();
        validate_input(input)?;

        let metadata = std::fs::metadata(input).map_err(|e| SplitError::io(input, e))?;
        ensure_regular_file(input, &metadata)?;

        let plan = Self::from_len(input, metadata.len(), options);
        debug!(
            input = %input.display(),
            total_size = plan.total_size,
            part_size = plan.part_size,
            num_parts = plan.num_parts(),
            "Computed split plan"
        );
        Ok(plan)
    }

    /// Compute a layout for an input of known length without touching the
    /// filesystem.
    #[must_use]
    pub fn from_len<P: AsRef<Path>>(input: P, total_size: u64, options: &SplitOptions) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            total_size,
            part_size: options.part_size(),
        }
    }

    /// Input path
    #[must_use]
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Input length in bytes
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Maximum part length in bytes
    #[must_use]
    pub fn part_size(&self) -> u64 {
        self.part_size
    }

    /// Number of parts, `ceil(total_size / part_size)`; zero for empty input
    #[must_use]
    pub fn num_parts(&self) -> u64 {
        self.total_size.div_ceil(self.part_size)
    }

    /// Whether the plan produces no parts at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_parts() == 0
    }

    /// Metadata for part `index` (1-based)
    #[must_use]
    pub fn part(&self, index: u64) -> Option<PartInfo> {
        if index == 0 || index > self.num_parts() {
            return None;
        }

        let offset = (index - 1) * self.part_size;
        let size = self.part_size.min(self.total_size - offset);

        Some(PartInfo {
            index,
            offset,
            size,
            path: part_path(&self.input, index),
        })
    }

    /// All parts in index order
    pub fn parts(&self) -> impl Iterator<Item = PartInfo> + '_ {
        (1..=self.num_parts()).filter_map(|index| self.part(index))
    }
}
