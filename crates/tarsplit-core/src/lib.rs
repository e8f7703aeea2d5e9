//! # tarsplit core
//!
//! Splitting engine for `.tar.gz` archives.
//!
//! This crate provides:
//! - Input validation (existence and `.tar.gz` suffix)
//! - Part planning: count, offsets and sizes derived from a GiB threshold
//! - Sequential bounded-buffer copy into `<input>.part<N>.tar.gz` files
//! - Progress callbacks through [`SplitObserver`]
//!
//! Chunk boundaries are purely byte offsets; the archive's internal records
//! are never inspected.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod naming;
pub mod plan;
pub mod splitter;

pub use error::SplitError;
pub use plan::{PartInfo, SplitOptions, SplitPlan};
pub use splitter::{SplitObserver, SplitReport, Splitter};

/// One binary gigabyte (2^30 bytes).
pub const GIB: u64 = 1 << 30;

/// One binary megabyte (2^20 bytes).
pub const MIB: u64 = 1 << 20;

/// Default maximum part size, in GiB.
pub const DEFAULT_MAX_SIZE_GB: f64 = 5.0;

/// Default copy buffer size (8 MiB).
///
/// Memory use while splitting is bounded by this value, not by the part size.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024 * 1024;

/// Smallest copy buffer accepted from configuration (1 MiB).
pub const MIN_BUFFER_SIZE: usize = 1024 * 1024;

/// Largest copy buffer accepted from configuration (64 MiB).
pub const MAX_BUFFER_SIZE: usize = 64 * 1024 * 1024;

/// Convenience result alias for splitting operations.
pub type Result<T> = std::result::Result<T, SplitError>;
