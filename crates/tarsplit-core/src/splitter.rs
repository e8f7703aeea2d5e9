//! Sequential splitting with a bounded copy buffer.
//!
//! The input is opened once and read strictly front to back. Each part is
//! streamed through a reusable buffer of at most `buffer_size` bytes, so
//! memory use does not grow with the part size.

use crate::plan::{PartInfo, SplitOptions, SplitPlan, ensure_regular_file};
use crate::{Result, SplitError};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Progress callbacks invoked while parts are written.
///
/// All methods default to no-ops; `()` is the silent observer.
pub trait SplitObserver {
    /// A part file is about to be created
    fn part_started(&mut self, _part: &PartInfo) {}

    /// `copied` bytes of `part` have been written so far
    fn bytes_copied(&mut self, _part: &PartInfo, _copied: u64) {}

    /// A part file has been fully written
    fn part_finished(&mut self, _part: &PartInfo) {}
}

impl SplitObserver for () {}

/// Outcome of a completed split
#[derive(Debug, Clone)]
pub struct SplitReport {
    /// Input path
    pub input: PathBuf,
    /// Input length in bytes
    pub total_size: u64,
    /// Maximum part length in bytes
    pub part_size: u64,
    /// Parts written, in index order
    pub parts: Vec<PartInfo>,
}

/// Archive splitter
#[derive(Debug, Clone, Default)]
pub struct Splitter {
    options: SplitOptions,
}

impl Splitter {
    /// Create a splitter with the given options
    #[must_use]
    pub fn new(options: SplitOptions) -> Self {
        Self { options }
    }

    /// Configured options
    #[must_use]
    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    /// Validate `input` and compute its part layout without writing anything
    ///
    /// # Errors
    ///
    /// See [`SplitPlan::new`].
    pub fn plan<P: AsRef<Path>>(&self, input: P) -> Result<SplitPlan> {
        SplitPlan::new(input, &self.options)
    }

    /// Split `input` into part files next to it
    ///
    /// # Errors
    ///
    /// Returns a precondition error before any output is created, or an I/O
    /// error that aborts the remaining parts. Parts already written are left
    /// in place.
    pub fn split<P: AsRef<Path>>(&self, input: P) -> Result<SplitReport> {
        self.split_with(input, &mut ())
    }

    /// Split `input`, reporting progress to `observer`
    ///
    /// # Errors
    ///
    /// See [`Splitter::split`].
    pub fn split_with<P, O>(&self, input: P, observer: &mut O) -> Result<SplitReport>
    where
        P: AsRef<Path>,
        O: SplitObserver + ?Sized,
    {
        let plan = self.plan(input)?;
        self.execute(&plan, observer)
    }

    /// Write every part of a previously computed plan
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the input is not a regular file or cannot be
    /// read (including a short read when the input is shorter than planned),
    /// or if a part cannot be written.
    pub fn execute<O>(&self, plan: &SplitPlan, observer: &mut O) -> Result<SplitReport>
    where
        O: SplitObserver + ?Sized,
    {
        let mut report = SplitReport {
            input: plan.input().to_path_buf(),
            total_size: plan.total_size(),
            part_size: plan.part_size(),
            parts: Vec::new(),
        };

        if plan.is_empty() {
            warn!(input = %plan.input().display(), "Input is empty, no parts written");
            return Ok(report);
        }

        let mut reader = File::open(plan.input()).map_err(|e| SplitError::io(plan.input(), e))?;
        let metadata = reader
            .metadata()
            .map_err(|e| SplitError::io(plan.input(), e))?;
        // Must hold before part 1 is created
        ensure_regular_file(plan.input(), &metadata)?;

        let buffer_len = (self.options.buffer_size() as u64).min(plan.part_size()) as usize;
        let mut buffer = vec![0u8; buffer_len];
        debug!(buffer_len, "Allocated copy buffer");

        for part in plan.parts() {
            observer.part_started(&part);
            info!(
                index = part.index,
                offset = part.offset,
                size = part.size,
                path = %part.path.display(),
                "Writing part"
            );

            copy_part(&mut reader, plan.input(), &part, &mut buffer, observer)?;

            observer.part_finished(&part);
            report.parts.push(part);
        }

        info!(parts = report.parts.len(), "Split complete");
        Ok(report)
    }
}

/// Copy exactly `part.size` bytes from the reader's current position into a
/// freshly created part file.
fn copy_part<R, O>(
    reader: &mut R,
    input: &Path,
    part: &PartInfo,
    buffer: &mut [u8],
    observer: &mut O,
) -> Result<()>
where
    R: Read,
    O: SplitObserver + ?Sized,
{
    let mut out = File::create(&part.path).map_err(|e| SplitError::io(&part.path, e))?;

    let mut copied = 0u64;
    while copied < part.size {
        let len = (part.size - copied).min(buffer.len() as u64) as usize;
        let chunk = &mut buffer[..len];

        reader
            .read_exact(chunk)
            .map_err(|e| SplitError::io(input, e))?;
        out.write_all(chunk)
            .map_err(|e| SplitError::io(&part.path, e))?;

        copied += len as u64;
        observer.bytes_copied(part, copied);
    }

    out.flush().map_err(|e| SplitError::io(&part.path, e))
}
