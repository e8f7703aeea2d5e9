//! Part file naming.
//!
//! Parts are named by appending `.part<N>.tar.gz` to the full input path, so
//! `archive.tar.gz` becomes `archive.tar.gz.part1.tar.gz`. `N` starts at 1 and
//! is never zero-padded.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Required input suffix
pub const TAR_GZ_SUFFIX: &str = ".tar.gz";

/// Marker between the input name and the part index
pub const PART_MARKER: &str = ".part";

/// Check whether a path's name ends with `.tar.gz` (case-sensitive)
#[must_use]
pub fn is_tar_gz(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().ends_with(TAR_GZ_SUFFIX)
}

/// Build the path of part `index` (1-based) for `input`
#[must_use]
pub fn part_path(input: &Path, index: u64) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(format!("{PART_MARKER}{index}{TAR_GZ_SUFFIX}"));
    PathBuf::from(name)
}

/// File-name prefix shared by every part of `input`, e.g. `archive.tar.gz.part`
#[must_use]
pub fn part_prefix(input: &Path) -> String {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{file_name}{PART_MARKER}")
}

/// Recover the part index from a part file name produced for `input`.
///
/// Returns `None` for names that do not follow the part naming exactly
/// (including zero-padded or zero indices).
#[must_use]
pub fn parse_part_index(input: &Path, candidate: &str) -> Option<u64> {
    let digits = candidate
        .strip_prefix(&part_prefix(input))?
        .strip_suffix(TAR_GZ_SUFFIX)?;

    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    digits.parse().ok()
}
