//! Development tasks for the tarsplit workspace.
//!
//! `cargo xtask smoke` builds a filler archive, runs the `tarsplit` binary on
//! it as a subprocess, prints what came out and removes everything again.
//! Results are judged by reading the output; nothing is asserted.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use tarsplit_core::naming::parse_part_index;

const MIB: u64 = 1024 * 1024;

/// Name of the single entry inside the generated archive
const ENTRY_NAME: &str = "test.txt";

#[derive(Parser)]
#[command(name = "xtask", about = "tarsplit development tasks")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Generate an archive, split it with tarsplit and show the parts
    Smoke {
        /// Size of the filler file inside the archive, in MiB
        #[arg(long, default_value_t = 10)]
        size_mb: u64,

        /// Part size passed to tarsplit, in GiB
        #[arg(long, default_value = "0.002")]
        max_size: String,

        /// Gzip level for the archive (0 stores the payload, so it really splits)
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=9))]
        level: u32,

        /// Directory the archive and parts are written to
        #[arg(long, default_value = ".")]
        work_dir: PathBuf,

        /// Pre-built tarsplit binary (defaults to `cargo run -p tarsplit-cli`)
        #[arg(long)]
        bin: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Task::Smoke {
            size_mb,
            max_size,
            level,
            work_dir,
            bin,
        } => smoke(size_mb, &max_size, level, &work_dir, bin.as_deref()),
    }
}

/// Archive and part files produced by one smoke run, removed on drop
struct Artifacts {
    archive: PathBuf,
}

impl Artifacts {
    /// Part files next to the archive, in part index order
    fn parts(&self) -> io::Result<Vec<PathBuf>> {
        let dir = self.archive.parent().unwrap_or_else(|| Path::new("."));

        let mut parts = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(index) = parse_part_index(&self.archive, name) {
                parts.push((index, path));
            }
        }
        parts.sort();
        Ok(parts.into_iter().map(|(_, path)| path).collect())
    }
}

impl Drop for Artifacts {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.archive);
        if let Ok(parts) = self.parts() {
            for part in parts {
                let _ = fs::remove_file(part);
            }
        }
        println!();
        println!("Smoke test finished, test files removed");
    }
}

fn smoke(
    size_mb: u64,
    max_size: &str,
    level: u32,
    work_dir: &Path,
    bin: Option<&Path>,
) -> Result<()> {
    fs::create_dir_all(work_dir)
        .with_context(|| format!("Failed to create {}", work_dir.display()))?;
    let work_dir = work_dir.canonicalize()?;

    let artifacts = Artifacts {
        archive: work_dir.join(format!("test_{size_mb}mb.tar.gz")),
    };

    create_test_tar_gz(&artifacts.archive, size_mb, level)?;

    println!();
    println!("Running splitter...");
    let output = splitter_command(bin)
        .arg(&artifacts.archive)
        .arg("--max-size")
        .arg(max_size)
        .arg("--no-progress")
        .output()
        .context("Failed to launch tarsplit")?;

    println!("Splitter output:");
    println!("{}", String::from_utf8_lossy(&output.stdout));
    if !output.stderr.is_empty() {
        println!("Errors:");
        println!("{}", String::from_utf8_lossy(&output.stderr));
    }
    println!("Splitter exit status: {}", output.status);

    println!();
    println!("Generated part files:");
    for part in artifacts.parts()? {
        let size = fs::metadata(&part)?.len();
        println!(
            "{}: {:.2} MB",
            part.file_name().unwrap_or_default().to_string_lossy(),
            size as f64 / MIB as f64
        );
    }

    Ok(())
}

/// Create `archive` holding one `size_mb` MiB file of `x` bytes
fn create_test_tar_gz(archive: &Path, size_mb: u64, level: u32) -> Result<()> {
    let scratch = tempfile::TempDir::new().context("Failed to create scratch directory")?;
    let filler_path = scratch.path().join(ENTRY_NAME);

    let mut filler = File::create(&filler_path)?;
    io::copy(&mut io::repeat(b'x').take(size_mb * MIB), &mut filler)?;
    filler.flush()?;
    drop(filler);

    let encoder = GzEncoder::new(File::create(archive)?, Compression::new(level));
    let mut builder = tar::Builder::new(encoder);
    builder.append_path_with_name(&filler_path, ENTRY_NAME)?;
    builder.into_inner()?.finish()?;

    println!("Created test file: {}", archive.display());
    println!(
        "File size: {:.2} MB",
        fs::metadata(archive)?.len() as f64 / MIB as f64
    );
    Ok(())
}

fn splitter_command(bin: Option<&Path>) -> Command {
    match bin {
        Some(bin) => Command::new(bin),
        None => {
            let cargo = std::env::var_os("CARGO").unwrap_or_else(|| OsString::from("cargo"));
            let mut cmd = Command::new(cargo);
            cmd.current_dir(workspace_root());
            cmd.args(["run", "--quiet", "-p", "tarsplit-cli", "--bin", "tarsplit", "--"]);
            cmd
        }
    }
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use tempfile::TempDir;

    #[test]
    fn test_create_test_tar_gz_contains_filler() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("test_1mb.tar.gz");
        create_test_tar_gz(&archive, 1, 6).unwrap();

        let mut tar = tar::Archive::new(GzDecoder::new(File::open(&archive).unwrap()));
        let mut entry = tar.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(entry.path().unwrap().to_str().unwrap(), ENTRY_NAME);

        let mut content = Vec::new();
        entry.read_to_end(&mut content).unwrap();
        assert_eq!(content.len() as u64, MIB);
        assert!(content.iter().all(|&b| b == b'x'));
    }

    #[test]
    fn test_stored_archive_is_not_smaller_than_payload() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("test_2mb.tar.gz");
        create_test_tar_gz(&archive, 2, 0).unwrap();
        assert!(fs::metadata(&archive).unwrap().len() > 2 * MIB);
    }

    #[test]
    fn test_artifacts_removed_on_drop() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("test_1mb.tar.gz");
        fs::write(&archive, b"a").unwrap();
        fs::write(temp_dir.path().join("test_1mb.tar.gz.part1.tar.gz"), b"b").unwrap();
        fs::write(temp_dir.path().join("keep.txt"), b"c").unwrap();

        drop(Artifacts {
            archive: archive.clone(),
        });

        let left: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(left, vec![OsString::from("keep.txt")]);
    }

    #[test]
    fn test_parts_listed_in_index_order() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("test_30mb.tar.gz");
        for index in [10, 2, 1, 11, 3] {
            fs::write(temp_dir.path().join(format!("test_30mb.tar.gz.part{index}.tar.gz")), b"p")
                .unwrap();
        }
        fs::write(temp_dir.path().join("test_30mb.tar.gz.partial"), b"x").unwrap();

        let artifacts = Artifacts { archive };
        let names: Vec<String> = artifacts
            .parts()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "test_30mb.tar.gz.part1.tar.gz",
                "test_30mb.tar.gz.part2.tar.gz",
                "test_30mb.tar.gz.part3.tar.gz",
                "test_30mb.tar.gz.part10.tar.gz",
                "test_30mb.tar.gz.part11.tar.gz",
            ]
        );
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }
}
