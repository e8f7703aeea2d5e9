//! tarsplit CLI
//!
//! Splits a `.tar.gz` archive into `<input>.part<N>.tar.gz` files of at most
//! `--max-size` GiB each. Parts are plain byte slices of the archive and must
//! be concatenated in order to restore it.

mod config;
mod progress;

use anyhow::Context;
use clap::Parser;
use console::style;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tarsplit_core::plan::validate_input;
use tarsplit_core::{SplitError, SplitOptions, Splitter};

use config::Config;
use progress::{SplitProgress, format_bytes, format_gib};

/// Exit status for a rejected input (missing file or wrong suffix)
const EXIT_INVALID_INPUT: u8 = 2;

/// Split a tar.gz archive into fixed-size part files
#[derive(Parser)]
#[command(name = "tarsplit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input tar.gz file
    input_file: PathBuf,

    /// Maximum size of each part in GiB [default: 5, or config value]
    #[arg(long, value_name = "GB")]
    max_size: Option<f64>,

    /// Copy buffer size in MiB (1-64)
    #[arg(long, value_name = "MIB")]
    buffer_size: Option<u64>,

    /// Print the part layout without writing any files
    #[arg(long)]
    dry_run: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output (implies --verbose)
    #[arg(short, long)]
    debug: bool,

    /// Configuration file path [default: ~/.config/tarsplit/config.toml]
    #[arg(short, long)]
    config: Option<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Input guards run before any size or config value is looked at
    if let Err(err) = validate_input(&cli.input_file) {
        return Ok(reject_input(&err));
    }

    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load(&expand_tilde(path))?,
        None => Config::load_or_default()?,
    };

    // Initialize logging
    let log_level = if cli.debug {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        config.output.log_level.as_str()
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    apply_overrides(&cli, &mut config);
    config.validate()?;

    let options = SplitOptions::from_gib(config.split.max_size_gb)?
        .with_buffer_size(config.buffer_size())?;

    match split_archive(&cli, &config, options) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) if err.is_precondition() => Ok(reject_input(&err)),
        Err(err) => Err(err)
            .with_context(|| format!("Failed to split {}", cli.input_file.display())),
    }
}

/// Report a rejected input on stderr
fn reject_input(err: &SplitError) -> ExitCode {
    eprintln!("{} {}", style("Error:").red().bold(), err);
    ExitCode::from(EXIT_INVALID_INPUT)
}

/// Expand a leading `~/` to the home directory
fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(rest),
        None => PathBuf::from(path),
    }
}

/// Command-line flags take precedence over the configuration file
fn apply_overrides(cli: &Cli, config: &mut Config) {
    if let Some(max_size) = cli.max_size {
        config.split.max_size_gb = max_size;
    }
    if let Some(buffer_size) = cli.buffer_size {
        config.split.buffer_size_mib = buffer_size;
    }
    if cli.no_progress {
        config.output.progress = false;
    }
}

fn split_archive(cli: &Cli, config: &Config, options: SplitOptions) -> Result<(), SplitError> {
    let splitter = Splitter::new(options);
    let plan = splitter.plan(&cli.input_file)?;

    println!("Input size: {}", format_gib(plan.total_size()));
    println!(
        "Splitting into {} parts, max {} GB each",
        plan.num_parts(),
        config.split.max_size_gb
    );

    if cli.dry_run {
        print_plan(&plan);
        return Ok(());
    }

    let mut progress = SplitProgress::new(plan.num_parts(), config.output.progress);
    let report = splitter.execute(&plan, &mut progress)?;

    println!();
    println!(
        "{} {} part(s), {} total",
        style("Split complete!").green().bold(),
        report.parts.len(),
        format_bytes(report.total_size)
    );
    print_notes(&cli.input_file);

    Ok(())
}

fn print_plan(plan: &tarsplit_core::SplitPlan) {
    println!();
    println!("{:>6}  {:>16}  {:>12}  PATH", "PART", "OFFSET", "SIZE");
    for part in plan.parts() {
        println!(
            "{:>6}  {:>16}  {:>12}  {}",
            part.index,
            part.offset,
            format_bytes(part.size),
            part.path.display()
        );
    }
    println!();
    println!("Dry run: no files written");
}

fn print_notes(input: &Path) {
    println!();
    println!("Notes:");
    println!("1. Each part can be fed to a gzip stream decoder on its own, since tar.gz decompresses as a stream");
    println!("2. On its own, each part yields only a fragment of the original content");
    println!(
        "3. To recover the full archive, concatenate all parts in order first, e.g. cat {}.part*.tar.gz",
        input.display()
    );
}
