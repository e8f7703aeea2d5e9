//! Console progress reporting for splits

use indicatif::{ProgressBar, ProgressStyle};
use tarsplit_core::{GIB, PartInfo, SplitObserver};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}";

/// Prints one report line per part and, when enabled, draws a byte-level
/// progress bar while the part is written.
pub struct SplitProgress {
    num_parts: u64,
    show_bar: bool,
    bar: Option<ProgressBar>,
}

impl SplitProgress {
    /// Create a reporter for a split of `num_parts` parts
    pub fn new(num_parts: u64, show_bar: bool) -> Self {
        Self {
            num_parts,
            show_bar,
            bar: None,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    }
}

impl SplitObserver for SplitProgress {
    fn part_started(&mut self, part: &PartInfo) {
        println!(
            "Creating part {}, size: {}",
            part.index,
            format_gib(part.size)
        );

        if self.show_bar {
            let bar = ProgressBar::new(part.size);
            bar.set_style(Self::style());
            bar.set_message(format!("part {}/{}", part.index, self.num_parts));
            self.bar = Some(bar);
        }
    }

    fn bytes_copied(&mut self, _part: &PartInfo, copied: u64) {
        if let Some(bar) = &self.bar {
            bar.set_position(copied);
        }
    }

    fn part_finished(&mut self, part: &PartInfo) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        println!("Created: {}", part.path.display());
    }
}

/// Format a byte count in binary gigabytes with two decimals
pub fn format_gib(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / GIB as f64)
}

/// Format a byte count with the largest fitting binary unit
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.2} {}", UNITS[unit])
}
