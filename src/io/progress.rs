//! Batch progress display for multi-file runs

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Single progress bar advanced once per processed file
pub struct ProgressManager {
    bar: ProgressBar,
    completed: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a manager with an empty bar
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::new(0),
            completed: 0,
        }
    }

    /// Create a manager whose bar never draws
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            completed: 0,
        }
    }

    /// Size the bar for `file_count` files
    pub fn initialize(&mut self, file_count: usize) {
        self.bar.set_length(file_count as u64);
        self.bar.set_style(BATCH_STYLE.clone());
        self.bar.enable_steady_tick(Duration::from_millis(200));
    }

    /// Show the file currently being processed
    pub fn start_file(&self, path: &Path) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        self.bar.set_message(display_name);
    }

    /// Advance the bar after a file finishes
    pub fn complete_file(&mut self) {
        self.completed += 1;
        self.bar.inc(1);
    }

    /// Number of files marked complete
    pub const fn completed(&self) -> usize {
        self.completed
    }

    /// Clear the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
