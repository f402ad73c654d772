//! Progress bar for CLI operations.

use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";

/// Progress over a known number of entries
pub struct EntryProgress {
    bar: ProgressBar,
}

impl EntryProgress {
    /// Creates a progress bar, hidden when `quiet` is set
    pub fn new(total_entries: u64, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(total_entries);
            let style = ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            pb.set_style(style);
            pb
        };

        Self { bar }
    }

    /// Shows the entry currently being processed
    pub fn start_entry(&self, name: &str) {
        self.bar.set_message(truncate_name(name));
    }

    /// Marks one entry as done
    pub fn inc(&self) {
        self.bar.inc(1);
    }

    /// Prints a line above the bar without breaking it
    pub fn warn(&self, message: impl AsRef<str>) {
        self.bar.suspend(|| eprintln!("Warning: {}", message.as_ref()));
    }

    /// Finishes and clears the progress bar
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Finishes with a message
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.bar.finish_with_message(msg.into());
    }
}

fn truncate_name(name: &str) -> String {
    const MAX: usize = 40;
    let count = name.chars().count();
    if count <= MAX {
        return name.to_string();
    }
    let tail: String = name.chars().skip(count - (MAX - 3)).collect();
    format!("...{tail}")
}
