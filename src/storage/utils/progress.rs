use std::cell::Cell;
use std::io::{self, Write};

/// Prints transfer percentage to stdout, at most once per percent step.
pub struct ConsoleProgressReporter {
    label: String,
    total_bytes: u64,
    last_percent: Cell<Option<u32>>,
}

impl ConsoleProgressReporter {
    pub fn new(label: impl Into<String>, total_bytes: u64) -> Self {
        Self {
            label: label.into(),
            total_bytes,
            last_percent: Cell::new(None),
        }
    }

    pub fn percent(&self, processed_bytes: u64) -> u32 {
        if self.total_bytes == 0 {
            return 100;
        }
        let processed = processed_bytes.min(self.total_bytes);
        ((processed as f64 / self.total_bytes as f64) * 100.0) as u32
    }

    /// Print progress if the percentage moved since the last report.
    pub fn maybe_report(&self, processed_bytes: u64) {
        let percent = self.percent(processed_bytes);
        if self.last_percent.get() == Some(percent) {
            return;
        }
        self.last_percent.set(Some(percent));
        print!("\r {}: {}%", self.label, percent);
        let _ = io::stdout().flush();
    }
}
