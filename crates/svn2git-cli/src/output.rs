// Output formatting and styling

use colored::Colorize;
use svn2git_core::{BatchReport, RecordReport, RecordStatus};

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format warning message
    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    /// One line per record
    pub fn record(&self, report: &RecordReport) -> String {
        let name = &report.record.destination_name;
        match &report.status {
            RecordStatus::Migrated(summary) => self.success(&format!(
                "{}: {}",
                name,
                summary.reconciliation.summary()
            )),
            RecordStatus::Failed(e) => self.error(&format!("{}: {}", name, first_line(&e.to_string()))),
            RecordStatus::Cancelled => self.warning(&format!("{}: cancelled", name)),
        }
    }

    /// Full batch summary
    pub fn batch(&self, report: &BatchReport) -> String {
        let mut lines: Vec<String> = report.records.iter().map(|r| self.record(r)).collect();
        let totals = report.totals().to_string();
        lines.push(if report.aborted {
            self.warning(&format!("Aborted: {}", totals))
        } else if report.exit_code() == 0 {
            self.success(&totals)
        } else {
            self.error(&totals)
        });
        lines.join("\n")
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

/// Print the batch summary to stdout
pub fn print_report(report: &BatchReport) {
    println!("{}", OutputStyle::default().batch(report));
}

/// Print error message
pub fn print_error(msg: &str) {
    eprintln!("{}", OutputStyle::default().error(msg));
}
