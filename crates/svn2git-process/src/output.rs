//! Captured output of a supervised run

/// Result of a supervised process run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `None` when the process was killed by a signal or never
    /// reported one before the run was aborted
    pub exit_code: Option<i32>,
    /// Output lines in emission order, trailing whitespace trimmed
    pub lines: Vec<String>,
    /// Set when reading the output stream failed and the run was aborted
    pub stream_error: Option<String>,
}

impl ProcessOutput {
    /// Output of a process that ran to completion
    pub fn completed(exit_code: Option<i32>, lines: Vec<String>) -> Self {
        Self {
            exit_code,
            lines,
            stream_error: None,
        }
    }

    /// True only for a clean zero exit
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && self.stream_error.is_none()
    }

    /// Whole output joined by newlines
    pub fn combined(&self) -> String {
        self.lines.join("\n")
    }
}
