//! Data models for PDF export jobs

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Instant;

/// Status of the current export
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExportStatus {
    #[default]
    Idle,
    Running,
    Finished(PathBuf),
    /// Carries the user-facing message
    Failed(String),
}

impl ExportStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, ExportStatus::Running)
    }
}

/// Messages sent from the export worker thread
#[derive(Debug)]
pub enum ExportMessage {
    Finished(PathBuf),
    Failed(String),
}

/// Handle on an export running in the background
pub struct ExportJob {
    pub receiver: Receiver<ExportMessage>,
    pub start_instant: Instant,
    pub target: PathBuf,
}

/// Spinner frames shown on the export button while busy
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_status_running() {
        assert!(!ExportStatus::Idle.is_running());
        assert!(ExportStatus::Running.is_running());
        assert!(!ExportStatus::Failed("x".to_string()).is_running());
        assert!(!ExportStatus::Finished(PathBuf::from("a.pdf")).is_running());
    }
}
