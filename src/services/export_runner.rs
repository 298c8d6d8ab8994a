//! Background export runner
//!
//! Lays out the sheet and writes the PDF on a worker thread so the UI keeps
//! redrawing (and the spinner keeps turning) while the file is assembled.

use crate::error::ExportError;
use crate::model::{CodeBatch, ExportJob, ExportMessage, ExportStatus};
use crate::services::pdf::write_sheet_pdf;
use crate::services::sheet::SheetLayout;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender, TryRecvError};
use std::thread;
use std::time::Instant;

/// Everything the worker needs, owned so it can move to another thread
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub batch: CodeBatch,
    pub target: PathBuf,
    pub title: String,
    pub right_to_left: bool,
}

/// Lay out and write one batch, synchronously
pub fn export_batch(request: &ExportRequest) -> Result<(), ExportError> {
    if request.batch.is_empty() {
        return Err(ExportError::Empty);
    }
    let sheet = SheetLayout::build(&request.batch, request.right_to_left)?;
    write_sheet_pdf(&sheet, &request.title, &request.target)
}

/// Runs at most one export at a time
#[derive(Default)]
pub struct ExportRunner {
    job: Option<ExportJob>,
}

impl ExportRunner {
    pub fn new() -> Self {
        Self { job: None }
    }

    /// Whether a worker is still attached
    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    /// Start exporting in the background
    ///
    /// Returns the new status. A second request while one is running is
    /// ignored and reported as still running.
    pub fn spawn(&mut self, request: ExportRequest) -> ExportStatus {
        if self.is_busy() {
            log::warn!("Export already running, ignoring new request");
            return ExportStatus::Running;
        }

        let (tx, rx) = mpsc::channel();
        let target = request.target.clone();

        log::info!(
            "Exporting {} barcode(s) to {}",
            request.batch.len(),
            target.display()
        );

        thread::spawn(move || {
            Self::run_export(&request, tx);
        });

        self.job = Some(ExportJob {
            receiver: rx,
            start_instant: Instant::now(),
            target,
        });

        ExportStatus::Running
    }

    /// Poll the worker, returns true if the status changed
    pub fn poll(&mut self, status: &mut ExportStatus) -> bool {
        let Some(ref job) = self.job else {
            return false;
        };

        let next = match job.receiver.try_recv() {
            Ok(ExportMessage::Finished(path)) => {
                log::info!(
                    "Export finished in {:.2}s: {}",
                    job.start_instant.elapsed().as_secs_f64(),
                    path.display()
                );
                ExportStatus::Finished(path)
            }
            Ok(ExportMessage::Failed(message)) => ExportStatus::Failed(message),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                log::error!("Export worker for {} exited without reporting", job.target.display());
                ExportStatus::Failed(crate::error::EXPORT_FAILED_MESSAGE.to_string())
            }
        };

        *status = next;
        self.job = None;
        true
    }

    fn run_export(request: &ExportRequest, tx: Sender<ExportMessage>) {
        let message = match export_batch(request) {
            Ok(()) => ExportMessage::Finished(request.target.clone()),
            Err(e) => {
                log::error!("Export to {} failed: {}", request.target.display(), e);
                ExportMessage::Failed(e.user_message())
            }
        };
        let _ = tx.send(message);
    }
}

/// Full output path for a batch
pub fn export_target(output_dir: &Path, prefix: &str, batch: &CodeBatch) -> PathBuf {
    output_dir.join(batch.file_name(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request(dir: &Path, start: &str, end: &str) -> ExportRequest {
        let batch = CodeBatch::generate(start, end).unwrap();
        ExportRequest {
            target: export_target(dir, "MEG_GYM_Barcodes", &batch),
            batch,
            title: "MEG GYM".to_string(),
            right_to_left: false,
        }
    }

    fn wait_for(runner: &mut ExportRunner, status: &mut ExportStatus) {
        for _ in 0..500 {
            if runner.poll(status) {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("export did not finish");
    }

    #[test]
    fn test_export_target_name() {
        let batch = CodeBatch::generate("5", "7").unwrap();
        let path = export_target(Path::new("/tmp/out"), "MEG_GYM_Barcodes", &batch);
        assert_eq!(path, PathBuf::from("/tmp/out/MEG_GYM_Barcodes_5_to_7.pdf"));
    }

    #[test]
    fn test_export_batch_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = request(dir.path(), "1", "1");
        req.batch.codes.clear();
        assert!(matches!(export_batch(&req), Err(ExportError::Empty)));
        assert!(!req.target.exists());
    }

    #[test]
    fn test_runner_finishes() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), "1001", "1010");
        let target = req.target.clone();

        let mut runner = ExportRunner::new();
        let mut status = runner.spawn(req);
        assert!(status.is_running());
        assert!(runner.is_busy());

        wait_for(&mut runner, &mut status);
        assert_eq!(status, ExportStatus::Finished(target.clone()));
        assert!(!runner.is_busy());
        assert!(target.exists());
    }

    #[test]
    fn test_runner_reports_generic_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = request(dir.path(), "1", "3");
        req.target = dir.path().join("no-such-dir").join("out.pdf");

        let mut runner = ExportRunner::new();
        let mut status = runner.spawn(req);
        wait_for(&mut runner, &mut status);

        assert_eq!(
            status,
            ExportStatus::Failed(crate::error::EXPORT_FAILED_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_poll_without_job() {
        let mut runner = ExportRunner::new();
        let mut status = ExportStatus::Idle;
        assert!(!runner.poll(&mut status));
        assert_eq!(status, ExportStatus::Idle);
    }
}
