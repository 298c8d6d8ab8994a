//! Model layer - application state types
//!
//! - `CodeBatch` - the generated range of codes
//! - `ExportStatus` - progress of the background PDF export
//! - `ModalStack` - modal overlay management

pub mod batch;
pub mod export;
pub mod modal;

pub use batch::CodeBatch;
pub use export::{ExportJob, ExportMessage, ExportStatus};
