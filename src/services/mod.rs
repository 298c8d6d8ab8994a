//! Barcode encoding and export services
//!
//! - CODE128B encoding via `barcoders`
//! - Sheet layout shared by the PDF writer
//! - PDF assembly via `printpdf`
//! - Background export execution

pub mod barcode;
pub mod export_runner;
pub mod pdf;
pub mod sheet;

pub use export_runner::{export_target, ExportRequest, ExportRunner};
