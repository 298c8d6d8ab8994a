//! Error types for barcode generation and export
//!
//! Domain errors are typed with `thiserror`; the application shell
//! (terminal, config, logging) uses `anyhow` instead.

use std::path::PathBuf;
use thiserror::Error;

/// Validation failures when turning the two form fields into a batch.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("Please enter valid whole numbers in both fields.")]
    NotNumeric,

    #[error("The start number must be less than or equal to the end number.")]
    Inverted,

    #[error("Cannot generate more than 200 barcodes at once.")]
    TooLarge,
}

/// The barcode encoder rejected a code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot encode {code:?} as CODE128B: {reason}")]
pub struct BarcodeError {
    pub code: String,
    pub reason: String,
}

/// Failures while exporting a batch to PDF.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No barcodes to export. Please generate barcodes first.")]
    Empty,

    #[error(transparent)]
    Barcode(#[from] BarcodeError),

    #[error("PDF assembly failed: {0}")]
    Pdf(String),

    #[error("Failed to write file: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Message shown in the status line.
    ///
    /// Only the empty case is specific; everything else collapses into one
    /// generic message and the details go to the log.
    pub fn user_message(&self) -> String {
        match self {
            ExportError::Empty => self.to_string(),
            _ => EXPORT_FAILED_MESSAGE.to_string(),
        }
    }
}

pub const EXPORT_FAILED_MESSAGE: &str =
    "Something went wrong while creating the PDF. Please try again.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_error_messages() {
        assert_eq!(
            RangeError::NotNumeric.to_string(),
            "Please enter valid whole numbers in both fields."
        );
        assert!(RangeError::TooLarge.to_string().contains("200"));
    }

    #[test]
    fn test_export_user_message_hides_details() {
        let err = ExportError::Pdf("font table corrupt".to_string());
        assert_eq!(err.user_message(), EXPORT_FAILED_MESSAGE);
        assert!(err.to_string().contains("font table corrupt"));
    }

    #[test]
    fn test_export_user_message_empty() {
        assert_eq!(
            ExportError::Empty.user_message(),
            "No barcodes to export. Please generate barcodes first."
        );
    }
}
