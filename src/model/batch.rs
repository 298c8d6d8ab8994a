//! Code batches - validated numeric ranges turned into barcode values

use crate::error::RangeError;

/// Largest number of codes a single batch may hold
pub const MAX_BATCH_SIZE: usize = 200;

/// An inclusive range of codes, stringified in numeric order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBatch {
    pub start: i64,
    pub end: i64,
    pub codes: Vec<String>,
}

/// Parse one form field as a signed base-10 integer
pub fn parse_bound(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

impl CodeBatch {
    /// Validate both raw fields and build the batch
    ///
    /// Checks run in a fixed order: both numeric, then ordering, then size.
    pub fn generate(start_raw: &str, end_raw: &str) -> Result<CodeBatch, RangeError> {
        let (start, end) = match (parse_bound(start_raw), parse_bound(end_raw)) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(RangeError::NotNumeric),
        };

        if start > end {
            return Err(RangeError::Inverted);
        }

        // An overflowing difference is far past the cap
        let span = end.checked_sub(start).ok_or(RangeError::TooLarge)?;
        if span > (MAX_BATCH_SIZE as i64 - 1) {
            return Err(RangeError::TooLarge);
        }

        let codes = (start..=end).map(|n| n.to_string()).collect();
        Ok(CodeBatch { start, end, codes })
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// File name for the exported PDF, e.g. `MEG_GYM_Barcodes_5_to_7.pdf`
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}_{}_to_{}.pdf", prefix, self.start, self.end)
    }

    /// Short description for the grid title
    pub fn summary(&self) -> String {
        if self.len() == 1 {
            format!("1 barcode ({})", self.start)
        } else {
            format!("{} barcodes ({} - {})", self.len(), self.start, self.end)
        }
    }
}
