//! Sheet layout - the grid of barcode cards that becomes the PDF page
//!
//! All lengths are CSS pixels with the origin at the top-left corner.
//! The PDF writer converts to points and flips the y axis.

use crate::error::BarcodeError;
use crate::model::CodeBatch;
use crate::services::barcode::{bar_runs, encode_code128b};

/// PDF points per CSS pixel
pub const PX_TO_PT: f32 = 0.75;

const GRID_PADDING: f32 = 16.0;
const GRID_GAP: f32 = 24.0;
pub const MAX_COLUMNS: usize = 5;
const CARD_PADDING: f32 = 12.0;
/// Quiet margin drawn around each barcode inside its card
const BARCODE_MARGIN: f32 = 10.0;
const MODULE_WIDTH: f32 = 1.5;
const BAR_HEIGHT: f32 = 60.0;
const LABEL_GAP: f32 = 8.0;
pub const LABEL_SIZE: f32 = 16.0;
const LABEL_LINE_HEIGHT: f32 = 24.0;

/// RGB colours, 0-255
pub const SHEET_BACKGROUND: (u8, u8, u8) = (0x11, 0x18, 0x27);
pub const CARD_BACKGROUND: (u8, u8, u8) = (0xff, 0xff, 0xff);
pub const INK: (u8, u8, u8) = (0x00, 0x00, 0x00);

/// A filled rectangle, top-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One barcode card: white box, bars, and the code underneath
#[derive(Debug, Clone)]
pub struct CardLayout {
    pub code: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub bars: Vec<Bar>,
    pub label_center_x: f32,
    pub label_baseline: f32,
}

/// The complete sheet
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub width: f32,
    pub height: f32,
    pub columns: usize,
    pub rows: usize,
    pub cards: Vec<CardLayout>,
}

/// Visual column for the `index`-th card
///
/// Right-to-left sheets fill each row starting from the right edge.
pub fn column_for(index: usize, columns: usize, right_to_left: bool) -> usize {
    let col = index % columns;
    if right_to_left {
        columns - 1 - col
    } else {
        col
    }
}

impl SheetLayout {
    /// Encode every code in the batch and place the cards on a grid
    pub fn build(batch: &CodeBatch, right_to_left: bool) -> Result<SheetLayout, BarcodeError> {
        let encoded = batch
            .codes
            .iter()
            .map(|code| encode_code128b(code).map(|modules| (code.clone(), modules)))
            .collect::<Result<Vec<_>, _>>()?;

        let widest = encoded.iter().map(|(_, m)| m.len()).max().unwrap_or(0);
        let inner_width = widest as f32 * MODULE_WIDTH + BARCODE_MARGIN * 2.0;
        let card_width = inner_width + CARD_PADDING * 2.0;
        let card_height = CARD_PADDING * 2.0
            + BARCODE_MARGIN * 2.0
            + BAR_HEIGHT
            + LABEL_GAP
            + LABEL_LINE_HEIGHT;

        let columns = encoded.len().clamp(1, MAX_COLUMNS);
        let rows = encoded.len().div_ceil(columns).max(1);

        let width = GRID_PADDING * 2.0
            + columns as f32 * card_width
            + (columns - 1) as f32 * GRID_GAP;
        let height =
            GRID_PADDING * 2.0 + rows as f32 * card_height + (rows - 1) as f32 * GRID_GAP;

        let cards = encoded
            .into_iter()
            .enumerate()
            .map(|(i, (code, modules))| {
                let col = column_for(i, columns, right_to_left);
                let row = i / columns;
                let x = GRID_PADDING + col as f32 * (card_width + GRID_GAP);
                let y = GRID_PADDING + row as f32 * (card_height + GRID_GAP);

                // Shorter codes are centred inside the shared card width
                let own_width = modules.len() as f32 * MODULE_WIDTH;
                let bars_x = x
                    + CARD_PADDING
                    + BARCODE_MARGIN
                    + (widest as f32 * MODULE_WIDTH - own_width) / 2.0;
                let bars_y = y + CARD_PADDING + BARCODE_MARGIN;

                let bars = bar_runs(&modules)
                    .into_iter()
                    .map(|(offset, run)| Bar {
                        x: bars_x + offset as f32 * MODULE_WIDTH,
                        y: bars_y,
                        width: run as f32 * MODULE_WIDTH,
                        height: BAR_HEIGHT,
                    })
                    .collect();

                CardLayout {
                    code,
                    x,
                    y,
                    width: card_width,
                    height: card_height,
                    bars,
                    label_center_x: x + card_width / 2.0,
                    label_baseline: bars_y + BAR_HEIGHT + BARCODE_MARGIN + LABEL_GAP + LABEL_SIZE,
                }
            })
            .collect();

        Ok(SheetLayout {
            width,
            height,
            columns,
            rows,
            cards,
        })
    }

    /// Page size in PDF points
    pub fn page_size(&self) -> (f32, f32) {
        (self.width * PX_TO_PT, self.height * PX_TO_PT)
    }
}
