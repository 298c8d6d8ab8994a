//! PDF writer for barcode sheets
//!
//! Produces a single page whose size equals the sheet, drawn with vector
//! rectangles so the bars stay sharp at any zoom.

use crate::error::ExportError;
use crate::services::sheet::{
    SheetLayout, CARD_BACKGROUND, INK, LABEL_SIZE, PX_TO_PT, SHEET_BACKGROUND,
};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Point, Polygon, Rgb,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Helvetica advance widths in 1/1000 em
const DIGIT_ADVANCE: f32 = 556.0;
const HYPHEN_ADVANCE: f32 = 333.0;

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn mm(px: f32) -> Mm {
    pt_to_mm(px * PX_TO_PT)
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

/// Approximate label width in pixels for centring
fn label_width(label: &str, size: f32) -> f32 {
    label
        .chars()
        .map(|c| if c == '-' { HYPHEN_ADVANCE } else { DIGIT_ADVANCE })
        .sum::<f32>()
        * size
        / 1000.0
}

/// Fill a top-left-origin rectangle on a page of height `page_height` (px)
fn fill_rect(
    layer: &PdfLayerReference,
    page_height: f32,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) {
    let bottom = page_height - y - height;
    let top = page_height - y;
    let ring = vec![
        (Point::new(mm(x), mm(bottom)), false),
        (Point::new(mm(x + width), mm(bottom)), false),
        (Point::new(mm(x + width), mm(top)), false),
        (Point::new(mm(x), mm(top)), false),
    ];
    layer.add_polygon(Polygon {
        rings: vec![ring],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}

fn draw_sheet(layer: &PdfLayerReference, font: &IndirectFontRef, sheet: &SheetLayout) {
    let page_height = sheet.height;

    layer.set_fill_color(rgb(SHEET_BACKGROUND));
    fill_rect(layer, page_height, 0.0, 0.0, sheet.width, sheet.height);

    for card in &sheet.cards {
        layer.set_fill_color(rgb(CARD_BACKGROUND));
        fill_rect(layer, page_height, card.x, card.y, card.width, card.height);

        layer.set_fill_color(rgb(INK));
        for bar in &card.bars {
            fill_rect(layer, page_height, bar.x, bar.y, bar.width, bar.height);
        }

        let text_x = card.label_center_x - label_width(&card.code, LABEL_SIZE) / 2.0;
        layer.use_text(
            card.code.as_str(),
            LABEL_SIZE * PX_TO_PT,
            mm(text_x),
            mm(page_height - card.label_baseline),
            font,
        );
    }
}

/// Write the sheet to `path` as a one-page PDF
pub fn write_sheet_pdf(sheet: &SheetLayout, title: &str, path: &Path) -> Result<(), ExportError> {
    let (page_width, page_height) = sheet.page_size();
    let (doc, page, layer) = PdfDocument::new(
        title,
        pt_to_mm(page_width),
        pt_to_mm(page_height),
        "Barcodes",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let layer = doc.get_page(page).get_layer(layer);

    draw_sheet(&layer, &font, sheet);

    let file = File::create(path).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    log::debug!(
        "Wrote {} card(s) in a {}x{} grid to {} ({:.0}x{:.0} pt)",
        sheet.cards.len(),
        sheet.columns,
        sheet.rows,
        path.display(),
        page_width,
        page_height
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CodeBatch;

    #[test]
    fn test_label_width() {
        assert_eq!(label_width("10", 1000.0), 1112.0);
        assert_eq!(label_width("-1", 1000.0), 889.0);
    }

    #[test]
    fn test_write_sheet_pdf_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.pdf");
        let batch = CodeBatch::generate("5", "7").unwrap();
        let sheet = SheetLayout::build(&batch, false).unwrap();

        write_sheet_pdf(&sheet, "test", &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    /// Numbers inside the first `/MediaBox [..]` of a PDF
    fn media_box(bytes: &[u8]) -> Vec<f32> {
        let text = String::from_utf8_lossy(bytes);
        let start = text.find("/MediaBox").expect("no MediaBox");
        let rest = &text[start..];
        let open = rest.find('[').unwrap();
        let close = rest.find(']').unwrap();
        rest[open + 1..close]
            .split_whitespace()
            .map(|n| n.parse::<f32>().unwrap())
            .collect()
    }

    #[test]
    fn test_page_matches_sheet_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.pdf");
        let batch = CodeBatch::generate("1", "12").unwrap();
        let sheet = SheetLayout::build(&batch, false).unwrap();

        write_sheet_pdf(&sheet, "test", &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let media_box = media_box(&bytes);
        let (width, height) = sheet.page_size();
        assert_eq!(media_box.len(), 4);
        assert!((media_box[2] - width).abs() < 0.5, "{:?} vs {}", media_box, width);
        assert!((media_box[3] - height).abs() < 0.5, "{:?} vs {}", media_box, height);
    }

    #[test]
    fn test_write_sheet_pdf_bad_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("sheet.pdf");
        let batch = CodeBatch::generate("1", "1").unwrap();
        let sheet = SheetLayout::build(&batch, false).unwrap();

        let err = write_sheet_pdf(&sheet, "test", &path).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }
}
