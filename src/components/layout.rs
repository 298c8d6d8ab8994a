//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub header: Rect,
    pub form: Rect,
    pub status: Rect,
    pub grid: Rect,
    pub export: Option<Rect>,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate main screen layout
///
/// The export row only exists once there are barcodes to export.
pub fn calculate_main_layout(area: Rect, has_export: bool) -> MainLayout {
    let mut constraints = vec![
        Constraint::Length(2), // Header
        Constraint::Length(3), // Form
        Constraint::Length(1), // Status
        Constraint::Min(0),    // Grid
    ];
    if has_export {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(1)); // Help

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let (export, help) = if has_export {
        (Some(chunks[4]), chunks[5])
    } else {
        (None, chunks[4])
    };

    MainLayout {
        header: chunks[0],
        form: chunks[1],
        status: chunks[2],
        grid: chunks[3],
        export,
        help,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup() {
        let popup = centered_popup(Rect::new(0, 0, 100, 40), 40, 10);
        assert_eq!(popup, Rect::new(30, 15, 40, 10));

        let clamped = centered_popup(Rect::new(0, 0, 20, 5), 40, 10);
        assert_eq!(clamped.width, 20);
        assert_eq!(clamped.height, 5);
    }

    #[test]
    fn test_layout_export_row() {
        let area = Rect::new(0, 0, 80, 30);
        let without = calculate_main_layout(area, false);
        assert!(without.export.is_none());
        assert_eq!(without.help.y, 29);

        let with = calculate_main_layout(area, true);
        let export = with.export.unwrap();
        assert_eq!(export.height, 3);
        assert_eq!(with.grid.height, without.grid.height - 3);
    }
}
