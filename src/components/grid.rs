//! Barcode grid component
//!
//! Shows every generated code as a white card with its bars drawn in
//! half-block glyphs and the number underneath.

use crate::action::Action;
use crate::component::Component;
use crate::model::CodeBatch;
use crate::services::barcode::{encode_code128b, terminal_rows, terminal_width};
use crate::services::sheet::{column_for, MAX_COLUMNS};
use anyhow::Result;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Rows per card: padding, two bar rows, label, padding
const CARD_HEIGHT: u16 = 5;
const CARD_PADDING: u16 = 1;
const GAP: u16 = 1;

/// A code with its bars pre-rendered for the terminal
#[derive(Debug, Clone)]
pub struct GridCard {
    pub code: String,
    /// `None` if the encoder rejected the code
    pub bars: Option<String>,
    /// Cells taken by the bars
    pub width: usize,
}

#[derive(Default)]
pub struct GridComponent {
    pub cards: Vec<GridCard>,
    pub title: String,
    /// First visible row of cards
    pub scroll: usize,
    pub right_to_left: bool,
    /// Updated on draw, used for paging
    visible_rows: usize,
    total_rows: usize,
}

impl GridComponent {
    pub fn new(right_to_left: bool) -> Self {
        Self {
            right_to_left,
            ..Self::default()
        }
    }

    /// Replace the displayed codes with a new batch
    pub fn set_batch(&mut self, batch: &CodeBatch) {
        self.cards = batch
            .codes
            .iter()
            .map(|code| match encode_code128b(code) {
                Ok(modules) => GridCard {
                    code: code.clone(),
                    bars: Some(terminal_rows(&modules)),
                    width: terminal_width(modules.len()),
                },
                Err(e) => {
                    log::warn!("{}", e);
                    GridCard {
                        code: code.clone(),
                        bars: None,
                        width: 0,
                    }
                }
            })
            .collect();
        self.title = batch.summary();
        self.scroll = 0;
    }

    fn card_width(&self) -> u16 {
        let widest = self
            .cards
            .iter()
            .map(|c| c.width.max(c.code.width()))
            .max()
            .unwrap_or(0);
        widest as u16 + CARD_PADDING * 2
    }

    /// Columns that fit in `width`, never more than the PDF uses
    pub fn columns_for_width(&self, width: u16) -> usize {
        let card = self.card_width() + GAP;
        let fit = ((width + GAP) / card.max(1)) as usize;
        fit.clamp(1, MAX_COLUMNS).min(self.cards.len().max(1))
    }

    fn max_scroll(&self) -> usize {
        self.total_rows.saturating_sub(self.visible_rows)
    }

    fn scroll_by(&mut self, delta: isize) {
        let next = self.scroll as isize + delta;
        self.scroll = next.clamp(0, self.max_scroll() as isize) as usize;
    }

    fn draw_card(&self, frame: &mut Frame, area: Rect, card: &GridCard) {
        let ink = Style::default().fg(Color::Black).bg(Color::White);
        let bars = match card.bars {
            Some(ref bars) => Line::from(Span::styled(bars.clone(), ink)),
            None => Line::from(Span::styled(
                "cannot encode",
                Style::default().fg(Color::Red).bg(Color::White),
            )),
        };

        let lines = vec![
            Line::from(""),
            bars.clone(),
            bars,
            Line::from(Span::styled(
                card.code.clone(),
                ink.add_modifier(Modifier::BOLD),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .style(Style::default().bg(Color::White))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn draw_empty(&self, frame: &mut Frame, area: Rect) {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Barcodes will appear here once generated.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Generated barcodes "),
        );
        frame.render_widget(hint, area);
    }
}

impl Component for GridComponent {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let page = self.visible_rows.max(1) as isize;
        match action {
            Action::ScrollUp => self.scroll_by(-1),
            Action::ScrollDown => self.scroll_by(1),
            Action::PageUp => self.scroll_by(-page),
            Action::PageDown => self.scroll_by(page),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        if self.cards.is_empty() {
            self.draw_empty(frame, area);
            return Ok(());
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let columns = self.columns_for_width(inner.width);
        let card_width = self.card_width().min(inner.width);
        let row_height = CARD_HEIGHT + GAP;

        self.total_rows = self.cards.len().div_ceil(columns);
        self.visible_rows = (((inner.height + GAP) / row_height) as usize).max(1);
        self.scroll = self.scroll.min(self.max_scroll());

        // Centre the block of columns horizontally
        let used_width = columns as u16 * card_width + (columns as u16 - 1) * GAP;
        let left = inner.x + inner.width.saturating_sub(used_width) / 2;

        let first = self.scroll * columns;
        let last = ((self.scroll + self.visible_rows) * columns).min(self.cards.len());

        for (i, card) in self.cards[first..last].iter().enumerate() {
            let index = first + i;
            let row = (index / columns - self.scroll) as u16;
            let col = column_for(index, columns, self.right_to_left) as u16;

            let card_area = Rect::new(
                left + col * (card_width + GAP),
                inner.y + row * row_height,
                card_width,
                CARD_HEIGHT,
            )
            .intersection(inner);
            self.draw_card(frame, card_area, card);
        }

        if self.total_rows > self.visible_rows {
            let mut state = ScrollbarState::new(self.max_scroll()).position(self.scroll);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut state,
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn grid_for(start: &str, end: &str) -> GridComponent {
        let mut grid = GridComponent::new(false);
        grid.set_batch(&CodeBatch::generate(start, end).unwrap());
        grid
    }

    #[test]
    fn test_set_batch_encodes_every_code() {
        let grid = grid_for("5", "7");
        assert_eq!(grid.cards.len(), 3);
        assert!(grid.cards.iter().all(|c| c.bars.is_some()));
        assert_eq!(grid.title, "3 barcodes (5 - 7)");
    }

    #[test]
    fn test_card_width_covers_bars() {
        let grid = grid_for("1001", "1002");
        // 79 modules packed two per cell, plus padding
        assert_eq!(grid.card_width(), terminal_width(79) as u16 + 2);
    }

    #[test]
    fn test_columns_capped() {
        let grid = grid_for("1", "50");
        assert_eq!(grid.columns_for_width(10), 1);
        assert_eq!(grid.columns_for_width(1000), MAX_COLUMNS);

        let small = grid_for("1", "2");
        assert_eq!(small.columns_for_width(1000), 2);
    }

    #[test]
    fn test_scroll_clamped_after_draw() {
        let mut grid = grid_for("1", "200");
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| {
                grid.draw(frame, frame.area()).unwrap();
            })
            .unwrap();

        grid.update(Action::ScrollUp).unwrap();
        assert_eq!(grid.scroll, 0);

        for _ in 0..1000 {
            grid.update(Action::PageDown).unwrap();
        }
        assert_eq!(grid.scroll, grid.max_scroll());
        assert!(grid.scroll > 0);
    }

    #[test]
    fn test_draw_shows_labels() {
        let mut grid = grid_for("5", "7");
        let mut terminal = Terminal::new(TestBackend::new(120, 12)).unwrap();
        terminal
            .draw(|frame| {
                grid.draw(frame, frame.area()).unwrap();
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains('5'));
        assert!(text.contains('7'));
        assert!(text.contains('█'));
    }

    #[test]
    fn test_draw_empty_state() {
        let mut grid = GridComponent::new(false);
        let mut terminal = Terminal::new(TestBackend::new(60, 6)).unwrap();
        terminal
            .draw(|frame| {
                grid.draw(frame, frame.area()).unwrap();
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Barcodes will appear here"));
    }
}
