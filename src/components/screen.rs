//! Main screen - header, form, status line, grid, export button and help bar

use crate::component::Component;
use crate::components::{calculate_main_layout, FormComponent, GridComponent};
use crate::components::form::FormFocus;
use crate::model::export::SPINNER_FRAMES;
use crate::model::ExportStatus;
use anyhow::Result;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Read-only state the main screen needs from the App
pub struct ScreenContext<'a> {
    pub title: &'a str,
    pub error: Option<&'a str>,
    pub status_message: Option<&'a str>,
    pub export_status: &'a ExportStatus,
    pub tick: usize,
}

pub fn draw_main_screen(
    frame: &mut Frame,
    area: Rect,
    form: &mut FormComponent,
    grid: &mut GridComponent,
    ctx: &ScreenContext,
) -> Result<()> {
    let layout = calculate_main_layout(area, form.export_available);

    render_header(frame, layout.header, ctx.title);
    form.draw(frame, layout.form)?;
    render_status_line(frame, layout.status, ctx);
    grid.draw(frame, layout.grid)?;
    if let Some(export_area) = layout.export {
        render_export_button(frame, export_area, form.focus == FormFocus::Export, ctx);
    }
    render_help_bar(frame, layout.help, form.export_available);

    Ok(())
}

fn render_header(frame: &mut Frame, area: Rect, title: &str) {
    let lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Member barcode generator",
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_status_line(frame: &mut Frame, area: Rect, ctx: &ScreenContext) {
    let line = if let Some(error) = ctx.error {
        Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        ))
    } else if let Some(status) = ctx.status_message {
        Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Green),
        ))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_export_button(frame: &mut Frame, area: Rect, focused: bool, ctx: &ScreenContext) {
    let busy = ctx.export_status.is_running();

    let (label, style) = if busy {
        let spinner = SPINNER_FRAMES[ctx.tick % SPINNER_FRAMES.len()];
        (
            format!(" {} Exporting... ", spinner),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        )
    } else if focused {
        (
            " Export as PDF ".to_string(),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            " Export as PDF ".to_string(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    };

    let border = if busy { Color::DarkGray } else { Color::Green };
    let button = Paragraph::new(Line::from(Span::styled(label, style)))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );

    let width = 30.min(area.width);
    let centered = Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height);
    frame.render_widget(button, centered);
}

fn render_help_bar(frame: &mut Frame, area: Rect, export_available: bool) {
    let key = |k: &str, color: Color| {
        Span::styled(
            format!(" {} ", k),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
    };

    let mut spans = vec![
        key("q", Color::Yellow),
        Span::raw("Quit "),
        key("Tab", Color::Cyan),
        Span::raw("Next field "),
        key("Enter", Color::Green),
        Span::raw("Generate "),
    ];
    if export_available {
        spans.push(key("e", Color::Green));
        spans.push(Span::raw("Export "));
        spans.push(key("↑↓", Color::Cyan));
        spans.push(Span::raw("Scroll "));
    }
    spans.push(key("?", Color::White));
    spans.push(Span::raw("Help"));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
