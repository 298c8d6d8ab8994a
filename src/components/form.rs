//! Range form component
//!
//! Two numeric inputs and the generate button. Letters are never valid in
//! the inputs, so they double as shortcuts.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Long enough for any i64, with sign
const MAX_FIELD_LEN: usize = 20;

/// Focusable controls, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Start,
    End,
    Generate,
    Export,
}

impl FormFocus {
    fn is_field(&self) -> bool {
        matches!(self, FormFocus::Start | FormFocus::End)
    }
}

/// Characters a number input accepts
fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || c == '-'
}

pub struct FormComponent {
    pub start: String,
    pub end: String,
    pub focus: FormFocus,
    /// Export is only reachable once there is something to export
    pub export_available: bool,
}

impl Default for FormComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl FormComponent {
    pub fn new() -> Self {
        Self {
            start: String::new(),
            end: String::new(),
            focus: FormFocus::Start,
            export_available: false,
        }
    }

    fn focus_order(&self) -> Vec<FormFocus> {
        let mut order = vec![FormFocus::Start, FormFocus::End, FormFocus::Generate];
        if self.export_available {
            order.push(FormFocus::Export);
        }
        order
    }

    fn move_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    pub fn set_export_available(&mut self, available: bool) {
        self.export_available = available;
        if !available && self.focus == FormFocus::Export {
            self.focus = FormFocus::Generate;
        }
    }

    fn focused_field(&mut self) -> Option<&mut String> {
        match self.focus {
            FormFocus::Start => Some(&mut self.start),
            FormFocus::End => Some(&mut self.end),
            FormFocus::Generate | FormFocus::Export => None,
        }
    }

    fn draw_input(&self, frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
        let border = if focused { Color::Yellow } else { Color::DarkGray };
        let content = if value.is_empty() && !focused {
            Span::styled("e.g. 1001", Style::default().fg(Color::DarkGray))
        } else if focused {
            Span::styled(
                format!("{}_", value),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(value.to_string(), Style::default().fg(Color::White))
        };

        let paragraph = Paragraph::new(Line::from(content)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", label))
                .title_style(Style::default().fg(Color::Gray))
                .border_style(Style::default().fg(border)),
        );
        frame.render_widget(paragraph, area);
    }
}

impl Component for FormComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::BackTab => Some(Action::FocusPrev),
            KeyCode::Enter if self.focus == FormFocus::Export => Some(Action::Export),
            KeyCode::Enter => Some(Action::Generate),
            KeyCode::Backspace if self.focus.is_field() => Some(Action::Backspace),
            KeyCode::Char(c) if self.focus.is_field() && is_numeric_char(c) => {
                Some(Action::Input(c))
            }
            KeyCode::Char('g') => Some(Action::Generate),
            KeyCode::Char('e') => Some(Action::Export),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::OpenQuitDialog),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::PageDown => Some(Action::PageDown),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::FocusNext => self.move_focus(true),
            Action::FocusPrev => self.move_focus(false),
            Action::Input(c) => {
                if let Some(field) = self.focused_field() {
                    if field.len() < MAX_FIELD_LEN {
                        field.push(c);
                    }
                }
            }
            Action::Backspace => {
                if let Some(field) = self.focused_field() {
                    field.pop();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Percentage(35),
                Constraint::Percentage(30),
            ])
            .split(area);

        self.draw_input(frame, chunks[0], "From", &self.start, self.focus == FormFocus::Start);
        self.draw_input(frame, chunks[1], "To", &self.end, self.focus == FormFocus::End);

        let focused = self.focus == FormFocus::Generate;
        let button_style = if focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        };
        let button = Paragraph::new(Line::from(Span::styled(" Generate ", button_style)))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            );
        frame.render_widget(button, chunks[2]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(form: &mut FormComponent, s: &str) {
        for c in s.chars() {
            if let Some(action) = form.handle_key_event(key(KeyCode::Char(c))).unwrap() {
                form.update(action).unwrap();
            }
        }
    }

    #[test]
    fn test_typing_fills_focused_field() {
        let mut form = FormComponent::new();
        type_str(&mut form, "1001");
        form.update(Action::FocusNext).unwrap();
        type_str(&mut form, "1050");
        assert_eq!(form.start, "1001");
        assert_eq!(form.end, "1050");
    }

    #[test]
    fn test_letters_are_shortcuts_not_input() {
        let mut form = FormComponent::new();
        assert_eq!(
            form.handle_key_event(key(KeyCode::Char('g'))).unwrap(),
            Some(Action::Generate)
        );
        assert_eq!(
            form.handle_key_event(key(KeyCode::Char('e'))).unwrap(),
            Some(Action::Export)
        );
        type_str(&mut form, "1a2");
        assert_eq!(form.start, "12");
    }

    #[test]
    fn test_backspace() {
        let mut form = FormComponent::new();
        type_str(&mut form, "42");
        form.update(Action::Backspace).unwrap();
        assert_eq!(form.start, "4");
    }

    #[test]
    fn test_field_length_cap() {
        let mut form = FormComponent::new();
        type_str(&mut form, &"9".repeat(30));
        assert_eq!(form.start.len(), MAX_FIELD_LEN);
    }

    #[test]
    fn test_focus_skips_export_until_available() {
        let mut form = FormComponent::new();
        form.update(Action::FocusNext).unwrap();
        form.update(Action::FocusNext).unwrap();
        assert_eq!(form.focus, FormFocus::Generate);
        form.update(Action::FocusNext).unwrap();
        assert_eq!(form.focus, FormFocus::Start);

        form.set_export_available(true);
        form.update(Action::FocusPrev).unwrap();
        assert_eq!(form.focus, FormFocus::Export);
        assert_eq!(
            form.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::Export)
        );

        form.set_export_available(false);
        assert_eq!(form.focus, FormFocus::Generate);
    }

    #[test]
    fn test_enter_generates_from_fields() {
        let mut form = FormComponent::new();
        assert_eq!(
            form.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::Generate)
        );
    }
}
