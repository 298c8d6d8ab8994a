//! Root application component
//!
//! The App owns the generated batch and the export state, routes key events
//! to the focused component and applies Actions. Rendering is delegated to
//! the child components.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    draw_main_screen, FormComponent, GridComponent, HelpDialog, QuitDialog, ScreenContext,
};
use crate::config::Config;
use crate::error::ExportError;
use crate::model::modal::{Modal, ModalStack};
use crate::model::{CodeBatch, ExportStatus};
use crate::services::{export_target, ExportRequest, ExportRunner};
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    pub config: Config,

    /// Last successfully generated batch
    pub batch: Option<CodeBatch>,

    pub export_status: ExportStatus,
    pub export_runner: ExportRunner,

    pub modals: ModalStack,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Error message shown in the status line
    pub error: Option<String>,

    /// Success message shown in the status line
    pub status_message: Option<String>,

    /// Tick counter for the export spinner
    pub tick: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub form: FormComponent,
    pub grid: GridComponent,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    pub fn new(config: Config) -> App {
        App {
            grid: GridComponent::new(config.right_to_left),
            config,
            batch: None,
            export_status: ExportStatus::Idle,
            export_runner: ExportRunner::new(),
            modals: ModalStack::new(),
            should_quit: false,
            error: None,
            status_message: None,
            tick: 0,
            form: FormComponent::new(),
            quit_dialog: QuitDialog::default(),
            help_dialog: HelpDialog::default(),
        }
    }

    /// Whether an export is in progress
    pub fn is_busy(&self) -> bool {
        self.export_status.is_running()
    }

    /// Validate the form and replace the batch
    ///
    /// On failure the previous batch stays on screen.
    fn generate(&mut self) {
        self.error = None;
        self.status_message = None;

        match CodeBatch::generate(&self.form.start, &self.form.end) {
            Ok(batch) => {
                log::info!("Generated {}", batch.summary());
                self.grid.set_batch(&batch);
                self.form.set_export_available(!batch.is_empty());
                self.batch = Some(batch);
            }
            Err(e) => {
                log::debug!(
                    "Rejected range {:?}..{:?}: {:?}",
                    self.form.start,
                    self.form.end,
                    e
                );
                self.error = Some(e.to_string());
            }
        }
    }

    /// Start a background export of the current batch
    fn export(&mut self) {
        if self.is_busy() {
            return;
        }

        let batch = match self.batch {
            Some(ref batch) if !batch.is_empty() => batch.clone(),
            _ => {
                self.error = Some(ExportError::Empty.user_message());
                return;
            }
        };

        self.error = None;
        self.status_message = None;

        let request = ExportRequest {
            target: export_target(&self.config.output_dir(), &self.config.file_prefix(), &batch),
            batch,
            title: self.config.title.clone(),
            right_to_left: self.config.right_to_left,
        };
        self.export_status = self.export_runner.spawn(request);
    }

    /// Pick up a finished export, if any
    fn poll_export(&mut self) {
        if !self.export_runner.poll(&mut self.export_status) {
            return;
        }
        match self.export_status {
            ExportStatus::Finished(ref path) => {
                self.status_message = Some(format!(
                    "Saved {} at {}",
                    path.display(),
                    Local::now().format("%H:%M:%S")
                ));
            }
            ExportStatus::Failed(ref message) => {
                self.error = Some(message.clone());
            }
            ExportStatus::Idle | ExportStatus::Running => {}
        }
    }

    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => {
                self.quit_dialog.export_running = self.is_busy();
                self.quit_dialog.draw(frame, area)
            }
            Modal::Help => self.help_dialog.draw(frame, area),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::ForceQuit));
        }

        if self.modals.is_empty() {
            return self.form.handle_key_event(key);
        }
        match self.modals.top().cloned() {
            Some(modal) => self.handle_modal_key_event(&modal, key),
            None => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                self.poll_export();
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Form (delegate to FormComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::FocusNext | Action::FocusPrev | Action::Input(_) | Action::Backspace => {
                return self.form.update(action);
            }
            Action::Generate => self.generate(),
            Action::Export => self.export(),

            // ─────────────────────────────────────────────────────────────────
            // Scrolling (delegate to GridComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp | Action::ScrollDown | Action::PageUp | Action::PageDown => {
                return self.grid.update(action);
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => {
                if let Some(Modal::QuitConfirm) = self.modals.top() {
                    if self.is_busy() {
                        log::warn!("Quitting with an export still running");
                    }
                    self.should_quit = true;
                }
                self.modals.pop();
            }
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let ctx = ScreenContext {
            title: &self.config.title,
            error: self.error.as_deref(),
            status_message: self.status_message.as_deref(),
            export_status: &self.export_status,
            tick: self.tick,
        };

        draw_main_screen(frame, area, &mut self.form, &mut self.grid, &ctx)?;

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}
