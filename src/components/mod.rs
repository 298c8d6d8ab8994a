//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod form;
pub mod grid;
pub mod help_dialog;
pub mod layout;
pub mod quit_dialog;
pub mod screen;

pub use form::FormComponent;
pub use grid::GridComponent;
pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup};
pub use quit_dialog::QuitDialog;
pub use screen::{draw_main_screen, ScreenContext};
