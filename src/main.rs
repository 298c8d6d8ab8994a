//! barcode-tui - generate a range of CODE128B barcodes and export them as PDF
//!
//! Entry point: loads the config, sets up logging and runs the event loop.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod error;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::logging::LogConfig;
use crate::tui::Tui;
use anyhow::Result;
use crossterm::event::Event;
use std::time::Duration;

fn main() -> Result<()> {
    let (config, config_err) = Config::load_or_create();

    // Logging is best effort; the app works without it
    if let Err(err) = logging::init_logging(LogConfig::from_config(&config)) {
        eprintln!("Warning: logging disabled: {:#}", err);
    }
    if let Some(err) = config_err {
        log::warn!("Using default settings: {:#}", err);
        eprintln!("Warning: using default settings: {:#}", err);
    }
    log::info!("Starting barcode-tui, exports go to {}", config.output_dir().display());

    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    let mut app = App::new(config);
    let result = app.init().and_then(|_| run_app(&mut tui, &mut app));

    tui.exit()?;

    if let Err(err) = result {
        log::error!("Fatal: {:?}", err);
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    log::info!("Exiting");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                log::error!("Draw error: {}", e);
            }
        })?;

        let action = match tui.next_event()? {
            Some(Event::Key(key)) => app.handle_key_event(key)?,
            Some(Event::Resize(w, h)) => Some(Action::Resize(w, h)),
            Some(_) => None,
            // No input within the tick rate
            None => Some(Action::Tick),
        };

        // An action may chain a follow-up action
        let mut current_action = action;
        while let Some(a) = current_action {
            current_action = app.update(a)?;
        }
    }

    Ok(())
}
