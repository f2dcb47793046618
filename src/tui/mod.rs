//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Busy** (request or picker in flight): draws every ~80ms so the spinner moves.
//! - **Idle**: sleeps up to 500ms, only redraws on events or finished background work.
//!
//! Background work runs on tokio tasks that report back through an
//! `mpsc::Sender<Action>`; the loop drains that channel between frames.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::core::tasks;
use crate::device::{CommandPicker, DevicePermissions};
use crate::inference::GeminiProvider;
use crate::tui::component::EventHandler;
use crate::tui::components::{ResponseViewState, SearchBox, SearchEvent, ThumbnailState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub response_view: ResponseViewState,
    pub search_box: SearchBox,
    pub thumbnail: ThumbnailState,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            response_view: ResponseViewState::new(),
            search_box: SearchBox::new(),
            thumbnail: ThumbnailState::default(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock, // Blinking cursors flicker under continuous redraws
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste, Hide);
    }
}

/// Wire the real services (Gemini, camera device, shell pickers) into an `App`.
pub fn build_app(config: &ResolvedConfig) -> App {
    let model = Arc::new(GeminiProvider::new(
        config.gemini_api_key.clone(),
        config.model_name.clone(),
        Some(config.gemini_base_url.clone()),
    ));
    let permissions = Arc::new(DevicePermissions::new(
        config.camera_device.clone(),
        config.camera_enabled,
    ));
    let picker = Arc::new(CommandPicker::new(
        config.camera_command.clone(),
        config.gallery_command.clone(),
    ));
    App::from_config(model, permissions, picker, config)
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut app = build_app(&config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let animating = app.view.in_progress;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = route_event(&event, &mut tui) {
                should_quit |= dispatch(&mut app, &mut tui, action, &tx);
            }
        }

        // Handle background task results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            should_quit |= dispatch(&mut app, &mut tui, action, &tx);
        }

        if should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

/// Route one terminal event to the component that owns it. Returns the core
/// action it maps to, if any.
fn route_event(event: &TuiEvent, tui: &mut TuiState) -> Option<Action> {
    match event {
        TuiEvent::Resize => None,
        TuiEvent::Quit => Some(Action::Quit),
        TuiEvent::ClearImage => Some(Action::ClearImage),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.response_view.handle_event(event);
            None
        }
        TuiEvent::MouseClick(..) if tui.thumbnail.handle_event(event).is_some() => {
            Some(Action::ClearImage)
        }
        _ => match tui.search_box.handle_event(event)? {
            SearchEvent::Submit(text) => Some(Action::Submit(text)),
            SearchEvent::RequestImage(source) => Some(Action::RequestImage(source)),
            SearchEvent::ContentChanged => None,
        },
    }
}

/// Apply an action and start whatever effect it asks for. Returns true on quit.
fn dispatch(app: &mut App, tui: &mut TuiState, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    if matches!(action, Action::ResponseReceived { .. }) {
        debug!("Response arrived; scrolling back to top");
        tui.response_view.reset();
    }
    match update(app, action) {
        Effect::None => false,
        Effect::Quit => true,
        Effect::SpawnRequest { prompt, payload } => {
            let model = app.model.clone();
            let tx = tx.clone();
            info!("Spawning model request ({} part(s))", payload.parts().len());
            tokio::spawn(async move {
                let action = tasks::run_request(model.as_ref(), prompt, payload).await;
                if tx.send(action).is_err() {
                    warn!("Failed to send model response: receiver dropped");
                }
            });
            false
        }
        Effect::SpawnPick(source) => {
            let permissions = app.permissions.clone();
            let picker = app.picker.clone();
            let tx = tx.clone();
            info!("Spawning image pick from {}", source.label());
            tokio::spawn(async move {
                let action =
                    tasks::run_pick(permissions.as_ref(), picker.as_ref(), source).await;
                if tx.send(action).is_err() {
                    warn!("Failed to send picked image: receiver dropped");
                }
            });
            false
        }
    }
}
