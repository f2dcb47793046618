use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use log::warn;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Core actions (passed to core::update)
    Quit,
    Submit,
    RequestCamera, // Ctrl+T
    RequestGallery, // Ctrl+G
    ClearImage,    // Ctrl+X

    // TUI-local events (handled directly in TUI)
    InputChar(char),
    Paste(String), // Bracketed paste
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    MouseClick(u16, u16),
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    let ready = event::poll(timeout).unwrap_or_else(|e| {
        warn!("Event poll failed: {}", e);
        false
    });
    if !ready {
        return None;
    }
    match event::read() {
        Ok(event) => translate(event),
        Err(e) => {
            warn!("Event read failed: {}", e);
            None
        }
    }
}

fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => {
            // Ignore key releases reported by enhanced keyboard protocols
            if key_event.kind == KeyEventKind::Release {
                return None;
            }
            log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
            match (key_event.modifiers, key_event.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::Quit),
                (KeyModifiers::CONTROL, KeyCode::Char('t')) => Some(TuiEvent::RequestCamera),
                (KeyModifiers::CONTROL, KeyCode::Char('g')) => Some(TuiEvent::RequestGallery),
                (KeyModifiers::CONTROL, KeyCode::Char('x')) => Some(TuiEvent::ClearImage),
                (KeyModifiers::CONTROL, _) => None,
                // Regular key handling
                (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
                (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
                (_, KeyCode::Delete) => Some(TuiEvent::Delete),
                (_, KeyCode::Left) => Some(TuiEvent::CursorLeft),
                (_, KeyCode::Right) => Some(TuiEvent::CursorRight),
                (_, KeyCode::Home) => Some(TuiEvent::CursorHome),
                (_, KeyCode::End) => Some(TuiEvent::CursorEnd),
                (_, KeyCode::Enter) => Some(TuiEvent::Submit),
                (_, KeyCode::Esc) => Some(TuiEvent::Quit),
                (_, KeyCode::Up) => Some(TuiEvent::ScrollUp),
                (_, KeyCode::Down) => Some(TuiEvent::ScrollDown),
                (_, KeyCode::PageUp) => Some(TuiEvent::ScrollPageUp),
                (_, KeyCode::PageDown) => Some(TuiEvent::ScrollPageDown),
                _ => None,
            }
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                Some(TuiEvent::MouseClick(mouse_event.column, mouse_event.row))
            }
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, MouseEvent};

    fn key(modifiers: KeyModifiers, code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_control_shortcuts() {
        assert_eq!(
            translate(key(KeyModifiers::CONTROL, KeyCode::Char('t'))),
            Some(TuiEvent::RequestCamera)
        );
        assert_eq!(
            translate(key(KeyModifiers::CONTROL, KeyCode::Char('g'))),
            Some(TuiEvent::RequestGallery)
        );
        assert_eq!(
            translate(key(KeyModifiers::CONTROL, KeyCode::Char('x'))),
            Some(TuiEvent::ClearImage)
        );
        assert_eq!(
            translate(key(KeyModifiers::CONTROL, KeyCode::Char('c'))),
            Some(TuiEvent::Quit)
        );
        assert_eq!(translate(key(KeyModifiers::CONTROL, KeyCode::Char('q'))), None);
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(
            translate(key(KeyModifiers::SHIFT, KeyCode::Char('A'))),
            Some(TuiEvent::InputChar('A'))
        );
        assert_eq!(
            translate(key(KeyModifiers::NONE, KeyCode::Enter)),
            Some(TuiEvent::Submit)
        );
        assert_eq!(
            translate(key(KeyModifiers::NONE, KeyCode::Esc)),
            Some(TuiEvent::Quit)
        );
    }

    #[test]
    fn test_left_click() {
        let event = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(translate(event), Some(TuiEvent::MouseClick(4, 7)));
    }
}
