//! # SearchBox Component
//!
//! Single-line prompt field with three action buttons: send, camera, gallery.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, backspace, delete, cursor movement)
//! - Emit the three user intents: submit text, request camera, request gallery
//! - Disable those intents while a request is in flight
//!
//! ## State Management
//!
//! The buffer is internal state. `in_progress` is a prop from the application
//! state. Submitting does not clear the buffer, so a prompt can be re-sent or
//! tweaked after the answer arrives.

mod cursor;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::device::ImageSource;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::icons::Icon;
use crate::tui::event::TuiEvent;
use crate::tui::markdown::ACCENT;

use cursor::{CursorState, next_char_boundary, prev_char_boundary, visible_slice};

const PLACEHOLDER: &str = "Ask me anything…";

/// High-level events emitted by the SearchBox
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// User submitted the text (Enter or the send button)
    Submit(String),
    /// User asked for an image (Ctrl+T / Ctrl+G or a button)
    RequestImage(ImageSource),
    /// Text content or cursor changed
    ContentChanged,
}

/// Screen areas of the buttons from the last render, for mouse hit testing.
#[derive(Debug, Default, Clone, Copy)]
struct ButtonAreas {
    send: Rect,
    camera: Rect,
    gallery: Rect,
}

/// Prompt field with send / camera / gallery buttons.
///
/// # Props
///
/// - `in_progress`: a request is in flight (from App state)
///
/// # State
///
/// - `buffer`: Current text being typed
/// - `cursor`: Cursor position and horizontal scroll (see `CursorState`)
pub struct SearchBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Request in flight (Prop)
    pub in_progress: bool,
    cursor: CursorState,
    buttons: ButtonAreas,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            in_progress: false,
            cursor: CursorState::new(),
            buttons: ButtonAreas::default(),
        }
    }

    /// Height of the rendered box: one text line between two borders.
    pub const HEIGHT: u16 = 3;

    pub fn can_submit(&self) -> bool {
        !self.in_progress && !self.buffer.is_empty()
    }

    pub fn can_pick(&self) -> bool {
        !self.in_progress
    }

    fn submit(&self) -> Option<SearchEvent> {
        self.can_submit()
            .then(|| SearchEvent::Submit(self.buffer.clone()))
    }

    fn request_image(&self, source: ImageSource) -> Option<SearchEvent> {
        self.can_pick().then_some(SearchEvent::RequestImage(source))
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor.pos, text);
        self.cursor.pos += text.len();
    }

    fn button_span(icon: Icon, enabled: bool) -> Span<'static> {
        let style = if enabled {
            Style::default().fg(Color::White).bg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        };
        Span::styled(icon.button(), style)
    }
}

impl Component for SearchBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.in_progress {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(ACCENT)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title("Ask Plif");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let buttons_width =
            Icon::Arrow.button_width() + Icon::Camera.button_width() + Icon::Gallery.button_width() + 2;
        let [text_area, buttons_area] =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(buttons_width)])
                .areas(inner);

        // Text field (one column reserved for the cursor at end of line)
        let visible = text_area.width.saturating_sub(1);
        self.cursor.update_scroll(&self.buffer, visible);
        let field = if self.buffer.is_empty() {
            Paragraph::new(Span::styled(
                PLACEHOLDER,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ))
        } else {
            Paragraph::new(visible_slice(&self.buffer, self.cursor.scroll, visible).to_string())
        };
        frame.render_widget(field, text_area);

        // Buttons: [send] [camera] [gallery], separated by one column
        let [send, _, camera, _, gallery] = Layout::horizontal([
            Constraint::Length(Icon::Arrow.button_width()),
            Constraint::Length(1),
            Constraint::Length(Icon::Camera.button_width()),
            Constraint::Length(1),
            Constraint::Length(Icon::Gallery.button_width()),
        ])
        .areas(buttons_area);
        self.buttons = ButtonAreas {
            send,
            camera,
            gallery,
        };
        frame.render_widget(
            Line::from(Self::button_span(Icon::Arrow, self.can_submit())),
            send,
        );
        frame.render_widget(
            Line::from(Self::button_span(Icon::Camera, self.can_pick())),
            camera,
        );
        frame.render_widget(
            Line::from(Self::button_span(Icon::Gallery, self.can_pick())),
            gallery,
        );

        if !self.in_progress {
            let offset = self.cursor.screen_offset(&self.buffer);
            frame.set_cursor_position((text_area.x.saturating_add(offset), text_area.y));
        }
    }
}

impl EventHandler for SearchBox {
    type Event = SearchEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut utf8 = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut utf8));
                Some(SearchEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line field: newlines become spaces
                let flat: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .collect();
                self.insert_str(&flat);
                Some(SearchEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor.pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(prev..self.cursor.pos);
                    self.cursor.pos = prev;
                    Some(SearchEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor.pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(self.cursor.pos..next);
                    Some(SearchEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => self
                .cursor
                .move_left(&self.buffer)
                .then_some(SearchEvent::ContentChanged),
            TuiEvent::CursorRight => self
                .cursor
                .move_right(&self.buffer)
                .then_some(SearchEvent::ContentChanged),
            TuiEvent::CursorHome => (self.cursor.pos != 0).then(|| {
                self.cursor.pos = 0;
                SearchEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor.pos != self.buffer.len()).then(|| {
                self.cursor.pos = self.buffer.len();
                SearchEvent::ContentChanged
            }),
            TuiEvent::Submit => self.submit(),
            TuiEvent::RequestCamera => self.request_image(ImageSource::Camera),
            TuiEvent::RequestGallery => self.request_image(ImageSource::Gallery),
            TuiEvent::MouseClick(col, row) => {
                let position = Position::new(*col, *row);
                if self.buttons.send.contains(position) {
                    self.submit()
                } else if self.buttons.camera.contains(position) {
                    self.request_image(ImageSource::Camera)
                } else if self.buttons.gallery.contains(position) {
                    self.request_image(ImageSource::Gallery)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn typed(text: &str) -> SearchBox {
        let mut search = SearchBox::new();
        for c in text.chars() {
            search.handle_event(&TuiEvent::InputChar(c));
        }
        search
    }

    fn rendered_text(search: &mut SearchBox, width: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, SearchBox::HEIGHT)).unwrap();
        terminal.draw(|f| search.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_search_box_new() {
        let search = SearchBox::new();
        assert!(search.buffer.is_empty());
        assert!(!search.in_progress);
    }

    #[test]
    fn test_handle_input() {
        let mut search = SearchBox::new();

        let res = search.handle_event(&TuiEvent::InputChar('a'));
        assert_eq!(res, Some(SearchEvent::ContentChanged));
        assert_eq!(search.buffer, "a");

        search.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(search.buffer, "ab");

        let res = search.handle_event(&TuiEvent::Backspace);
        assert_eq!(res, Some(SearchEvent::ContentChanged));
        assert_eq!(search.buffer, "a");
    }

    #[test]
    fn test_editing_in_the_middle() {
        let mut search = typed("helo");
        search.handle_event(&TuiEvent::CursorLeft);
        search.handle_event(&TuiEvent::InputChar('l'));
        assert_eq!(search.buffer, "hello");

        search.handle_event(&TuiEvent::CursorHome);
        search.handle_event(&TuiEvent::Delete);
        assert_eq!(search.buffer, "ello");

        search.handle_event(&TuiEvent::CursorEnd);
        search.handle_event(&TuiEvent::InputChar('!'));
        assert_eq!(search.buffer, "ello!");
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut search = SearchBox::new();
        search.handle_event(&TuiEvent::Paste("line one\nline two".to_string()));
        assert_eq!(search.buffer, "line one line two");
    }

    #[test]
    fn test_submit_keeps_text() {
        let mut search = typed("hello");
        let res = search.handle_event(&TuiEvent::Submit);
        assert_eq!(res, Some(SearchEvent::Submit("hello".to_string())));
        assert_eq!(search.buffer, "hello", "Buffer is kept after submit");
    }

    #[test]
    fn test_submit_disabled_when_empty_or_busy() {
        let mut search = SearchBox::new();
        assert_eq!(search.handle_event(&TuiEvent::Submit), None);

        let mut search = typed("   ");
        assert_eq!(
            search.handle_event(&TuiEvent::Submit),
            Some(SearchEvent::Submit("   ".to_string()))
        );

        let mut search = typed("hello");
        search.in_progress = true;
        assert_eq!(search.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_image_requests() {
        let mut search = SearchBox::new();
        assert_eq!(
            search.handle_event(&TuiEvent::RequestCamera),
            Some(SearchEvent::RequestImage(ImageSource::Camera))
        );
        assert_eq!(
            search.handle_event(&TuiEvent::RequestGallery),
            Some(SearchEvent::RequestImage(ImageSource::Gallery))
        );

        search.in_progress = true;
        assert_eq!(search.handle_event(&TuiEvent::RequestCamera), None);
        assert_eq!(search.handle_event(&TuiEvent::RequestGallery), None);
    }

    #[test]
    fn test_button_clicks_after_render() {
        let mut search = typed("hi");
        rendered_text(&mut search, 40);

        let send = search.buttons.send;
        let camera = search.buttons.camera;
        let gallery = search.buttons.gallery;
        assert_eq!(
            search.handle_event(&TuiEvent::MouseClick(send.x, send.y)),
            Some(SearchEvent::Submit("hi".to_string()))
        );
        assert_eq!(
            search.handle_event(&TuiEvent::MouseClick(camera.x, camera.y)),
            Some(SearchEvent::RequestImage(ImageSource::Camera))
        );
        assert_eq!(
            search.handle_event(&TuiEvent::MouseClick(gallery.x, gallery.y)),
            Some(SearchEvent::RequestImage(ImageSource::Gallery))
        );
        assert_eq!(search.handle_event(&TuiEvent::MouseClick(0, 0)), None);
    }

    #[test]
    fn test_render_shows_placeholder_and_buttons() {
        let mut search = SearchBox::new();
        let text = rendered_text(&mut search, 50);
        assert!(text.contains("Ask Plif"));
        assert!(text.contains("Ask me anything"));
        assert!(text.contains(Icon::Arrow.glyph()));
    }

    #[test]
    fn test_render_scrolls_long_input() {
        let mut search = typed("the quick brown fox jumps over the lazy dog and keeps running");
        let text = rendered_text(&mut search, 40);
        assert!(text.contains("running"));
        assert!(!text.contains("the quick"));
    }

    #[test]
    fn test_render_after_huge_paste() {
        let mut search = SearchBox::new();
        let mut pasted = "a".repeat(69_999);
        pasted.push('z');
        search.handle_event(&TuiEvent::Paste(pasted));
        assert_eq!(search.buffer.len(), 70_000);

        let mut terminal = Terminal::new(TestBackend::new(40, SearchBox::HEIGHT)).unwrap();
        terminal.draw(|f| search.render(f, f.area())).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("aaaz"));

        // Cursor sits just after the last visible character
        let cursor = terminal.get_cursor_position().unwrap();
        let z = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .position(|c| c.symbol() == "z")
            .unwrap() as u16;
        assert_eq!(cursor, Position::new(z % 40 + 1, 1));

        search.handle_event(&TuiEvent::InputChar('!'));
        assert!(rendered_text(&mut search, 40).contains("az!"));
    }
}
