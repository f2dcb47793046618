//! # ResponseView Component
//!
//! Scrollable panel showing the current response text, rendered as markdown.
//!
//! ## Architecture
//!
//! `ResponseView` is a transient component (created each frame) that wraps
//! `&'a mut ResponseViewState` (persistent scroll state) and the response
//! text (props). While a request is in flight the panel shows a spinner
//! instead of the previous text.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::markdown::{self, ACCENT, MarkdownStyles};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Scroll state for the response panel.
/// Must be persisted in the parent TuiState.
#[derive(Default)]
pub struct ResponseViewState {
    pub scroll_state: ScrollViewState,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Height of the rendered response at the last frame
    pub content_height: u16,
}

impl ResponseViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump back to the top, used whenever a new response arrives.
    pub fn reset(&mut self) {
        self.scroll_state = ScrollViewState::default();
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

impl EventHandler for ResponseViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            _ => return None,
        }
        self.clamp_scroll();
        None
    }
}

/// Response panel, created fresh each frame.
pub struct ResponseView<'a> {
    pub state: &'a mut ResponseViewState,
    pub response: &'a str,
    pub in_progress: bool,
    pub spinner_frame: usize,
}

impl<'a> ResponseView<'a> {
    pub fn new(
        state: &'a mut ResponseViewState,
        response: &'a str,
        in_progress: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            response,
            in_progress,
            spinner_frame,
        }
    }

    fn render_spinner(&self, frame: &mut Frame, area: Rect) {
        let glyph = SPINNER[self.spinner_frame % SPINNER.len()];
        let line = Line::from(vec![
            Span::styled(glyph, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            Span::styled(" Thinking…", Style::default().fg(Color::DarkGray)),
        ]);
        let top = area.y + area.height / 2;
        let row = Rect::new(area.x, top.min(area.bottom().saturating_sub(1)), area.width, 1);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), row);
    }
}

impl<'a> Component for ResponseView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.in_progress {
            self.render_spinner(frame, inner);
            return;
        }

        // -1 for scrollbar safe area
        let content_width = inner.width.saturating_sub(1);
        let text = markdown::render(self.response, &MarkdownStyles::default());
        let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
        let height = paragraph.line_count(content_width).min(u16::MAX as usize) as u16;

        self.state.viewport_height = inner.height;
        self.state.content_height = height;
        self.state.clamp_scroll();

        let mut scroll_view = ScrollView::new(Size::new(content_width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content_width, height));
        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(state: &mut ResponseViewState, response: &str, in_progress: bool) -> String {
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal
            .draw(|f| ResponseView::new(state, response, in_progress, 0).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_renders_markdown_text() {
        let mut state = ResponseViewState::new();
        let text = draw(&mut state, "**Hello** there", false);
        assert!(text.contains("Hello"));
        assert!(text.contains("there"));
        assert!(!text.contains("**"));
    }

    #[test]
    fn test_spinner_replaces_text_while_busy() {
        let mut state = ResponseViewState::new();
        let text = draw(&mut state, "old answer", true);
        assert!(text.contains("Thinking"));
        assert!(!text.contains("old answer"));
    }

    #[test]
    fn test_scroll_is_clamped_to_content() {
        let mut state = ResponseViewState::new();
        let long: String = (1..=30).map(|i| format!("line {i}\n\n")).collect();
        draw(&mut state, &long, false);
        assert!(state.content_height > state.viewport_height);

        for _ in 0..200 {
            state.handle_event(&TuiEvent::ScrollDown);
        }
        let max_y = state.content_height - state.viewport_height;
        assert_eq!(state.scroll_state.offset().y, max_y);

        state.reset();
        assert_eq!(state.scroll_state.offset().y, 0);
    }

    #[test]
    fn test_short_text_does_not_scroll() {
        let mut state = ResponseViewState::new();
        draw(&mut state, "short", false);
        state.handle_event(&TuiEvent::ScrollDown);
        assert_eq!(state.scroll_state.offset().y, 0);
    }
}
