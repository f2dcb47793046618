//! # Thumbnail Component
//!
//! One-row card describing the pending image, with a × button that clears it.
//!
//! A terminal cannot show the picture itself, so the card shows the file name,
//! mime type and encoded size. The close button area is remembered after each
//! render so mouse clicks can be hit-tested against it.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType};

use crate::core::state::PendingImage;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::icons::Icon;
use crate::tui::event::TuiEvent;
use crate::tui::markdown::ACCENT;

/// Emitted when the close button is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearRequested;

/// Persistent state: where the close button was drawn last frame.
#[derive(Debug, Default)]
pub struct ThumbnailState {
    pub close_button: Option<Rect>,
}

impl EventHandler for ThumbnailState {
    type Event = ClearRequested;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let TuiEvent::MouseClick(col, row) = event else {
            return None;
        };
        self.close_button
            .filter(|rect| rect.contains(Position::new(*col, *row)))
            .map(|_| ClearRequested)
    }
}

/// Pending image card, created fresh each frame.
pub struct Thumbnail<'a> {
    pub state: &'a mut ThumbnailState,
    pub uri: &'a str,
    pub image: Option<&'a PendingImage>,
}

impl Thumbnail<'_> {
    pub const HEIGHT: u16 = 3;
}

/// Last path segment of a uri, or the whole string.
fn file_name(uri: &str) -> &str {
    uri.rsplit(['/', '\\']).find(|s| !s.is_empty()).unwrap_or(uri)
}

/// Approximate decoded size of a base64 payload, formatted for humans.
fn approx_size(base64_len: usize) -> String {
    let bytes = base64_len / 4 * 3;
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{} KB", bytes / 1024)
    } else {
        format!("{bytes} B")
    }
}

impl Component for Thumbnail<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT))
            .title("Image");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [info_area, close_area] = Layout::horizontal([
            Constraint::Min(1),
            Constraint::Length(Icon::Close.button_width()),
        ])
        .areas(inner);

        let mut spans = vec![Span::styled(
            file_name(self.uri).to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let Some(image) = self.image {
            spans.push(Span::styled(
                format!(
                    "  {} · {}",
                    image.inline_data.mime_type,
                    approx_size(image.inline_data.data.len())
                ),
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Line::from(spans), info_area);

        frame.render_widget(
            Line::from(Span::styled(
                Icon::Close.button(),
                Style::default().fg(Color::White).bg(Color::Red),
            )),
            close_area,
        );
        self.state.close_button = Some(close_area);
    }
}
