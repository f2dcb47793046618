//! # TitleBar Component
//!
//! Two-line header: the app title with its "Powered by" tagline on the left,
//! the active model name on the right.
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::markdown::ACCENT;

pub const APP_TITLE: &str = "MyAI";
pub const TAGLINE: &str = "Powered by Google Gemini";

/// Header bar.
///
/// # Props
///
/// - `model_name`: The Gemini model requests go to
/// - `in_progress`: Whether a request is in flight
pub struct TitleBar {
    pub model_name: String,
    pub in_progress: bool,
}

impl TitleBar {
    pub const HEIGHT: u16 = 2;

    pub fn new(model_name: String, in_progress: bool) -> Self {
        Self {
            model_name,
            in_progress,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [left, right] =
            Layout::horizontal([Constraint::Min(1), Constraint::Min(1)]).areas(area);

        let title = Paragraph::new(vec![
            Line::from(Span::styled(
                APP_TITLE,
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                TAGLINE,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )),
        ]);
        frame.render_widget(title, left);

        let status = if self.in_progress { "busy" } else { "ready" };
        let model = Paragraph::new(vec![
            Line::from(format!("model: {}", self.model_name)),
            Line::from(Span::styled(status, Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Right);
        frame.render_widget(model, right);
    }
}
