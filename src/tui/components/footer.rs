//! Key hint line shown under the search box.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

const HINTS: [(&str, &str); 6] = [
    ("Enter", "send"),
    ("Ctrl+T", "camera"),
    ("Ctrl+G", "gallery"),
    ("Ctrl+X", "clear image"),
    ("↑↓", "scroll"),
    ("Esc", "quit"),
];

pub struct Footer;

impl Component for Footer {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let key_style = Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD);
        let label_style = Style::default().fg(Color::DarkGray);
        let mut spans = Vec::with_capacity(HINTS.len() * 3);
        for (i, (key, label)) in HINTS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", label_style));
            }
            spans.push(Span::styled(*key, key_style));
            spans.push(Span::styled(format!(" {label}"), label_style));
        }
        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_footer_lists_shortcuts() {
        let mut terminal = Terminal::new(TestBackend::new(120, 1)).unwrap();
        terminal.draw(|f| Footer.render(f, f.area())).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Ctrl+T camera"));
        assert!(text.contains("Ctrl+G gallery"));
        assert!(text.contains("Esc quit"));
    }
}
