//! Static glyphs for the action buttons.
//!
//! Each icon is a short string with a known display width, so buttons can be
//! laid out without measuring at render time.

use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Arrow,
    Camera,
    Gallery,
    Close,
}

impl Icon {
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Arrow => "➤",
            Icon::Camera => "📷",
            Icon::Gallery => "🖼",
            Icon::Close => "×",
        }
    }

    /// Terminal columns the glyph occupies.
    pub fn width(self) -> u16 {
        self.glyph().width() as u16
    }

    /// Button face: the glyph with one column of padding each side.
    pub fn button(self) -> String {
        format!(" {} ", self.glyph())
    }

    pub fn button_width(self) -> u16 {
        self.width() + 2
    }
}
