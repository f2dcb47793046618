//! Cursor position tracking and horizontal scrolling for the SearchBox.
//!
//! `CursorState` owns the cursor byte offset and the horizontal scroll offset.
//! All methods accept `buffer: &str` explicitly; the text itself is owned by
//! `SearchBox`.

use unicode_width::UnicodeWidthStr;

pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// Display columns hidden to the left of the visible window
    pub scroll: usize,
}

impl CursorState {
    pub fn new() -> Self {
        Self { pos: 0, scroll: 0 }
    }

    /// Display column of the cursor from the start of the buffer.
    pub fn column(&self, buffer: &str) -> usize {
        buffer[..self.pos].width()
    }

    /// Cursor column relative to the left edge of the visible window.
    pub fn screen_offset(&self, buffer: &str) -> u16 {
        let offset = self.column(buffer).saturating_sub(self.scroll);
        u16::try_from(offset).unwrap_or(u16::MAX)
    }

    /// Keep the cursor inside a window `visible` columns wide.
    pub fn update_scroll(&mut self, buffer: &str, visible: u16) {
        let visible = usize::from(visible);
        if visible == 0 {
            self.scroll = 0;
            return;
        }
        let column = self.column(buffer);
        if column < self.scroll {
            self.scroll = column;
        } else if column >= self.scroll + visible {
            self.scroll = column + 1 - visible;
        }
    }

    pub fn move_left(&mut self, buffer: &str) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.pos = prev_char_boundary(buffer, self.pos);
        true
    }

    pub fn move_right(&mut self, buffer: &str) -> bool {
        if self.pos >= buffer.len() {
            return false;
        }
        self.pos = next_char_boundary(buffer, self.pos);
        true
    }
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

/// The slice of `text` that starts at display column `skip` and fits in `width` columns.
pub(super) fn visible_slice(text: &str, skip: usize, width: u16) -> &str {
    let width = usize::from(width);
    let mut start = text.len();
    let mut end = text.len();
    let mut column = 0;
    let mut started = false;
    for (i, c) in text.char_indices() {
        if !started && column >= skip {
            start = i;
            started = true;
        }
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if started && column + w > skip + width {
            end = i;
            break;
        }
        column += w;
    }
    if !started {
        return "";
    }
    &text[start..end]
}
