use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a region of the frame.
///
/// Data comes in as struct fields (props). `render` takes `&mut self` so a
/// component can record where its clickable parts landed for later hit tests.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal input.
pub trait EventHandler {
    /// What the component reports upward.
    type Event;

    /// Consume a `TuiEvent`, returning a higher-level event when one results.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
