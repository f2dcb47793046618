use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{Footer, ResponseView, SearchBox, Thumbnail, TitleBar};

/// Draw one frame: header, response, optional thumbnail, search box, key hints.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let view = &app.view;
    let thumbnail_height = if view.image_uri.is_some() {
        Thumbnail::HEIGHT
    } else {
        0
    };
    let [title_area, response_area, thumbnail_area, search_area, footer_area] =
        Layout::vertical([
            Length(TitleBar::HEIGHT),
            Min(3),
            Length(thumbnail_height),
            Length(SearchBox::HEIGHT),
            Length(1),
        ])
        .areas(frame.area());

    TitleBar::new(app.model_name.clone(), view.in_progress).render(frame, title_area);

    ResponseView::new(
        &mut tui.response_view,
        &view.response,
        view.in_progress,
        spinner_frame,
    )
    .render(frame, response_area);

    match &view.image_uri {
        Some(uri) => Thumbnail {
            state: &mut tui.thumbnail,
            uri,
            image: view.pending_image.as_ref(),
        }
        .render(frame, thumbnail_area),
        None => tui.thumbnail.close_button = None,
    }

    tui.search_box.in_progress = view.in_progress;
    tui.search_box.render(frame, search_area);

    Footer.render(frame, footer_area);
}
