//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as fields:
//! - `TitleBar`: Header with app title, tagline and model name
//! - `Footer`: Key hints
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep local state and emit events:
//! - `SearchBox`: Prompt field with send, camera and gallery buttons
//! - `ResponseView`: Scrollable markdown response (state in `ResponseViewState`)
//! - `Thumbnail`: Pending image card with a clear button (state in `ThumbnailState`)
//!
//! Transient components (`ResponseView`, `Thumbnail`) are rebuilt every frame
//! around a `&mut` to their persistent state, which lives in `TuiState`.

pub mod footer;
pub mod icons;
pub mod response_view;
pub mod search_box;
pub mod thumbnail;
pub mod title_bar;

pub use footer::Footer;
pub use response_view::{ResponseView, ResponseViewState};
pub use search_box::{SearchBox, SearchEvent};
pub use thumbnail::{ClearRequested, Thumbnail, ThumbnailState};
pub use title_bar::TitleBar;
