//! # Application State
//!
//! Core business state for Plif. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── view: ViewState                         // everything the screen shows
//! │   ├── response: String                    // markdown or inline error
//! │   ├── pending_image: Option<PendingImage> // attached to the next send
//! │   ├── image_uri: Option<String>           // thumbnail label
//! │   └── in_progress: bool                   // one request at a time
//! ├── model: Arc<dyn GenerativeModel>         // model client
//! ├── permissions: Arc<dyn PermissionGate>    // camera permission
//! ├── picker: Arc<dyn ImagePicker>            // camera / gallery
//! ├── model_name: String                      // shown in the header
//! └── clear_image_after_send: bool            // opt-in, off by default
//! ```
//!
//! State changes only happen through `update(app, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::config::ResolvedConfig;
use crate::device::{ImagePicker, PermissionGate};
use crate::inference::GenerativeModel;

pub const DEFAULT_GREETING: &str = "Hello, I am Plif, AI model, Integrated with gemini (developed by google). \
    I am designed to provide information and assist users with a wide range of topics and tasks.";

/// Literal shown when the model answers with no text at all.
pub const NO_RESPONSE: &str = "No Response";

/// Base64 image bytes plus their mime type, in the shape the model API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub data: String,
    pub mime_type: String,
}

/// The image waiting to be attached to the next request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingImage {
    pub inline_data: InlineData,
}

impl PendingImage {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            inline_data: InlineData {
                data: data.into(),
                mime_type: mime_type.into(),
            },
        }
    }
}

/// Everything the screen renders, as a plain value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub response: String,
    pub pending_image: Option<PendingImage>,
    pub image_uri: Option<String>,
    pub in_progress: bool,
}

impl ViewState {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            response: greeting.into(),
            pending_image: None,
            image_uri: None,
            in_progress: false,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}

pub struct App {
    pub view: ViewState,
    pub model: Arc<dyn GenerativeModel>,
    pub permissions: Arc<dyn PermissionGate>,
    pub picker: Arc<dyn ImagePicker>,
    pub model_name: String,
    /// Drop the pending image once a response arrives. Off by default: the
    /// image otherwise rides along with every following prompt until cleared.
    pub clear_image_after_send: bool,
}

impl App {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        permissions: Arc<dyn PermissionGate>,
        picker: Arc<dyn ImagePicker>,
        model_name: String,
    ) -> Self {
        Self {
            view: ViewState::default(),
            model,
            permissions,
            picker,
            model_name,
            clear_image_after_send: false,
        }
    }

    pub fn from_config(
        model: Arc<dyn GenerativeModel>,
        permissions: Arc<dyn PermissionGate>,
        picker: Arc<dyn ImagePicker>,
        config: &ResolvedConfig,
    ) -> Self {
        let mut app = Self::new(model, permissions, picker, config.model_name.clone());
        app.view = ViewState::new(config.greeting.clone());
        app.clear_image_after_send = config.clear_image_after_send;
        app
    }
}
