//! # Actions
//!
//! Everything that can happen in Plif becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Model responds? That's `Action::ResponseReceived { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! view state and returns an `Effect` describing the I/O the runtime should
//! start. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Transition table:
//!
//! ```text
//! Idle  ── Submit ───────────► Busy ── ResponseReceived ──► Idle
//! Idle  ── RequestImage ─────► Busy ── ImagePicked ───────► Idle
//! any   ── ClearImage ───────► same (image + uri unset)
//! Busy  ── Submit/RequestImage ► Busy (rejected)
//! ```

use log::{debug, info, warn};

use crate::core::payload::Payload;
use crate::core::state::{App, NO_RESPONSE, PendingImage};
use crate::device::{ImageSource, PickError};
use crate::inference::ProviderError;

/// A successfully picked image, ready to become the pending image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedImage {
    pub image: PendingImage,
    pub uri: String,
}

#[derive(Debug)]
pub enum Action {
    /// User submitted a prompt from the search box.
    Submit(String),
    /// The model call finished. `prompt` is echoed back for error messages.
    ResponseReceived {
        prompt: Option<String>,
        outcome: Result<String, ProviderError>,
    },
    /// User asked for an image from the camera or the gallery.
    RequestImage(ImageSource),
    /// The picker finished. `Ok(None)` means nothing was picked.
    ImagePicked(Result<Option<PickedImage>, PickError>),
    ClearImage,
    Quit,
}

/// Side effect requested by `update`, carried out by the runtime.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    Quit,
    SpawnRequest {
        prompt: Option<String>,
        payload: Payload,
    },
    SpawnPick(ImageSource),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            if app.view.in_progress {
                debug!("Submit ignored: a request is already in progress");
                return Effect::None;
            }
            let prompt = Some(text).filter(|t| !t.is_empty());
            let Some(payload) = Payload::build(prompt.as_deref(), app.view.pending_image.as_ref())
            else {
                debug!("Submit ignored: nothing to send");
                return Effect::None;
            };
            info!(
                "Submitting prompt (len={}, image={})",
                prompt.as_deref().map_or(0, str::len),
                payload.has_image()
            );
            app.view.in_progress = true;
            Effect::SpawnRequest { prompt, payload }
        }
        Action::ResponseReceived { prompt, outcome } => {
            match outcome {
                Ok(text) if !text.is_empty() => {
                    app.view.response = text;
                    if app.clear_image_after_send {
                        clear_image(app);
                    }
                }
                Ok(_) => {
                    app.view.response = NO_RESPONSE.to_string();
                    if app.clear_image_after_send {
                        clear_image(app);
                    }
                }
                Err(e) => {
                    warn!("Model request failed: {}", e);
                    app.view.response = format!(
                        "Error Response for prompt '{}' -: {}",
                        prompt.as_deref().unwrap_or_default(),
                        e
                    );
                }
            }
            app.view.in_progress = false;
            Effect::None
        }
        Action::RequestImage(source) => {
            if app.view.in_progress {
                debug!("Image request ignored: a request is already in progress");
                return Effect::None;
            }
            app.view.in_progress = true;
            Effect::SpawnPick(source)
        }
        Action::ImagePicked(outcome) => {
            match outcome {
                Ok(Some(picked)) => {
                    info!("Image attached: {}", picked.uri);
                    app.view.pending_image = Some(picked.image);
                    app.view.image_uri = Some(picked.uri);
                }
                Ok(None) => debug!("Picker returned no assets"),
                Err(e) => {
                    warn!("Image pick failed: {}", e);
                    app.view.response = format!("Error occurred: {}", e);
                }
            }
            app.view.in_progress = false;
            Effect::None
        }
        Action::ClearImage => {
            clear_image(app);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn clear_image(app: &mut App) {
    app.view.pending_image = None;
    app.view.image_uri = None;
}
