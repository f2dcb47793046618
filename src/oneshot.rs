//! # One-shot Mode
//!
//! `plif --prompt "..." [--image photo.jpg]` runs a single request through the
//! same controller as the TUI and returns the rendered response text instead of
//! drawing it.

use std::path::Path;

use log::info;

use crate::core::action::{Action, Effect, update};
use crate::core::state::App;
use crate::core::tasks::{picked_from_asset, run_request};
use crate::device::{PickerOptions, load_asset};

/// Outcome of a one-shot run: the final response text and whether it reports a failure.
#[derive(Debug, PartialEq, Eq)]
pub struct OneShotResult {
    pub response: String,
    pub failed: bool,
}

pub async fn run(app: &mut App, prompt: Option<String>, image: Option<&Path>) -> OneShotResult {
    if let Some(path) = image {
        info!("One-shot: attaching {}", path.display());
        let outcome = match load_asset(path, &PickerOptions::default()).await {
            Ok(asset) => picked_from_asset(asset).map(Some),
            Err(e) => Err(e),
        };
        let failed = outcome.is_err();
        update(app, Action::ImagePicked(outcome));
        if failed {
            return OneShotResult {
                response: app.view.response.clone(),
                failed: true,
            };
        }
    }

    let effect = update(app, Action::Submit(prompt.unwrap_or_default()));
    let Effect::SpawnRequest { prompt, payload } = effect else {
        return OneShotResult {
            response: "Nothing to send: give a prompt or an image".to_string(),
            failed: true,
        };
    };

    let action = run_request(app.model.as_ref(), prompt, payload).await;
    let failed = matches!(action, Action::ResponseReceived { outcome: Err(_), .. });
    update(app, action);

    OneShotResult {
        response: app.view.response.clone(),
        failed,
    }
}
