//! Effect runners.
//!
//! Each runner performs the I/O behind one `Effect` through the service
//! traits and folds the outcome into the `Action` that reports it. They never
//! touch `App`, so the runtime can move them onto a background task.

use log::{debug, info, warn};

use crate::core::action::{Action, PickedImage};
use crate::core::payload::Payload;
use crate::core::state::PendingImage;
use crate::device::{
    Asset, ImagePicker, ImageSource, PermissionGate, PermissionStatus, PickError, PickerOptions,
};
use crate::inference::GenerativeModel;

/// Run one model request and report it as `Action::ResponseReceived`.
pub async fn run_request(
    model: &dyn GenerativeModel,
    prompt: Option<String>,
    payload: Payload,
) -> Action {
    info!("Model request via {}", model.name());
    let outcome = model
        .generate_content(&payload)
        .await
        .map(|response| response.text());
    if let Ok(text) = &outcome {
        debug!("Model response: {} bytes", text.len());
    }
    Action::ResponseReceived { prompt, outcome }
}

/// Ask for camera permission, launch the picker for `source` and report the
/// result as `Action::ImagePicked`.
pub async fn run_pick(
    permissions: &dyn PermissionGate,
    picker: &dyn ImagePicker,
    source: ImageSource,
) -> Action {
    match permissions.request_camera().await {
        Ok(PermissionStatus::Granted) => info!("Camera permission granted"),
        Ok(status) => info!("Camera permission not granted: {:?}", status),
        Err(e) => warn!("Camera permission request failed: {}", e),
    }

    let options = PickerOptions::default();
    let response = match source {
        ImageSource::Camera => picker.launch_camera(&options).await,
        ImageSource::Gallery => picker.launch_image_library(&options).await,
    };

    let outcome = response.and_then(|response| match response.assets.into_iter().next() {
        Some(asset) => picked_from_asset(asset).map(Some),
        None => Ok(None),
    });
    Action::ImagePicked(outcome)
}

/// Turn a picker asset into the image the controller stores.
pub fn picked_from_asset(asset: Asset) -> Result<PickedImage, PickError> {
    let data = asset.base64.ok_or(PickError::MissingData("base64"))?;
    let mime_type = asset.mime_type.ok_or(PickError::MissingData("mime type"))?;
    Ok(PickedImage {
        image: PendingImage::new(data, mime_type),
        uri: asset.uri,
    })
}
