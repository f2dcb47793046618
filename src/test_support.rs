//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::payload::Payload;
use crate::device::{
    ImagePicker, ImageSource, PermissionError, PermissionGate, PermissionStatus, PickError,
    PickerOptions, PickerResponse,
};
use crate::inference::{GenerativeModel, ModelResponse, ProviderError};

/// A model that answers from a queue of canned outcomes and records payloads.
/// Once the queue is empty it answers with no text.
#[derive(Default)]
pub struct StubModel {
    replies: Mutex<VecDeque<Result<ModelResponse, ProviderError>>>,
    payloads: Mutex<Vec<Payload>>,
}

impl StubModel {
    pub fn replying(text: &str) -> Self {
        let model = Self::default();
        model.push(Ok(ModelResponse::from_text(text)));
        model
    }

    pub fn failing(error: ProviderError) -> Self {
        let model = Self::default();
        model.push(Err(error));
        model
    }

    pub fn push(&self, reply: Result<ModelResponse, ProviderError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn payloads(&self) -> Vec<Payload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for StubModel {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate_content(&self, payload: &Payload) -> Result<ModelResponse, ProviderError> {
        self.payloads.lock().unwrap().push(payload.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ModelResponse::default()))
    }
}

/// Permission gate with a fixed answer (errors are answered once, then Granted).
pub struct StubPermissions {
    answer: Mutex<Option<Result<PermissionStatus, PermissionError>>>,
}

impl StubPermissions {
    pub fn granted() -> Self {
        Self::answering(Ok(PermissionStatus::Granted))
    }

    pub fn answering(answer: Result<PermissionStatus, PermissionError>) -> Self {
        Self {
            answer: Mutex::new(Some(answer)),
        }
    }
}

#[async_trait]
impl PermissionGate for StubPermissions {
    async fn request_camera(&self) -> Result<PermissionStatus, PermissionError> {
        let mut answer = self.answer.lock().unwrap();
        match answer.take() {
            Some(Ok(status)) => {
                *answer = Some(Ok(status));
                Ok(status)
            }
            Some(Err(e)) => Err(e),
            None => Ok(PermissionStatus::Granted),
        }
    }
}

/// Picker that replays canned outcomes and records which source was launched.
#[derive(Default)]
pub struct StubPicker {
    outcomes: Mutex<VecDeque<Result<PickerResponse, PickError>>>,
    launches: Mutex<Vec<ImageSource>>,
}

impl StubPicker {
    pub fn returning(response: PickerResponse) -> Self {
        let picker = Self::default();
        picker.outcomes.lock().unwrap().push_back(Ok(response));
        picker
    }

    pub fn failing(error: PickError) -> Self {
        let picker = Self::default();
        picker.outcomes.lock().unwrap().push_back(Err(error));
        picker
    }

    pub fn launches(&self) -> Vec<ImageSource> {
        self.launches.lock().unwrap().clone()
    }

    fn next(&self, source: ImageSource) -> Result<PickerResponse, PickError> {
        self.launches.lock().unwrap().push(source);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(PickerResponse::default()))
    }
}

#[async_trait]
impl ImagePicker for StubPicker {
    async fn launch_camera(&self, _options: &PickerOptions) -> Result<PickerResponse, PickError> {
        self.next(ImageSource::Camera)
    }

    async fn launch_image_library(
        &self,
        _options: &PickerOptions,
    ) -> Result<PickerResponse, PickError> {
        self.next(ImageSource::Gallery)
    }
}

/// Creates a test App with stub services.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(
        Arc::new(StubModel::default()),
        Arc::new(StubPermissions::granted()),
        Arc::new(StubPicker::default()),
        "test-model".to_string(),
    )
}
