//! Request payload sent to the model client.
//!
//! Three shapes are possible, chosen from what the user has entered:
//!
//! ```text
//! text + image  →  Parts([Text, Image])
//! image only    →  Parts([Image])
//! text only     →  Text
//! ```

use crate::core::state::PendingImage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    Image(PendingImage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A bare prompt, not wrapped in a sequence.
    Text(String),
    /// An ordered sequence of parts.
    Parts(Vec<Part>),
}

impl Payload {
    /// Build the payload for a prompt and the currently pending image.
    ///
    /// An empty prompt counts as no prompt. Returns `None` when there is
    /// nothing to send.
    pub fn build(prompt: Option<&str>, image: Option<&PendingImage>) -> Option<Payload> {
        let prompt = prompt.filter(|p| !p.is_empty());
        match (prompt, image) {
            (Some(text), Some(image)) => Some(Payload::Parts(vec![
                Part::Text(text.to_string()),
                Part::Image(image.clone()),
            ])),
            (None, Some(image)) => Some(Payload::Parts(vec![Part::Image(image.clone())])),
            (Some(text), None) => Some(Payload::Text(text.to_string())),
            (None, None) => None,
        }
    }

    /// Flatten into parts, in order.
    pub fn parts(&self) -> Vec<Part> {
        match self {
            Payload::Text(text) => vec![Part::Text(text.clone())],
            Payload::Parts(parts) => parts.clone(),
        }
    }

    pub fn has_image(&self) -> bool {
        matches!(self, Payload::Parts(parts) if parts.iter().any(|p| matches!(p, Part::Image(_))))
    }
}
