pub mod provider;
pub mod providers;

pub use provider::{GenerativeModel, ModelResponse, ProviderError};
pub use providers::GeminiProvider;
