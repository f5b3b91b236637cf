//! Language model providers.
//!
//! The agent talks to a model only through [`TextProvider`], so tests can
//! swap Gemini for a scripted fake.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::{GeminiConfig, GeminiTextProvider};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Text-in, text-out model access.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Sends one prompt and returns the model's text reply.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
