//! Text generator trait definition.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Options for a generation request.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_output_tokens: Option<u32>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            max_output_tokens: Some(1024),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Errors that can occur when interacting with a generative text service.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,

    #[error("Empty response")]
    Empty,
}

/// Trait for generative text backends.
///
/// A single prompt goes in, raw text comes out. Interpreting the text is the
/// caller's business.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Get the provider's name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Get the model being used.
    fn model(&self) -> &str;

    /// Generate text for a prompt.
    async fn generate(&self, prompt: &str, options: &GenerationOptions)
        -> Result<String, LlmError>;
}
