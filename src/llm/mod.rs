//! Generative text abstraction layer.
//!
//! Prompt in, raw text out. Gemini is the only production backend.

mod gemini;
mod provider;

pub use gemini::{GeminiProvider, DEFAULT_GEMINI_MODEL, GEMINI_API_BASE};
pub use provider::{GenerationOptions, LlmError, TextGenerator};
