//! LLM integration
//!
//! Features:
//! - OpenAI-compatible chat completions (OpenAI, vLLM, local servers)
//! - Native tool calling with `tool_choice = "auto"`
//! - Retries with exponential backoff on network errors, timeouts and 5xx

pub mod backend;

pub use backend::{OpenAIBackend, OpenAIConfig};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for travel_desk_core::Error {
    fn from(err: LlmError) -> Self {
        travel_desk_core::Error::Llm(err.to_string())
    }
}
