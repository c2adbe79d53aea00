//! Dialogue engine for the travel desk assistant
//!
//! Features:
//! - Per-sender state machine (active / human handoff, pending selections)
//! - Numbered-list selection with the visa country/type cascade
//! - Tool dispatch driven by the language model
//! - Catalog search under Arabic normalization, plus model-assisted filtering
//! - Arabic rendering with optional English translation
//! - Human handoff with operator alerting

pub mod engine;
pub mod format;
pub mod locks;
pub mod prompts;
pub mod routine;
pub mod search;
pub mod texts;
pub mod translate;

pub use engine::{DialogueEngine, EngineConfig, EnginePorts};
pub use locks::SenderLocks;
pub use search::CatalogSearch;
pub use translate::{localize, LlmTranslator, TranslationError, Translator};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<travel_desk_core::Error> for AgentError {
    fn from(err: travel_desk_core::Error) -> Self {
        use travel_desk_core::Error;
        match err {
            Error::Llm(msg) => AgentError::Llm(msg),
            Error::Tool(msg) => AgentError::Tool(msg),
            Error::Persistence(msg) => AgentError::Store(msg),
            Error::Transport(msg) => AgentError::Delivery(msg),
            other => AgentError::Internal(other.to_string()),
        }
    }
}

impl From<travel_desk_tools::ToolError> for AgentError {
    fn from(err: travel_desk_tools::ToolError) -> Self {
        AgentError::Tool(err.to_string())
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::Internal(format!("Serialization failed: {}", err))
    }
}

/// How a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Group sender or nothing left after stripping emoji
    Ignored,
    /// Sender is with a human; message stored only
    Recorded,
    /// Numeric reply outside the pending list
    InvalidChoice,
    /// Numeric reply resolved against the pending list
    Choice,
    Routine,
    /// Free-text answer from the model
    Reply,
    Tool,
    /// Session could not be loaded or stored
    StoreFailed,
    /// Dispatch failed and the sender was handed to a human
    Failed,
}

impl TurnOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::Recorded => "recorded",
            Self::InvalidChoice => "invalid_choice",
            Self::Choice => "choice",
            Self::Routine => "routine",
            Self::Reply => "reply",
            Self::Tool => "tool",
            Self::StoreFailed => "store_failed",
            Self::Failed => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: AgentError = travel_desk_core::Error::Transport("bridge down".into()).into();
        assert!(matches!(err, AgentError::Delivery(_)));

        let err: AgentError = travel_desk_core::Error::Catalog("x".into()).into();
        assert_eq!(err.to_string(), "Internal error: Catalog error: x");
    }
}
