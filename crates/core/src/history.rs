//! Conversation history entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm_types::{Message, Role};

/// Who authored a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Assistant,
}

impl HistoryRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// One append-only history row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sender_id: String,
    pub role: HistoryRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(sender_id: impl Into<String>, role: HistoryRole, content: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Convert to an LLM chat message
    pub fn to_message(&self) -> Message {
        let role = match self.role {
            HistoryRole::User => Role::User,
            HistoryRole::Assistant => Role::Assistant,
        };
        Message {
            role,
            ..Message::user(self.content.clone())
        }
    }
}
