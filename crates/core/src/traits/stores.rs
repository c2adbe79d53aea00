//! Session and history store traits

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::history::{HistoryEntry, HistoryRole};
use crate::session::{Session, SessionRecord};
use crate::Result;

/// Per-sender session storage
///
/// A single call is read-then-write safe; nothing serializes separate calls
/// for the same sender.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the session, creating an `Active` one with empty context on first contact
    async fn get(&self, sender_id: &str) -> Result<Session>;

    /// Replace the stored session
    async fn update(&self, session: &Session) -> Result<()>;

    /// All sessions, most recently updated first
    async fn list(&self) -> Result<Vec<SessionRecord>>;
}

/// Append-only conversation history
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, sender_id: &str, role: HistoryRole, content: &str) -> Result<()>;

    /// Up to `limit` most recent entries, ordered oldest to newest
    async fn recent(&self, sender_id: &str, limit: usize) -> Result<Vec<HistoryEntry>>;

    /// Content of the sender's most recent user message
    async fn last_user_message(&self, sender_id: &str) -> Result<Option<String>>;

    /// Delete entries older than `cutoff`, returning how many were removed
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64>;
}
