//! Conversation history using ScyllaDB
//!
//! Rows are written with a TTL so expiry happens in the database; the
//! explicit purge is a no-op here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use travel_desk_core::{HistoryEntry, HistoryRole, HistoryStore};

use crate::{PersistenceError, ScyllaClient};

/// How far back `last_user_message` looks
const LAST_USER_SCAN: i32 = 50;

#[derive(Clone)]
pub struct ScyllaHistoryStore {
    client: ScyllaClient,
    ttl_secs: i32,
}

impl ScyllaHistoryStore {
    pub fn new(client: ScyllaClient, ttl_days: u32) -> Self {
        let ttl_secs = i32::try_from(u64::from(ttl_days) * 86_400).unwrap_or(i32::MAX);
        Self { client, ttl_secs }
    }

    async fn insert(
        &self,
        sender_id: &str,
        role: HistoryRole,
        content: &str,
    ) -> Result<(), PersistenceError> {
        let query = format!(
            "INSERT INTO {}.message_history (sender_id, created_at, id, role, content) VALUES (?, ?, ?, ?, ?) USING TTL ?",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    sender_id,
                    Utc::now().timestamp_millis(),
                    Uuid::new_v4(),
                    role.as_str(),
                    content,
                    self.ttl_secs,
                ),
            )
            .await?;

        Ok(())
    }

    /// Newest first
    async fn newest(&self, sender_id: &str, limit: i32) -> Result<Vec<HistoryEntry>, PersistenceError> {
        let query = format!(
            "SELECT created_at, role, content FROM {}.message_history WHERE sender_id = ? LIMIT ?",
            self.client.keyspace()
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (sender_id, limit))
            .await?;

        let mut entries = Vec::new();
        if let Some(rows) = result.rows {
            for row in rows {
                let (created_at, role, content): (i64, String, Option<String>) = row
                    .into_typed()
                    .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;

                let Some(role) = HistoryRole::parse(&role) else {
                    tracing::warn!(sender_id = %sender_id, role = %role, "Skipping history row with unknown role");
                    continue;
                };

                entries.push(HistoryEntry {
                    sender_id: sender_id.to_string(),
                    role,
                    content: content.unwrap_or_default(),
                    timestamp: DateTime::<Utc>::from_timestamp_millis(created_at)
                        .unwrap_or_default(),
                });
            }
        }

        Ok(entries)
    }
}

#[async_trait]
impl HistoryStore for ScyllaHistoryStore {
    async fn append(
        &self,
        sender_id: &str,
        role: HistoryRole,
        content: &str,
    ) -> travel_desk_core::Result<()> {
        Ok(self.insert(sender_id, role, content).await?)
    }

    async fn recent(
        &self,
        sender_id: &str,
        limit: usize,
    ) -> travel_desk_core::Result<Vec<HistoryEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let limit = i32::try_from(limit).unwrap_or(i32::MAX);
        let mut entries = self.newest(sender_id, limit).await?;
        entries.reverse();
        Ok(entries)
    }

    async fn last_user_message(&self, sender_id: &str) -> travel_desk_core::Result<Option<String>> {
        let entries = self.newest(sender_id, LAST_USER_SCAN).await?;
        Ok(entries
            .into_iter()
            .find(|e| e.role == HistoryRole::User)
            .map(|e| e.content))
    }

    async fn purge_older_than(&self, _cutoff: DateTime<Utc>) -> travel_desk_core::Result<u64> {
        Ok(0)
    }
}
