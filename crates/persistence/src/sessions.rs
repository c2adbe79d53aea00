//! Session persistence using ScyllaDB

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use travel_desk_core::{Context, Session, SessionRecord, SessionState, SessionStore};

use crate::{PersistenceError, ScyllaClient};

#[derive(Clone)]
pub struct ScyllaSessionStore {
    client: ScyllaClient,
}

impl ScyllaSessionStore {
    pub fn new(client: ScyllaClient) -> Self {
        Self { client }
    }

    async fn load(&self, sender_id: &str) -> Result<Option<Session>, PersistenceError> {
        let query = format!(
            "SELECT state, context_json FROM {}.sessions WHERE sender_id = ?",
            self.client.keyspace()
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (sender_id,))
            .await?;

        let Some(row) = result.rows.and_then(|rows| rows.into_iter().next()) else {
            return Ok(None);
        };

        let (state, context_json): (Option<String>, Option<String>) = row
            .into_typed()
            .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;

        Ok(Some(Session {
            sender_id: sender_id.to_string(),
            state: decode_state(sender_id, state.as_deref()),
            context: decode_context(sender_id, context_json.as_deref()),
        }))
    }

    async fn store(&self, session: &Session) -> Result<(), PersistenceError> {
        let query = format!(
            "INSERT INTO {}.sessions (sender_id, state, context_json, updated_at) VALUES (?, ?, ?, ?)",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    &session.sender_id,
                    session.state.as_str(),
                    session.context_json()?,
                    Utc::now().timestamp_millis(),
                ),
            )
            .await?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<SessionRecord>, PersistenceError> {
        let query = format!(
            "SELECT sender_id, state, context_json, updated_at FROM {}.sessions",
            self.client.keyspace()
        );

        let result = self.client.session().query_unpaged(query, &[]).await?;

        let mut records = Vec::new();
        if let Some(rows) = result.rows {
            for row in rows {
                let (sender_id, state, context_json, updated_at): (
                    String,
                    Option<String>,
                    Option<String>,
                    Option<i64>,
                ) = row
                    .into_typed()
                    .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;

                records.push(SessionRecord {
                    state: decode_state(&sender_id, state.as_deref()),
                    context: decode_context(&sender_id, context_json.as_deref()),
                    updated_at: updated_at
                        .and_then(DateTime::<Utc>::from_timestamp_millis)
                        .unwrap_or_default(),
                    sender_id,
                });
            }
        }

        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }
}

/// Unknown states fall back to `Active` so a bad row cannot lock a sender out
pub(crate) fn decode_state(sender_id: &str, raw: Option<&str>) -> SessionState {
    match raw {
        None => SessionState::Active,
        Some(raw) => SessionState::parse(raw).unwrap_or_else(|| {
            tracing::warn!(sender_id = %sender_id, state = %raw, "Unknown session state, using active");
            SessionState::Active
        }),
    }
}

/// Corrupt context is dropped rather than failing every later turn
pub(crate) fn decode_context(sender_id: &str, raw: Option<&str>) -> Context {
    match raw.filter(|s| !s.trim().is_empty()) {
        None => Context::default(),
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::warn!(sender_id = %sender_id, error = %e, "Discarding unreadable session context");
            Context::default()
        }),
    }
}

#[async_trait]
impl SessionStore for ScyllaSessionStore {
    async fn get(&self, sender_id: &str) -> travel_desk_core::Result<Session> {
        if let Some(session) = self.load(sender_id).await? {
            return Ok(session);
        }

        let session = Session::new(sender_id);
        self.store(&session).await?;
        tracing::debug!(sender_id = %sender_id, "Created session");
        Ok(session)
    }

    async fn update(&self, session: &Session) -> travel_desk_core::Result<()> {
        Ok(self.store(session).await?)
    }

    async fn list(&self) -> travel_desk_core::Result<Vec<SessionRecord>> {
        Ok(self.list_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel_desk_core::Lang;

    #[test]
    fn test_decode_state() {
        assert_eq!(decode_state("s", Some("human_handoff")), SessionState::HumanHandoff);
        assert_eq!(decode_state("s", Some("human")), SessionState::HumanHandoff);
        assert_eq!(decode_state("s", Some("paused")), SessionState::Active);
        assert_eq!(decode_state("s", None), SessionState::Active);
    }

    #[test]
    fn test_decode_context() {
        assert_eq!(decode_context("s", Some(r#"{"lang":"en"}"#)).lang, Lang::En);
        assert_eq!(decode_context("s", Some("{}")), Context::default());
        assert_eq!(decode_context("s", Some("not json")), Context::default());
        assert_eq!(decode_context("s", Some("  ")), Context::default());
    }
}
