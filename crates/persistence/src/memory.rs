//! In-process stores for development and tests
//!
//! State is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use travel_desk_core::{
    HistoryEntry, HistoryRole, HistoryStore, Result, Session, SessionRecord, SessionStore,
};

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(session: &Session) -> SessionRecord {
        SessionRecord {
            sender_id: session.sender_id.clone(),
            state: session.state,
            context: session.context.clone(),
            updated_at: Utc::now(),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, sender_id: &str) -> Result<Session> {
        if let Some(record) = self.sessions.read().get(sender_id) {
            return Ok(Session {
                sender_id: record.sender_id.clone(),
                state: record.state,
                context: record.context.clone(),
            });
        }

        let mut sessions = self.sessions.write();
        let record = sessions
            .entry(sender_id.to_string())
            .or_insert_with(|| Self::record(&Session::new(sender_id)));
        Ok(Session {
            sender_id: record.sender_id.clone(),
            state: record.state,
            context: record.context.clone(),
        })
    }

    async fn update(&self, session: &Session) -> Result<()> {
        self.sessions
            .write()
            .insert(session.sender_id.clone(), Self::record(session));
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SessionRecord>> {
        let mut records: Vec<SessionRecord> = self.sessions.read().values().cloned().collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }
}

#[derive(Default)]
pub struct InMemoryHistoryStore {
    entries: RwLock<HashMap<String, Vec<HistoryEntry>>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entries across all senders
    pub fn len(&self) -> usize {
        self.entries.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a pre-built entry, keeping its timestamp
    pub fn push(&self, entry: HistoryEntry) {
        self.entries
            .write()
            .entry(entry.sender_id.clone())
            .or_default()
            .push(entry);
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, sender_id: &str, role: HistoryRole, content: &str) -> Result<()> {
        self.push(HistoryEntry::new(sender_id, role, content));
        Ok(())
    }

    async fn recent(&self, sender_id: &str, limit: usize) -> Result<Vec<HistoryEntry>> {
        let entries = self.entries.read();
        let Some(all) = entries.get(sender_id) else {
            return Ok(Vec::new());
        };
        let start = all.len().saturating_sub(limit);
        Ok(all[start..].to_vec())
    }

    async fn last_user_message(&self, sender_id: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(sender_id).and_then(|all| {
            all.iter()
                .rev()
                .find(|e| e.role == HistoryRole::User)
                .map(|e| e.content.clone())
        }))
    }

    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut entries = self.entries.write();
        let mut removed = 0u64;
        for all in entries.values_mut() {
            let before = all.len();
            all.retain(|e| e.timestamp >= cutoff);
            removed += (before - all.len()) as u64;
        }
        entries.retain(|_, all| !all.is_empty());
        Ok(removed)
    }
}
