//! Session and history persistence
//!
//! Two backends implement the core store traits:
//! - ScyllaDB ([`ScyllaSessionStore`], [`ScyllaHistoryStore`])
//! - in-process maps ([`InMemorySessionStore`], [`InMemoryHistoryStore`])

pub mod client;
pub mod error;
pub mod history;
pub mod memory;
pub mod schema;
pub mod sessions;

pub use client::{ScyllaClient, ScyllaConfig};
pub use error::PersistenceError;
pub use history::ScyllaHistoryStore;
pub use memory::{InMemoryHistoryStore, InMemorySessionStore};
pub use sessions::ScyllaSessionStore;

use std::sync::Arc;

use travel_desk_config::{HistoryConfig, PersistenceConfig};
use travel_desk_core::{HistoryStore, SessionStore};

/// Connect to ScyllaDB and make sure the schema exists
pub async fn init(config: ScyllaConfig, ttl_days: u32) -> Result<PersistenceLayer, PersistenceError> {
    let client = ScyllaClient::connect(config).await?;
    client.ensure_schema().await?;

    Ok(PersistenceLayer {
        sessions: ScyllaSessionStore::new(client.clone()),
        history: ScyllaHistoryStore::new(client, ttl_days),
    })
}

/// ScyllaDB-backed stores
pub struct PersistenceLayer {
    pub sessions: ScyllaSessionStore,
    pub history: ScyllaHistoryStore,
}

/// Store handles as the dialogue engine consumes them
#[derive(Clone)]
pub struct Stores {
    pub sessions: Arc<dyn SessionStore>,
    pub history: Arc<dyn HistoryStore>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            sessions: Arc::new(InMemorySessionStore::new()),
            history: Arc::new(InMemoryHistoryStore::new()),
        }
    }
}

impl From<PersistenceLayer> for Stores {
    fn from(layer: PersistenceLayer) -> Self {
        Self {
            sessions: Arc::new(layer.sessions),
            history: Arc::new(layer.history),
        }
    }
}

/// Build the configured stores
pub async fn create_stores(
    config: &PersistenceConfig,
    history: &HistoryConfig,
) -> Result<Stores, PersistenceError> {
    if !config.enabled {
        tracing::info!("Persistence disabled, using in-memory stores");
        return Ok(Stores::in_memory());
    }

    let layer = init(ScyllaConfig::from(config), history.ttl_days).await?;
    Ok(layer.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_persistence_uses_memory() {
        let config = PersistenceConfig {
            enabled: false,
            ..Default::default()
        };
        let stores = create_stores(&config, &HistoryConfig::default()).await.unwrap();
        let session = stores.sessions.get("s").await.unwrap();
        assert!(!session.is_handoff());
    }
}
