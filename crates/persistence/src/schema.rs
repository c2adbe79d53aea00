//! ScyllaDB schema creation

use scylla::Session;

use crate::error::PersistenceError;

pub async fn create_keyspace(
    session: &Session,
    keyspace: &str,
    replication_factor: u8,
) -> Result<(), PersistenceError> {
    let query = format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
        keyspace, replication_factor
    );

    session
        .query_unpaged(query, &[])
        .await
        .map_err(|e| PersistenceError::SchemaError(format!("Failed to create keyspace: {}", e)))?;

    Ok(())
}

pub async fn create_tables(session: &Session, keyspace: &str) -> Result<(), PersistenceError> {
    // One row per sender, overwritten on every update
    let sessions_table = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.sessions (
            sender_id TEXT,
            state TEXT,
            context_json TEXT,
            updated_at BIGINT,
            PRIMARY KEY (sender_id)
        )
    "#,
        keyspace
    );

    session
        .query_unpaged(sessions_table, &[])
        .await
        .map_err(|e| {
            PersistenceError::SchemaError(format!("Failed to create sessions table: {}", e))
        })?;

    // Rows expire through the per-insert TTL
    let history_table = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.message_history (
            sender_id TEXT,
            created_at BIGINT,
            id UUID,
            role TEXT,
            content TEXT,
            PRIMARY KEY ((sender_id), created_at, id)
        ) WITH CLUSTERING ORDER BY (created_at DESC, id DESC)
    "#,
        keyspace
    );

    session
        .query_unpaged(history_table, &[])
        .await
        .map_err(|e| {
            PersistenceError::SchemaError(format!("Failed to create message_history table: {}", e))
        })?;

    tracing::info!(keyspace = %keyspace, "All tables created");
    Ok(())
}
