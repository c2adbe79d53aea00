//! Periodic maintenance: history retention and idle sender locks

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use travel_desk_agent::DialogueEngine;
use travel_desk_config::HistoryConfig;
use travel_desk_core::HistoryStore;

/// Drop history entries older than `ttl_days`
pub async fn purge_history(
    history: &dyn HistoryStore,
    ttl_days: u32,
) -> travel_desk_core::Result<u64> {
    let cutoff = Utc::now() - chrono::Duration::days(i64::from(ttl_days));
    history.purge_older_than(cutoff).await
}

/// Run maintenance every `cleanup_interval_hours`, starting immediately
pub fn spawn_housekeeping(engine: Arc<DialogueEngine>, config: HistoryConfig) -> JoinHandle<()> {
    let period = Duration::from_secs(config.cleanup_interval_hours * 3600);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match purge_history(engine.history().as_ref(), config.ttl_days).await {
                Ok(purged) => tracing::info!(purged, ttl_days = config.ttl_days, "History cleanup complete"),
                Err(e) => tracing::error!(error = %e, "History cleanup failed"),
            }

            let pruned = engine.prune_locks();
            if pruned > 0 {
                tracing::debug!(pruned, "Released idle sender locks");
            }
        }
    })
}
