//! Optional per-sender turn serialization
//!
//! Disabled by default: concurrent turns for one sender then race on the
//! session and the last write wins.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct SenderLocks {
    enabled: bool,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SenderLocks {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            locks: DashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Wait for the sender's lock; `None` when serialization is off
    pub async fn acquire(&self, sender_id: &str) -> Option<OwnedMutexGuard<()>> {
        if !self.enabled {
            return None;
        }
        let lock = self
            .locks
            .entry(sender_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        Some(lock.lock_owned().await)
    }

    /// Drop locks nobody holds or waits on
    pub fn prune_idle(&self) -> usize {
        let before = self.locks.len();
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - self.locks.len()
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_disabled_never_blocks() {
        let locks = SenderLocks::new(false);
        let first = locks.acquire("a").await;
        let second = locks.acquire("a").await;
        assert!(first.is_none() && second.is_none());
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_same_sender_is_serialized() {
        let locks = Arc::new(SenderLocks::new(true));
        let guard = locks.acquire("a").await;

        let other = locks.clone();
        let waiter = tokio::spawn(async move {
            let _guard = other.acquire("a").await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        // A different sender is not blocked
        assert!(tokio::time::timeout(Duration::from_millis(50), locks.acquire("b"))
            .await
            .is_ok());

        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_prune_idle() {
        let locks = SenderLocks::new(true);
        let held = locks.acquire("a").await;
        drop(locks.acquire("b").await);

        assert_eq!(locks.prune_idle(), 1);
        assert_eq!(locks.len(), 1);
        drop(held);
        assert_eq!(locks.prune_idle(), 1);
    }
}
