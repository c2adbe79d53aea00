//! Outbound messaging trait

use async_trait::async_trait;

use crate::Result;

/// Delivers text to a chat recipient
///
/// Retries happen inside the implementation; an `Err` means the delivery
/// boundary gave up.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, recipient: &str, text: &str) -> Result<()>;
}
