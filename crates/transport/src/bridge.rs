//! WhatsApp bridge client
//!
//! `POST {url}/send-message` with `{"number": ..., "message": ...}` and the
//! shared key in `X-API-Key`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use travel_desk_config::Settings;
use travel_desk_core::MessageSender;

use crate::TransportError;

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub max_attempts: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
}

impl From<&Settings> for BridgeConfig {
    fn from(settings: &Settings) -> Self {
        let bridge = &settings.bridge;
        Self {
            url: bridge.url.clone(),
            api_key: settings.bridge_api_key().map(str::to_string),
            timeout: Duration::from_secs(bridge.timeout_secs),
            max_attempts: bridge.max_attempts,
            min_backoff: Duration::from_secs(bridge.min_backoff_secs),
            max_backoff: Duration::from_secs(bridge.max_backoff_secs),
        }
    }
}

impl BridgeConfig {
    /// Wait before retry `attempt` (1-based): doubles from the minimum, capped at the maximum
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.min_backoff
            .saturating_mul(factor)
            .clamp(self.min_backoff, self.max_backoff.max(self.min_backoff))
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    number: &'a str,
    message: &'a str,
}

pub struct BridgeSender {
    config: BridgeConfig,
    client: Client,
}

impl BridgeSender {
    pub fn new(config: BridgeConfig) -> Result<Self, TransportError> {
        if config.url.is_empty() {
            return Err(TransportError::Configuration("bridge url is required".to_string()));
        }
        if config.max_attempts == 0 {
            return Err(TransportError::Configuration(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Configuration(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn send_url(&self) -> String {
        format!("{}/send-message", self.config.url.trim_end_matches('/'))
    }

    async fn post(&self, recipient: &str, text: &str) -> Result<(), TransportError> {
        let mut request = self.client.post(self.send_url()).json(&SendMessage {
            number: recipient,
            message: text,
        });
        if let Some(key) = &self.config.api_key {
            request = request.header("X-API-Key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Deliver one message, retrying transient failures
    pub async fn deliver(&self, recipient: &str, text: &str) -> Result<(), TransportError> {
        let mut attempt = 1;
        loop {
            match self.post(recipient, text).await {
                Ok(()) => {
                    metrics::counter!("bridge_messages_sent_total").increment(1);
                    tracing::debug!(recipient = %recipient, attempt, "Message delivered");
                    return Ok(());
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_attempts => {
                    let wait = self.config.backoff(attempt);
                    tracing::warn!(
                        recipient = %recipient,
                        error = %e,
                        "Bridge send failed, retrying in {:?} (attempt {}/{})",
                        wait,
                        attempt,
                        self.config.max_attempts
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => {
                    metrics::counter!("bridge_send_failures_total").increment(1);
                    tracing::error!(recipient = %recipient, attempt, error = %e, "Bridge send failed");
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl MessageSender for BridgeSender {
    async fn send(&self, recipient: &str, text: &str) -> travel_desk_core::Result<()> {
        Ok(self.deliver(recipient, text).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn config(url: String) -> BridgeConfig {
        BridgeConfig {
            url,
            api_key: Some("bridge-key".to_string()),
            timeout: Duration::from_secs(2),
            max_attempts: 3,
            min_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(40),
        }
    }

    /// Bridge that answers with `statuses` in order, then 200
    async fn spawn_bridge(
        statuses: Vec<StatusCode>,
        seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    ) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/send-message",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let hits = counter.clone();
                let statuses = statuses.clone();
                let seen = seen.clone();
                async move {
                    let n = hits.fetch_add(1, Ordering::SeqCst);
                    let key = headers
                        .get("x-api-key")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    seen.lock().unwrap().push((key, body));
                    statuses.get(n).copied().unwrap_or(StatusCode::OK)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), hits)
    }

    #[test]
    fn test_backoff_is_clamped() {
        let config = config(String::new());
        assert_eq!(config.backoff(1), Duration::from_millis(10));
        assert_eq!(config.backoff(2), Duration::from_millis(20));
        assert_eq!(config.backoff(3), Duration::from_millis(40));
        assert_eq!(config.backoff(10), Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_sends_payload_and_key() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (url, hits) = spawn_bridge(vec![], seen.clone()).await;
        let sender = BridgeSender::new(config(url)).unwrap();

        sender.send("963900000000@c.us", "أهلاً").await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].0.as_deref(), Some("bridge-key"));
        assert_eq!(seen[0].1["number"], "963900000000@c.us");
        assert_eq!(seen[0].1["message"], "أهلاً");
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (url, hits) = spawn_bridge(
            vec![StatusCode::SERVICE_UNAVAILABLE, StatusCode::TOO_MANY_REQUESTS],
            seen,
        )
        .await;
        let sender = BridgeSender::new(config(url)).unwrap();

        sender.deliver("s", "hi").await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (url, hits) = spawn_bridge(vec![StatusCode::BAD_GATEWAY; 5], seen).await;
        let sender = BridgeSender::new(config(url)).unwrap();

        let err = sender.deliver("s", "hi").await.unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 502, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (url, hits) = spawn_bridge(vec![StatusCode::BAD_REQUEST], seen).await;
        let sender = BridgeSender::new(config(url)).unwrap();

        assert!(sender.deliver("s", "hi").await.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let config = BridgeConfig {
            max_attempts: 0,
            ..config("http://localhost:3000".to_string())
        };
        assert!(matches!(
            BridgeSender::new(config),
            Err(TransportError::Configuration(_))
        ));
    }
}
