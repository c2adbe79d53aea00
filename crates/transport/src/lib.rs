//! Outbound messaging
//!
//! [`BridgeSender`] posts replies to the WhatsApp bridge sidecar, retrying
//! transient failures with exponential backoff.

pub mod bridge;

pub use bridge::{BridgeConfig, BridgeSender};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Bridge returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl TransportError {
    /// Network failures, timeouts, 5xx and 429 are worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Configuration(_) => false,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

impl From<TransportError> for travel_desk_core::Error {
    fn from(err: TransportError) -> Self {
        travel_desk_core::Error::Transport(err.to_string())
    }
}
