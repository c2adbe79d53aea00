//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use travel_desk_agent::DialogueEngine;
use travel_desk_config::Settings;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub engine: Arc<DialogueEngine>,
    /// Present when the Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: Settings, engine: Arc<DialogueEngine>) -> Self {
        Self {
            config: Arc::new(config),
            engine,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn internal_api_key(&self) -> Option<&str> {
        self.config.server.auth.internal_api_key.as_deref()
    }

    pub fn admin_api_key(&self) -> Option<&str> {
        self.config.server.auth.admin_api_key.as_deref()
    }
}
