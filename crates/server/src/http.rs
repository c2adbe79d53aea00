//! HTTP Endpoints
//!
//! The webhook acknowledges immediately and runs the turn on its own task.

use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use travel_desk_core::SessionRecord;

use crate::auth::{require_admin_key, require_internal_key};
use crate::metrics::{metrics_handler, track_requests};
use crate::{AppState, ServerError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.config.server.cors_origins,
        state.config.server.cors_enabled,
    );

    let internal = Router::new()
        .route("/webhook", post(webhook))
        .route("/internal/pause", post(pause))
        .route("/internal/resume", post(resume))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_internal_key,
        ));

    let admin = Router::new()
        .route("/admin/states", get(admin_states))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_key,
        ));

    Router::new()
        .merge(internal)
        .merge(admin)
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty or all invalid, allows localhost:3000 only
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin = %origin, "Invalid CORS origin");
                None
            })
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if parsed_origins.is_empty() {
        tracing::info!("No usable CORS origins configured, defaulting to {}", DEFAULT_CORS_ORIGIN);
        return layer.allow_origin(HeaderValue::from_static(DEFAULT_CORS_ORIGIN));
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    layer.allow_origin(parsed_origins)
}

/// Inbound message from the messaging bridge
#[derive(Debug, Deserialize)]
struct WebhookRequest {
    #[serde(default)]
    from_number: String,
    #[serde(default)]
    body: String,
}

async fn webhook(
    State(state): State<AppState>,
    Json(request): Json<WebhookRequest>,
) -> Result<Json<Value>, ServerError> {
    let sender = request.from_number.trim().to_string();
    if sender.is_empty() || request.body.trim().is_empty() {
        return Err(ServerError::InvalidRequest(
            "from_number and body are required".to_string(),
        ));
    }

    let engine = state.engine.clone();
    let body = request.body;
    tokio::spawn(async move {
        engine.handle_incoming_message(&sender, &body).await;
    });

    Ok(Json(json!({ "status": "ok" })))
}

#[derive(Debug, Deserialize)]
struct ControlRequest {
    #[serde(default)]
    user_number: String,
}

impl ControlRequest {
    fn user_number(&self) -> Result<&str, ServerError> {
        let number = self.user_number.trim();
        if number.is_empty() {
            return Err(ServerError::InvalidRequest("user_number is required".to_string()));
        }
        Ok(number)
    }
}

async fn pause(
    State(state): State<AppState>,
    Json(request): Json<ControlRequest>,
) -> Result<Json<Value>, ServerError> {
    let number = request.user_number()?;
    state.engine.pause(number).await?;
    Ok(Json(json!({ "status": format!("Bot paused for {}", number) })))
}

async fn resume(
    State(state): State<AppState>,
    Json(request): Json<ControlRequest>,
) -> Result<Json<Value>, ServerError> {
    let number = request.user_number()?;
    state.engine.resume(number).await?;
    Ok(Json(json!({ "status": format!("Bot resumed for {}", number) })))
}

/// All stored sessions, newest first
async fn admin_states(
    State(state): State<AppState>,
) -> Result<Json<Vec<SessionRecord>>, ServerError> {
    let records = state.engine.sessions().list().await?;
    Ok(Json(records))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
