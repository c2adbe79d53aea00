//! API key middleware
//!
//! Internal routes (webhook, pause, resume) check `X-API-Key`; the admin
//! listing checks `X-Admin-Api-Key`. A route family whose key is not
//! configured rejects every request.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::{AppState, ServerError};

pub const INTERNAL_KEY_HEADER: &str = "x-api-key";
pub const ADMIN_KEY_HEADER: &str = "x-admin-api-key";

static INTERNAL_KEY_WARNED: AtomicBool = AtomicBool::new(false);
static ADMIN_KEY_WARNED: AtomicBool = AtomicBool::new(false);

pub async fn require_internal_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    check_key(
        request.headers(),
        INTERNAL_KEY_HEADER,
        state.internal_api_key(),
        &INTERNAL_KEY_WARNED,
    )?;
    Ok(next.run(request).await)
}

pub async fn require_admin_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    check_key(
        request.headers(),
        ADMIN_KEY_HEADER,
        state.admin_api_key(),
        &ADMIN_KEY_WARNED,
    )?;
    Ok(next.run(request).await)
}

fn check_key(
    headers: &HeaderMap,
    header: &'static str,
    expected: Option<&str>,
    warned: &AtomicBool,
) -> Result<(), ServerError> {
    let Some(expected) = expected.filter(|k| !k.is_empty()) else {
        if !warned.swap(true, Ordering::Relaxed) {
            tracing::warn!(header, "No API key configured, rejecting all requests on these routes");
        }
        return Err(ServerError::Auth("API key not configured".to_string()));
    };

    let provided = headers
        .get(header)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ServerError::Auth(format!("missing {} header", header)))?;

    if constant_time_compare(provided.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        tracing::warn!(
            header,
            forwarded_for = ?headers.get("x-forwarded-for"),
            "Invalid API key"
        );
        Err(ServerError::Auth("invalid API key".to_string()))
    }
}

/// Constant-time comparison to prevent timing attacks
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
