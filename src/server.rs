//! Webhook HTTP API
//!
//! POST-only alert intake. The body is read raw so non-ASCII bytes
//! reach the normalizer unmangled; the routing key arrives either as a
//! `?key=` query parameter or as a path segment.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::RelayError;
use crate::pipeline::Pipeline;
use crate::relay::RelayClient;

/// Shared, read-only per-process state
pub struct AppState {
    pub config: AppConfig,
    pub pipeline: Pipeline,
    pub relay: RelayClient,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// What a successful relay reports back to the alerting platform
#[derive(Debug, Serialize)]
pub struct RelaySummary {
    pub key: String,
    pub chars: usize,
}

/// Create the router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/hook", post(handle_hook_query))
        .route("/hook/:key", post(handle_hook_path))
        .route("/api/health", get(get_health))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct HookQuery {
    key: Option<String>,
}

/// POST /hook?key=<routing-key>
async fn handle_hook_query(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HookQuery>,
    body: Bytes,
) -> (StatusCode, Json<ApiResponse<RelaySummary>>) {
    match query.key {
        Some(key) => process_alert(state, &key, &body).await,
        None => reject(RelayError::MissingKey),
    }
}

/// POST /hook/:key
async fn handle_hook_path(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<ApiResponse<RelaySummary>>) {
    process_alert(state, &key, &body).await
}

/// GET /api/health - liveness probe
async fn get_health() -> impl IntoResponse {
    Json(ApiResponse::success("ok"))
}

async fn process_alert(
    state: Arc<AppState>,
    key: &str,
    body: &[u8],
) -> (StatusCode, Json<ApiResponse<RelaySummary>>) {
    let Some(route) = state.config.route_for(key) else {
        return reject(RelayError::UnknownRoute(key.to_string()));
    };

    tracing::info!(key = %key, bytes = body.len(), "alert received");

    let text = state.pipeline.process(body, route.beautify).await;
    if let Err(e) = state.relay.deliver(route, &text).await {
        tracing::error!(key = %key, error = %e, "relay failed");
        return reject(e);
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(RelaySummary {
            key: key.to_string(),
            chars: text.chars().count(),
        })),
    )
}

fn reject(err: RelayError) -> (StatusCode, Json<ApiResponse<RelaySummary>>) {
    (err.status_code(), Json(ApiResponse::error(err.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LookupConfig, RelayConfig, ServerConfig};
    use crate::resolver::NameResolver;
    use std::collections::HashMap;
    use std::time::Duration;

    fn empty_state() -> Arc<AppState> {
        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            lookup: LookupConfig { timeout_ms: 100 },
            relay: RelayConfig { timeout_ms: 100 },
            routes: HashMap::new(),
        };
        Arc::new(AppState {
            config,
            pipeline: Pipeline::new(NameResolver::with_providers(vec![])),
            relay: RelayClient::new(Duration::from_millis(100)).unwrap(),
        })
    }

    #[tokio::test]
    async fn test_missing_key_is_400() {
        let (status, Json(response)) = handle_hook_query(
            State(empty_state()),
            Query(HookQuery { key: None }),
            Bytes::from_static(b"text"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!response.success);
        assert!(response.error.unwrap().contains("missing routing key"));
    }

    #[tokio::test]
    async fn test_unknown_key_is_404() {
        let (status, Json(response)) = process_alert(empty_state(), "nope", b"text").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!response.success);
        assert!(response.error.unwrap().contains("nope"));
    }

    #[test]
    fn test_api_response_envelope() {
        let ok = ApiResponse::success(1);
        assert!(ok.success);
        assert_eq!(ok.data, Some(1));

        let err = ApiResponse::<i32>::error("boom");
        assert!(!err.success);
        assert_eq!(err.error.as_deref(), Some("boom"));
    }
}
