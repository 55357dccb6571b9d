//! Dashboard HTTP server
//!
//! Serves the rendered dashboard, JSON views of the same data, health
//! checks and Prometheus metrics using Axum. Every request renders from
//! scratch; handlers share nothing but the read-only [`AppState`].

use crate::error::BoardError;
use crate::service::{AppState, HealthCheck, HealthStatus};
use crate::web::pages::{dashboard_page, error_page, PlayerLookup};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Dashboard server configuration
#[derive(Debug, Clone)]
pub struct DashboardServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host to bind to (typically "0.0.0.0" for all interfaces)
    pub host: String,
}

impl Default for DashboardServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
        }
    }
}

/// HTTP server for the dashboard
pub struct DashboardServer {
    config: DashboardServerConfig,
    state: Arc<AppState>,
    shutdown_tx: broadcast::Sender<()>,
}

impl DashboardServer {
    /// Create a new dashboard server
    pub fn new(config: DashboardServerConfig, state: Arc<AppState>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            state,
            shutdown_tx,
        }
    }

    /// Start serving until [`DashboardServer::stop`] is called
    pub async fn start(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .context("Invalid dashboard server address")?;

        let app = router(self.state.clone());
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("Dashboard listening on http://{}", addr);

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("Dashboard server shutdown signal received");
            })
            .await?;

        info!("Dashboard server stopped");
        Ok(())
    }

    /// Stop the server
    pub fn stop(&self) {
        info!("Stopping dashboard server...");

        if let Err(e) = self.shutdown_tx.send(()) {
            warn!("Failed to send shutdown signal to dashboard server: {}", e);
        }
    }
}

/// Create the Axum router with all endpoints
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/leaderboard", get(leaderboard_handler))
        .route("/api/trend", get(trend_handler))
        .route("/api/players", get(players_handler))
        .route("/api/players/{name}", get(player_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// HTTP status for a failed render
fn error_status(error: &BoardError) -> StatusCode {
    match error {
        BoardError::FileNotFound { .. } => StatusCode::SERVICE_UNAVAILABLE,
        BoardError::PlayerNotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn json_error(error: &BoardError) -> Response {
    (
        error_status(error),
        Json(json!({
            "error": error.kind(),
            "severity": error.severity(),
            "message": error.to_string(),
        })),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
struct IndexQuery {
    player: Option<String>,
}

/// Dashboard page handler
async fn index_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IndexQuery>,
) -> Response {
    debug!("Dashboard requested");

    let report = match state.render() {
        Ok(report) => report,
        Err(e) => {
            let page = error_page(&state.config().dashboard.title, &e);
            return (error_status(&e), Html(page.into_string())).into_response();
        }
    };

    let lookup = query
        .player
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(|name| PlayerLookup {
            name,
            result: report.player_series(name),
        });

    if let Some(PlayerLookup { result: Err(e), .. }) = &lookup {
        debug!("Inline lookup failed: {}", e);
        state.metrics().record_lookup_miss();
    }

    Html(dashboard_page(&report, lookup.as_ref()).into_string()).into_response()
}

/// Leaderboard JSON handler
async fn leaderboard_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.render() {
        Ok(report) => Json(json!({
            "title": report.title,
            "generated_at": report.generated_at,
            "games": report.games,
            "leaderboard": report.leaderboard,
            "notices": report.notices,
        }))
        .into_response(),
        Err(e) => json_error(&e),
    }
}

/// Trend JSON handler
async fn trend_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.render() {
        Ok(report) => Json(json!({
            "trend": report.trend,
            "notices": report.notices,
        }))
        .into_response(),
        Err(e) => json_error(&e),
    }
}

/// All player series JSON handler
async fn players_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.render() {
        Ok(report) => Json(report.players).into_response(),
        Err(e) => json_error(&e),
    }
}

/// Single player series JSON handler
async fn player_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let report = match state.render() {
        Ok(report) => report,
        Err(e) => return json_error(&e),
    };

    match report.player_series(&name) {
        Ok(series) => Json(json!({ "name": name, "series": series })).into_response(),
        Err(e) => {
            state.metrics().record_lookup_miss();
            json_error(&e)
        }
    }
}

/// Health check endpoint handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Health check requested");

    let health = HealthCheck::check(&state);
    let status = match health.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(health))
}

/// Readiness check endpoint handler
async fn ready_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Readiness check requested");

    match HealthCheck::readiness_check(&state) {
        HealthStatus::Healthy => (StatusCode::OK, "Ready"),
        HealthStatus::Degraded => (StatusCode::OK, "Degraded but ready"),
        HealthStatus::Unhealthy => (StatusCode::SERVICE_UNAVAILABLE, "Not ready"),
    }
}

/// Prometheus metrics endpoint handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    debug!("Metrics endpoint requested");

    let registry = state.metrics().registry();
    let metric_families = registry.gather();
    let encoder = TextEncoder::new();

    match encoder.encode_to_string(&metric_families) {
        Ok(metrics_output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            metrics_output,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics".to_string(),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(&BoardError::FileNotFound {
                path: "points.csv".into()
            }),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            error_status(&BoardError::MalformedScore {
                player: "A".to_string(),
                game: "G1".to_string(),
                value: "x".to_string(),
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            error_status(&BoardError::PlayerNotFound {
                name: "Z".to_string()
            }),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_default_server_config() {
        let config = DashboardServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
    }
}
