//! HTTP server mode for REST API access to the warehouse

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{Error, Result};
use crate::warehouse::{
    AnalyticsFilter, ChargerFilter, TransactionFilter, UsageAnalytics, UserFilter, WarehouseEngine,
};

/// App state shared across handlers
///
/// The DuckDB connection is not Sync, so handlers serialize access through
/// the mutex.
struct AppState {
    engine: Mutex<WarehouseEngine>,
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Start the HTTP server over a loaded warehouse
pub async fn serve(engine: WarehouseEngine, port: u16) -> Result<()> {
    let state = AppState {
        engine: Mutex::new(engine),
    };

    // Allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/users", get(list_users))
        .route("/chargers", get(list_chargers))
        .route("/chargers/:charger_id/usage-analytics", get(usage_analytics))
        .route("/transactions/extended", get(list_transactions_extended))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<UserFilter>,
) -> impl IntoResponse {
    respond(state.query(|engine| engine.users(&filter)))
}

async fn list_chargers(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ChargerFilter>,
) -> impl IntoResponse {
    respond(state.query(|engine| engine.chargers(&filter)))
}

async fn list_transactions_extended(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TransactionFilter>,
) -> impl IntoResponse {
    respond(state.query(|engine| engine.transactions_extended(&filter)))
}

async fn usage_analytics(
    State(state): State<Arc<AppState>>,
    Path(charger_id): Path<String>,
    Query(filter): Query<AnalyticsFilter>,
) -> impl IntoResponse {
    let result: Result<UsageAnalytics> =
        state.query(|engine| engine.usage_analytics(&charger_id, &filter));
    respond(result)
}

impl AppState {
    fn query<T, F: FnOnce(&WarehouseEngine) -> Result<T>>(&self, f: F) -> Result<T> {
        let engine = self
            .engine
            .lock()
            .map_err(|_| Error::warehouse("Warehouse lock poisoned"))?;
        f(&engine)
    }
}

fn respond<T: Serialize>(result: Result<T>) -> axum::response::Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(e.to_string())),
        )
            .into_response(),
    }
}
