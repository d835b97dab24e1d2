//! PPIC Dashboard Library
//!
//! Inventory and PPIC analytics over a synthetic, in-memory dataset: sales,
//! inventory, demand forecasting, supplier and financial views served as JSON
//! plus a single-page dashboard.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod data;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod models;
pub mod openapi;
pub mod reports;
pub mod services;
pub mod tracing;

use axum::{extract::State, http::HeaderValue, response::Json, routing::get, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};
use utoipa::ToSchema;

use crate::data::Dataset;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    /// Generated once at startup and never mutated
    pub data: Arc<Dataset>,
}

impl AppState {
    pub fn new(config: config::AppConfig, data: Dataset) -> Self {
        Self {
            config,
            data: Arc::new(data),
        }
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-123"), async {
                ApiResponse::success("ok")
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[test]
    fn outside_a_request_there_is_no_request_id() {
        let response = ApiResponse::success(1);
        assert!(response.meta.expect("metadata expected").request_id.is_none());
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .route("/views", get(handlers::catalog::list_views))
        .route("/categories", get(handlers::catalog::list_categories))
        // Dashboard views
        .route("/dashboard", get(handlers::analytics::get_dashboard))
        .route("/sales", get(handlers::sales::get_sales))
        .route("/inventory", get(handlers::inventory::get_inventory))
        .route("/forecast", get(handlers::forecast::get_forecast))
        .route("/suppliers", get(handlers::suppliers::get_suppliers))
        .route("/finance", get(handlers::finance::get_finance))
}

/// Full application router: dashboard page, JSON API, Swagger UI and the
/// request-id, tracing, compression and CORS layers.
pub fn build_router(state: AppState) -> Router {
    let cors_layer = cors_layer(&state.config);

    Router::<AppState>::new()
        .route("/", get(handlers::frontend::index))
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([axum::http::Method::GET])
    } else if cfg.is_development() {
        ::tracing::info!("Using permissive CORS in development environment");
        CorsLayer::permissive()
    } else {
        // Same-origin only
        CorsLayer::new()
    }
}

async fn api_status(State(state): State<AppState>) -> ApiResult<Value> {
    let status_data = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "ppic-dashboard",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.config.environment,
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(State(state): State<AppState>) -> ApiResult<Value> {
    let dataset_status = match state.data.validate() {
        Ok(()) => "healthy",
        Err(err) => {
            ::tracing::error!(error = %err, "Dataset failed integrity check");
            "unhealthy"
        }
    };

    let health_data = json!({
        "status": dataset_status,
        "checks": {
            "dataset": dataset_status,
        },
        "rows": {
            "products": state.data.products().len(),
            "sales": state.data.sales().len(),
            "suppliers": state.data.suppliers().len(),
            "purchases": state.data.purchases().len(),
        },
        "timestamp": Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}
