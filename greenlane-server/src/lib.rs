//! GreenLane HTTP server
//!
//! Routes:
//! - `GET /health` - liveness and model readiness
//! - `GET /status` - model name, memory estimate and latency average
//! - `POST /analyze` - score a product listing
//! - `OPTIONS /analyze` - CORS preflight
//!
//! Every response carries permissive CORS headers.

pub mod error;

pub use error::ApiError;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use greenlane::analyzer::InferenceEngine;
use greenlane::backend;
use greenlane::config::{resolve_config_with, EffectiveConfig};
use greenlane::{AnalysisResponse, ProductInput};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Version reported by `/health`
pub const API_VERSION: &str = "1.0.0";

/// GreenLane local analysis server
#[derive(Parser, Debug)]
#[command(name = "greenlane-server")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Port to listen on (default: 8765)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Path to model file (default: mock mode)
    #[arg(long, short)]
    pub model: Option<PathBuf>,

    /// Interface to bind (default: 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// Path to config file (default: search .greenlanerc.json in current dir and parents)
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Resolve flags against the config file and the process environment
    pub fn resolve(self, work_dir: &Path) -> anyhow::Result<EffectiveConfig> {
        self.resolve_with(work_dir, |key| std::env::var(key).ok())
    }

    pub fn resolve_with<F>(self, work_dir: &Path, env: F) -> anyhow::Result<EffectiveConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        resolve_config_with(
            work_dir,
            self.config.as_deref(),
            self.port,
            self.host,
            self.model,
            env,
        )
    }
}

/// Build the engine for `config` and load its model, failing open.
///
/// A load failure is logged; whether the engine can still serve depends on
/// `fallback_to_mock`.
pub fn load_engine(config: &EffectiveConfig) -> InferenceEngine {
    let engine = InferenceEngine::new(backend::select(config.model.as_deref()))
        .with_fallback_to_mock(config.fallback_to_mock);
    if engine.load_model(&config.model_arg()).is_err() && !engine.is_loaded() {
        tracing::warn!("no model loaded; /analyze will fail until restart");
    }
    engine
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<InferenceEngine>,
}

impl AppState {
    pub fn new(engine: Arc<InferenceEngine>) -> Self {
        Self { engine }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub model: String,
    pub model_loaded: bool,
    pub memory_mb: u64,
    pub inference_time_avg_ms: f64,
    pub total_inferences: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_analysis_at: Option<String>,
}

/// `POST /analyze` body. Missing or null fields read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    #[serde(default)]
    product_title: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    materials: Option<String>,
}

impl AnalyzeRequest {
    fn into_product(self) -> ProductInput {
        ProductInput::new(self.product_title.unwrap_or_default())
            .with_brand(self.brand.unwrap_or_default())
            .with_price(self.price.unwrap_or_default())
            .with_materials(self.materials.unwrap_or_default())
    }
}

/// Build the application router with all middleware applied
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health).fallback(method_not_allowed))
        .route("/status", get(status).fallback(method_not_allowed))
        .route(
            "/analyze",
            post(analyze)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .fallback(not_found)
        .layer(DefaultBodyLimit::disable())
        .with_state(state);
    with_middleware(routes)
}

/// Panic recovery, CORS headers and request tracing.
///
/// CORS layers sit outside panic recovery so 500s from panics carry them too.
fn with_middleware(routes: Router) -> Router {
    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_loaded: state.engine.is_loaded(),
        version: API_VERSION.to_string(),
    })
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let stats = state.engine.stats();
    Json(StatusResponse {
        model: stats.model_name,
        model_loaded: stats.loaded,
        memory_mb: state.engine.memory_mb(),
        inference_time_avg_ms: stats.avg_latency_ms,
        total_inferences: stats.total_analyses,
        last_analysis_at: stats.last_analysis_at.map(|t| t.to_rfc3339()),
    })
}

async fn analyze(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let body = body.map_err(|e| ApiError::MalformedRequest(e.body_text()))?;
    let value: serde_json::Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::MalformedRequest(e.to_string()))?;
    if !value.is_object() {
        return Err(ApiError::MalformedRequest(
            "request body must be a JSON object".to_string(),
        ));
    }
    let request: AnalyzeRequest =
        serde_json::from_value(value).map_err(|e| ApiError::MalformedRequest(e.to_string()))?;

    let product = request.into_product();
    if product.title.is_empty() {
        return Err(ApiError::Validation("productTitle is required".to_string()));
    }

    let result = state.engine.analyze(&product)?;
    Ok(Json(AnalysisResponse::from(result)))
}

/// CORS preflight: empty 200, headers come from the middleware
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unexpected panic".to_string()
    };
    ApiError::Internal(detail).into_response()
}
