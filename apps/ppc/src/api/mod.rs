//! # PPC HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /components` - List the working set
//! - `POST /components` - Validate and insert a component
//! - `DELETE /components/{id}` - Remove a component
//! - `GET /summary` - Conformity dashboard
//! - `GET /validation` - Curriculum validation report
//! - `GET /reports/matrix` - Period matrix
//! - `GET /reports/nucleus` - Semester by nucleus summary
//! - `GET /export/csv` - SIGAA CSV sheet
//! - `GET /backup` - Download a backup
//! - `POST /backup/restore` - Replace the working set from a backup
//! - `GET /rules` - The regulatory rubric
//!
//! ## Security Configuration
//!
//! Both settings come from [`AppConfig`] (file or `PPC_*` environment):
//!
//! - `cors_origins`: comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `rate_limit`: requests per second (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

pub use middleware::{GlobalRateLimiter, create_rate_limiter};
// Re-export handlers and types for integration tests (via `ppc::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    backup_handler, create_component_handler, delete_component_handler, export_csv_handler,
    health_handler, list_components_handler, matrix_handler, nucleus_summary_handler,
    restore_handler, rules_handler, status_for, summary_handler, validation_handler,
};
#[allow(unused_imports)]
pub use types::{
    ComponentListResponse, CreateComponentResponse, ErrorResponse, HealthResponse,
    NucleusRuleJson, RemoveComponentResponse, RestoreResponse, RulesResponse, ValidationResponse,
};

use crate::config::{AppConfig, DEFAULT_RATE_LIMIT};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use ppc_core::{CurriculumStore, PpcError, formats::MAX_BACKUP_SIZE};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Router options resolved from configuration.
#[derive(Debug, Clone)]
pub struct ApiOptions {
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// `None` = localhost only, `"*"` = any origin, else a comma list.
    pub cors_origins: Option<String>,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: None,
        }
    }
}

impl From<&AppConfig> for ApiOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            rate_limit: config.rate_limit,
            cors_origins: config.cors_origins.clone(),
        }
    }
}

/// Shared server state containing the curriculum store.
#[derive(Clone)]
pub struct AppState {
    /// The working set.
    pub store: Arc<RwLock<CurriculumStore>>,
    /// File persisted after every mutation; `None` keeps the set in memory.
    pub data_file: Option<Arc<PathBuf>>,
    pub options: ApiOptions,
}

impl AppState {
    /// In-memory state with default options.
    #[must_use]
    pub fn new(store: CurriculumStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            data_file: None,
            options: ApiOptions::default(),
        }
    }

    /// State backed by the configured data file.
    #[must_use]
    pub fn with_config(store: CurriculumStore, config: &AppConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            data_file: Some(Arc::new(config.data_file.clone())),
            options: ApiOptions::from(config),
        }
    }

    /// Replace the router options.
    #[must_use]
    pub fn options(mut self, options: ApiOptions) -> Self {
        self.options = options;
        self
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

/// Build the CORS layer.
///
/// - `"*"`: allows all origins (development mode)
/// - `None`: localhost only
/// - otherwise: comma-separated list of allowed origins
pub fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins (cors_origins=*). This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) if !trimmed.is_empty() => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Ok(_) => None,
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins in cors_origins, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods(ALLOWED_METHODS)
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No cors_origins set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit - caps uploads at the backup size limit
/// 4. Rate Limiting - if enabled
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(state.options.cors_origins.as_deref());

    let rate_limit = state.options.rate_limit;
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/components",
            get(handlers::list_components_handler).post(handlers::create_component_handler),
        )
        .route("/components/{id}", delete(handlers::delete_component_handler))
        .route("/summary", get(handlers::summary_handler))
        .route("/validation", get(handlers::validation_handler))
        .route("/reports/matrix", get(handlers::matrix_handler))
        .route("/reports/nucleus", get(handlers::nucleus_summary_handler))
        .route("/export/csv", get(handlers::export_csv_handler))
        .route("/backup", get(handlers::backup_handler))
        .route("/backup/restore", post(handlers::restore_handler))
        .route("/rules", get(handlers::rules_handler));

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BACKUP_SIZE)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(config: &AppConfig, store: CurriculumStore) -> Result<(), PpcError> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::with_config(store, config);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PpcError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!(
        data_file = %config.data_file.display(),
        "PPC HTTP server listening on {}",
        addr
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PpcError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::warn!("Cannot listen for Ctrl+C: {}", e),
    }
}
