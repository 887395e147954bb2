//! # Tempo HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /` - Greeting
//! - `GET /health` - Health check
//! - `GET /status` - Registry counters
//! - `POST /processes` - Create a process (full nested payload)
//! - `GET /processes` - List all processes
//! - `GET /processes/{id}` - Get one process
//! - `POST /processes/{id}/stages` - Add a stage
//! - `POST /processes/{id}/stages/{index}/start` - Start a stage timer
//! - `POST /processes/{id}/stages/{index}/stop` - Stop a stage timer
//!
//! ## Security Configuration
//!
//! CORS origins and the rate limit come from [`ServerConfig`]; see
//! [`crate::config`] for the environment variables that set them.

mod handlers;
mod middleware;
mod types;

pub use handlers::{
    ApiError, add_stage_handler, create_process_handler, get_process_handler, health_handler,
    list_processes_handler, root_handler, start_timer_handler, status_handler, stop_timer_handler,
};
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    AddStageRequest, AddStageResponse, CreateProcessRequest, CreateProcessResponse,
    ErrorResponse, HealthResponse, IterationJson, RootResponse, StageJson, StartTimerResponse,
    StatusResponse, StopTimerResponse,
};

use crate::config::ServerConfig;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use std::sync::Arc;
use crate::error::AppError;
use tempo_core::Registry;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the process registry.
///
/// Created once at server start and handed to every handler; the registry
/// lives exactly as long as the server.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RwLock<Registry>>,
}

impl AppState {
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origins.
///
/// - `None`: localhost only
/// - `["*"]`: every origin (warned)
/// - otherwise: the listed origins; invalid entries are skipped
fn build_cors_layer(origins: Option<&[String]>) -> CorsLayer {
    match origins {
        Some([only]) if only == "*" => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", origin);
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                restricted_cors(allowed_origins)
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
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
    .iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    restricted_cors(origins)
}

fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
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
/// 3. Body limit
/// 4. Rate Limiting - if enabled
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route(
            "/processes",
            post(handlers::create_process_handler).get(handlers::list_processes_handler),
        )
        .route("/processes/{process_id}", get(handlers::get_process_handler))
        .route(
            "/processes/{process_id}/stages",
            post(handlers::add_stage_handler),
        )
        .route(
            "/processes/{process_id}/stages/{stage_index}/start",
            post(handlers::start_timer_handler),
        )
        .route(
            "/processes/{process_id}/stages/{stage_index}/stop",
            post(handlers::stop_timer_handler),
        );

    if config.rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", config.rate_limit);
        router = router.layer(axum_middleware::from_fn_with_state(
            create_rate_limiter(config.rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(config.cors_origins.as_deref()))
                .layer(DefaultBodyLimit::max(config.body_limit_bytes)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and serve until Ctrl-C.
pub async fn run_server(config: &ServerConfig, registry: Registry) -> Result<(), AppError> {
    let router = create_router(AppState::new(registry), config);
    let addr = config.addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Tempo HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Io(format!("Server error: {}", e)))?;

    tracing::info!("Tempo HTTP server stopped; in-memory registry discarded");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
