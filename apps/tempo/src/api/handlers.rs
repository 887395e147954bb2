//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Reads take the registry read lock. Every mutation takes the write lock
//! for the whole operation, so a timer's guard check and state write are
//! never interleaved with another request.
//!
//! Extractor rejections are taken as `Result`s and folded into [`ApiError`],
//! so a malformed body or path gets the same JSON error shape as a core
//! failure.

use super::{
    AppState,
    types::{
        AddStageRequest, AddStageResponse, CreateProcessRequest, CreateProcessResponse,
        ErrorResponse, HealthResponse, RootResponse, StartTimerResponse, StatusResponse,
        StopTimerResponse,
    },
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tempo_core::{ErrorKind, ProcessId, ProcessSnapshot, StageIndex, TempoError};

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// A failed request on its way to the client.
#[derive(Debug)]
pub enum ApiError {
    /// The core refused the operation.
    Core(TempoError),
    /// The request could not be decoded into its schema.
    Malformed(String),
}

impl From<TempoError> for ApiError {
    fn from(err: TempoError) -> Self {
        Self::Core(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl ApiError {
    /// HTTP status for the error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Core(err) => match err.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::InvalidTransition | ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            },
            Self::Malformed(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Core(err) => err.to_string(),
            Self::Malformed(detail) => format!("Malformed request: {}", detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        tracing::warn!(event = "request_rejected", status = status.as_u16(), error = %message);
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// =============================================================================
// ROOT / HEALTH HANDLERS
// =============================================================================

/// Greeting endpoint.
pub async fn root_handler() -> impl IntoResponse {
    Json(RootResponse::default())
}

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Get registry status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.registry.read().await;
    (StatusCode::OK, Json(StatusResponse::from(registry.stats())))
}

// =============================================================================
// PROCESS HANDLERS
// =============================================================================

/// Create a process from a full nested payload.
pub async fn create_process_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateProcessRequest>, JsonRejection>,
) -> Result<Json<CreateProcessResponse>, ApiError> {
    let Json(request) = body?;
    let draft = request.to_draft()?;
    let stage_count = draft.stage_count();

    let id = state.registry.write().await.create(draft)?;

    tracing::info!(
        event = "process_created",
        process_id = id.value(),
        iterations = request.iterations.len(),
        stages = stage_count,
    );
    Ok(Json(CreateProcessResponse::success(id)))
}

/// List every process in creation order.
pub async fn list_processes_handler(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.registry.read().await;
    Json(registry.snapshots())
}

/// Get one process.
pub async fn get_process_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<ProcessSnapshot>, ApiError> {
    let Path(process_id) = path?;
    let registry = state.registry.read().await;
    Ok(Json(registry.snapshot(ProcessId(process_id))?))
}

/// Append a stage to a process.
pub async fn add_stage_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    body: Result<Json<AddStageRequest>, JsonRejection>,
) -> Result<Json<AddStageResponse>, ApiError> {
    let Path(process_id) = path?;
    let Json(request) = body?;
    let draft = request.to_draft()?;
    let id = ProcessId(process_id);

    let stage_index = state
        .registry
        .write()
        .await
        .add_stage(id, draft, request.iteration)?;

    tracing::info!(
        event = "stage_added",
        process_id,
        stage_index,
        iteration = ?request.iteration,
    );
    Ok(Json(AddStageResponse::success(stage_index)))
}

// =============================================================================
// TIMER HANDLERS
// =============================================================================

/// Start a stage timer.
pub async fn start_timer_handler(
    State(state): State<AppState>,
    path: Result<Path<(u64, StageIndex)>, PathRejection>,
) -> Result<Json<StartTimerResponse>, ApiError> {
    let Path((process_id, stage_index)) = path?;
    let started_at = state
        .registry
        .write()
        .await
        .start_timer(ProcessId(process_id), stage_index)?;

    tracing::info!(
        event = "timer_started",
        process_id,
        stage_index,
        started_at = %started_at,
    );
    Ok(Json(StartTimerResponse::success(stage_index, started_at)))
}

/// Stop a stage timer and report the interval.
pub async fn stop_timer_handler(
    State(state): State<AppState>,
    path: Result<Path<(u64, StageIndex)>, PathRejection>,
) -> Result<Json<StopTimerResponse>, ApiError> {
    let Path((process_id, stage_index)) = path?;
    let id = ProcessId(process_id);

    // Read the new total under the same guard as the transition.
    let (elapsed, total) = {
        let mut registry = state.registry.write().await;
        let elapsed = registry.stop_timer(id, stage_index)?;
        let total = registry.stage(id, stage_index)?.accumulated();
        (elapsed, total)
    };

    tracing::info!(
        event = "timer_stopped",
        process_id,
        stage_index,
        elapsed_seconds = elapsed.as_secs_f64(),
        duration_seconds = total.as_secs_f64(),
    );
    Ok(Json(StopTimerResponse::success(
        stage_index,
        elapsed.as_secs_f64(),
        total.as_secs_f64(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_core::TimerFault;

    #[test]
    fn core_errors_are_client_errors() {
        let cases = [
            (TempoError::ProcessNotFound(ProcessId(9)), StatusCode::NOT_FOUND),
            (TempoError::StageNotFound(ProcessId(1), 3), StatusCode::NOT_FOUND),
            (TempoError::IterationNotFound(ProcessId(1), 0), StatusCode::NOT_FOUND),
            (TimerFault::AlreadyRunning.into(), StatusCode::BAD_REQUEST),
            (TimerFault::ClockWentBackwards.into(), StatusCode::BAD_REQUEST),
            (TempoError::InvalidInput("empty".into()), StatusCode::BAD_REQUEST),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn malformed_requests_carry_a_prefixed_message() {
        let err = ApiError::Malformed("missing field `name`".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Malformed request: missing field `name`");
    }
}
