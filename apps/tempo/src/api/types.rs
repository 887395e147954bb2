//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//!
//! Process bodies returned by `GET /processes` and `GET /processes/{id}` are
//! `tempo_core::ProcessSnapshot` values serialized as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempo_core::{
    IterationDraft, ProcessDraft, ProcessId, RegistryStats, StageDraft, StageIndex, TempoError,
};

// =============================================================================
// ROOT / HEALTH RESPONSES
// =============================================================================

/// Greeting returned by `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

impl Default for RootResponse {
    fn default() -> Self {
        Self {
            message: "Tempo stage timer".to_string(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Registry status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub process_count: usize,
    pub stage_count: usize,
    pub running_timers: usize,
}

impl From<RegistryStats> for StatusResponse {
    fn from(stats: RegistryStats) -> Self {
        Self {
            process_count: stats.process_count,
            stage_count: stats.stage_count,
            running_timers: stats.running_timers,
        }
    }
}

// =============================================================================
// CREATE PROCESS
// =============================================================================

/// Stage entry inside a creation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageJson {
    pub name: String,
}

/// Iteration entry inside a creation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationJson {
    pub name: String,
    #[serde(default)]
    pub stages: Vec<StageJson>,
}

/// `POST /processes` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProcessRequest {
    pub name: String,
    #[serde(default)]
    pub iterations: Vec<IterationJson>,
}

impl CreateProcessRequest {
    /// Convert to a validated core draft.
    ///
    /// Validation runs here, at the boundary, so bad input is rejected
    /// without taking the registry write lock. `Registry::create` repeats
    /// it as the invariant guard for direct core callers.
    pub fn to_draft(&self) -> Result<ProcessDraft, TempoError> {
        let draft = ProcessDraft {
            name: self.name.clone(),
            iterations: self
                .iterations
                .iter()
                .map(|it| IterationDraft {
                    name: it.name.clone(),
                    stages: it.stages.iter().map(|s| StageDraft::new(&s.name)).collect(),
                })
                .collect(),
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// `POST /processes` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProcessResponse {
    pub success: bool,
    pub process_id: u64,
}

impl CreateProcessResponse {
    pub fn success(id: ProcessId) -> Self {
        Self {
            success: true,
            process_id: id.value(),
        }
    }
}

// =============================================================================
// ADD STAGE
// =============================================================================

/// `POST /processes/{id}/stages` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddStageRequest {
    pub name: String,
    /// Iteration to list the stage under; the process owns it when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration: Option<usize>,
}

impl AddStageRequest {
    /// Convert to a validated core draft.
    pub fn to_draft(&self) -> Result<StageDraft, TempoError> {
        let draft = StageDraft::new(&self.name);
        draft.validate()?;
        Ok(draft)
    }
}

/// `POST /processes/{id}/stages` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddStageResponse {
    pub success: bool,
    pub message: String,
    pub stage_index: StageIndex,
}

impl AddStageResponse {
    pub fn success(stage_index: StageIndex) -> Self {
        Self {
            success: true,
            message: "Stage added successfully".to_string(),
            stage_index,
        }
    }
}

// =============================================================================
// TIMER RESPONSES
// =============================================================================

/// `POST /processes/{id}/stages/{index}/start` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartTimerResponse {
    pub success: bool,
    pub message: String,
    pub started_at: DateTime<Utc>,
}

impl StartTimerResponse {
    pub fn success(stage_index: StageIndex, started_at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            message: format!("Timer started for stage {}", stage_index),
            started_at,
        }
    }
}

/// `POST /processes/{id}/stages/{index}/stop` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopTimerResponse {
    pub success: bool,
    pub message: String,
    /// Seconds in the interval just closed.
    pub elapsed_time: f64,
    /// Accumulated seconds over every completed interval.
    pub duration_seconds: f64,
}

impl StopTimerResponse {
    pub fn success(stage_index: StageIndex, elapsed_time: f64, duration_seconds: f64) -> Self {
        Self {
            success: true,
            message: format!("Timer stopped for stage {}", stage_index),
            elapsed_time,
            duration_seconds,
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body of every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}
