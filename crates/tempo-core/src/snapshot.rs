//! # Snapshots
//!
//! Read-only, serializable views of the Registry taken at a single instant.
//!
//! Snapshots are the only place durations become `f64` seconds. The live
//! length of a running interval is reported separately in
//! `running_seconds`; it is not part of `duration_seconds` until the timer
//! is stopped.

use crate::model::{Process, Stage};
use crate::timer::Run;
use crate::{ProcessId, StageIndex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed start/stop pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
    pub elapsed_seconds: f64,
}

impl From<Run> for RunSnapshot {
    fn from(run: Run) -> Self {
        Self {
            started_at: run.started_at,
            stopped_at: run.stopped_at,
            elapsed_seconds: run.elapsed().as_secs_f64(),
        }
    }
}

/// One stage, with its address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSnapshot {
    pub index: StageIndex,
    pub name: String,
    /// "idle" or "running".
    pub state: String,
    pub duration_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<RunSnapshot>,
    pub completed_runs: u64,
}

impl StageSnapshot {
    #[must_use]
    pub fn capture(index: StageIndex, stage: &Stage, now: DateTime<Utc>) -> Self {
        Self {
            index,
            name: stage.name().to_string(),
            state: stage.timer().label().to_string(),
            duration_seconds: stage.duration_seconds(),
            started_at: stage.started_at(),
            running_seconds: stage.running_for(now).map(|d| d.as_secs_f64()),
            last_run: stage.last_run().map(RunSnapshot::from),
            completed_runs: stage.completed_runs(),
        }
    }
}

/// One iteration with its stages inlined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationSnapshot {
    pub name: String,
    pub stages: Vec<StageSnapshot>,
}

/// A full nested view of a Process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    pub id: ProcessId,
    pub name: String,
    pub iterations: Vec<IterationSnapshot>,
    /// Stages owned by the Process rather than an iteration.
    pub stages: Vec<StageSnapshot>,
    pub total_duration_seconds: f64,
}

impl ProcessSnapshot {
    #[must_use]
    pub fn capture(process: &Process, now: DateTime<Utc>) -> Self {
        let stage_at = |index: &StageIndex| {
            process
                .stage(*index)
                .map(|stage| StageSnapshot::capture(*index, stage, now))
        };

        Self {
            id: process.id(),
            name: process.name().to_string(),
            iterations: process
                .iterations()
                .iter()
                .map(|iteration| IterationSnapshot {
                    name: iteration.name().to_string(),
                    stages: iteration.stage_indices().iter().filter_map(stage_at).collect(),
                })
                .collect(),
            stages: process
                .direct_stage_indices()
                .iter()
                .filter_map(stage_at)
                .collect(),
            total_duration_seconds: process.total_duration().as_secs_f64(),
        }
    }

    /// Find a stage anywhere in the snapshot by its address.
    #[must_use]
    pub fn stage(&self, index: StageIndex) -> Option<&StageSnapshot> {
        self.iterations
            .iter()
            .flat_map(|it| it.stages.iter())
            .chain(self.stages.iter())
            .find(|s| s.index == index)
    }
}

/// Registry-wide counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistryStats {
    pub process_count: usize,
    pub stage_count: usize,
    pub running_timers: usize,
}
