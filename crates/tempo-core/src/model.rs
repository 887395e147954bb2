//! # Data Model
//!
//! The three-level containment tree: Process → Iteration → Stage.
//!
//! ## Stage addressing
//!
//! Every Process owns one append-only stage arena. A Stage's position in
//! that arena is its address (`StageIndex`) for the whole life of the
//! Process. Iterations do not own Stage values; they hold ordered indices
//! into the arena. Stages added without an iteration belong to the Process
//! directly. Each arena slot therefore has exactly one owner, either one
//! Iteration or the Process itself.
//!
//! Stages supplied in the creation draft are allocated in iteration order,
//! then stage order, so index 0 is the first stage of the first iteration.

use crate::limits::{
    MAX_ITERATIONS_PER_PROCESS, MAX_STAGES_PER_PROCESS, validate_name,
};
use crate::timer::{Run, TimerState};
use crate::{ProcessId, StageIndex, TempoError};
use chrono::{DateTime, Utc};
use std::time::Duration;

// =============================================================================
// DRAFTS
// =============================================================================

/// Caller-supplied description of a Stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StageDraft {
    pub name: String,
}

impl StageDraft {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Check the stage name against the input limits.
    pub fn validate(&self) -> Result<(), TempoError> {
        validate_name(&self.name, "stage")
    }
}

/// Caller-supplied description of an Iteration and its stages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IterationDraft {
    pub name: String,
    pub stages: Vec<StageDraft>,
}

impl IterationDraft {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    /// Append a stage (builder style).
    #[must_use]
    pub fn with_stage(mut self, name: impl Into<String>) -> Self {
        self.stages.push(StageDraft::new(name));
        self
    }
}

/// Caller-supplied description of a whole Process, accepted wholesale by
/// `Registry::create`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessDraft {
    pub name: String,
    pub iterations: Vec<IterationDraft>,
}

impl ProcessDraft {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iterations: Vec::new(),
        }
    }

    /// Append an iteration (builder style).
    #[must_use]
    pub fn with_iteration(mut self, iteration: IterationDraft) -> Self {
        self.iterations.push(iteration);
        self
    }

    /// Total number of stages across all iterations.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.iterations.iter().map(|it| it.stages.len()).sum()
    }

    /// Validate every name and the structural limits.
    ///
    /// Nothing is stored if this fails.
    pub fn validate(&self) -> Result<(), TempoError> {
        validate_name(&self.name, "process")?;

        if self.iterations.len() > MAX_ITERATIONS_PER_PROCESS {
            return Err(TempoError::InvalidInput(format!(
                "{} iterations exceeds maximum {}",
                self.iterations.len(),
                MAX_ITERATIONS_PER_PROCESS
            )));
        }
        if self.stage_count() > MAX_STAGES_PER_PROCESS {
            return Err(TempoError::InvalidInput(format!(
                "{} stages exceeds maximum {}",
                self.stage_count(),
                MAX_STAGES_PER_PROCESS
            )));
        }

        for iteration in &self.iterations {
            validate_name(&iteration.name, "iteration")?;
            for stage in &iteration.stages {
                stage.validate()?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// STAGE
// =============================================================================

/// The leaf entity: a named unit of work with its own timer.
///
/// Timer transitions live in [`crate::timer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub(crate) name: String,
    /// Sum of all completed intervals.
    pub(crate) accumulated: Duration,
    pub(crate) timer: TimerState,
    pub(crate) last_run: Option<Run>,
    pub(crate) completed_runs: u64,
}

impl Stage {
    /// Create an idle stage with zero accumulated time.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accumulated: Duration::ZERO,
            timer: TimerState::Idle,
            last_run: None,
            completed_runs: 0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accumulated elapsed time over every completed interval.
    #[must_use]
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    /// Accumulated elapsed time in seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        self.accumulated.as_secs_f64()
    }

    #[must_use]
    pub fn timer(&self) -> TimerState {
        self.timer
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Start instant of the current interval, present only while running.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.timer.started_at()
    }

    /// The most recent completed start/stop pair.
    #[must_use]
    pub fn last_run(&self) -> Option<Run> {
        self.last_run
    }

    #[must_use]
    pub fn completed_runs(&self) -> u64 {
        self.completed_runs
    }
}

impl From<StageDraft> for Stage {
    fn from(draft: StageDraft) -> Self {
        Self::new(draft.name)
    }
}

// =============================================================================
// ITERATION
// =============================================================================

/// An ordered group of stages inside a Process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iteration {
    pub(crate) name: String,
    pub(crate) stages: Vec<StageIndex>,
}

impl Iteration {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arena indices of this iteration's stages, in insertion order.
    #[must_use]
    pub fn stage_indices(&self) -> &[StageIndex] {
        &self.stages
    }
}

// =============================================================================
// PROCESS
// =============================================================================

/// The root addressable unit, owned by the Registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    id: ProcessId,
    name: String,
    iterations: Vec<Iteration>,
    /// Stage arena; the position is the stage's address.
    stages: Vec<Stage>,
    /// Arena indices of stages owned by the Process rather than an iteration.
    direct: Vec<StageIndex>,
}

impl Process {
    /// Build a Process from a validated draft.
    pub(crate) fn from_draft(id: ProcessId, draft: ProcessDraft) -> Self {
        let mut stages = Vec::with_capacity(draft.stage_count());
        let iterations = draft
            .iterations
            .into_iter()
            .map(|iteration| {
                let indices = iteration
                    .stages
                    .into_iter()
                    .map(|stage| {
                        stages.push(Stage::from(stage));
                        stages.len() - 1
                    })
                    .collect();
                Iteration {
                    name: iteration.name,
                    stages: indices,
                }
            })
            .collect();

        Self {
            id,
            name: draft.name,
            iterations,
            stages,
            direct: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ProcessId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn iterations(&self) -> &[Iteration] {
        &self.iterations
    }

    /// Number of addressable stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Resolve a stage address.
    #[must_use]
    pub fn stage(&self, index: StageIndex) -> Option<&Stage> {
        self.stages.get(index)
    }

    pub(crate) fn stage_mut(&mut self, index: StageIndex) -> Option<&mut Stage> {
        self.stages.get_mut(index)
    }

    /// All stages with their addresses, in arena order.
    pub fn stages(&self) -> impl Iterator<Item = (StageIndex, &Stage)> {
        self.stages.iter().enumerate()
    }

    /// Arena indices of stages owned directly by the Process.
    #[must_use]
    pub fn direct_stage_indices(&self) -> &[StageIndex] {
        &self.direct
    }

    /// Number of stages whose timer is currently running.
    #[must_use]
    pub fn running_count(&self) -> usize {
        self.stages.iter().filter(|s| s.is_running()).count()
    }

    /// Sum of every stage's accumulated time.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.stages
            .iter()
            .fold(Duration::ZERO, |acc, s| acc.saturating_add(s.accumulated))
    }

    /// Append a stage to the arena, optionally listing it under an iteration.
    ///
    /// Returns the new stage's address. Nothing changes on error.
    pub(crate) fn push_stage(
        &mut self,
        draft: StageDraft,
        iteration: Option<usize>,
    ) -> Result<StageIndex, TempoError> {
        draft.validate()?;

        if self.stages.len() >= MAX_STAGES_PER_PROCESS {
            return Err(TempoError::InvalidInput(format!(
                "process {} already holds the maximum of {} stages",
                self.id, MAX_STAGES_PER_PROCESS
            )));
        }
        if let Some(i) = iteration {
            if i >= self.iterations.len() {
                return Err(TempoError::IterationNotFound(self.id, i));
            }
        }

        let index = self.stages.len();
        self.stages.push(Stage::from(draft));
        match iteration.and_then(|i| self.iterations.get_mut(i)) {
            Some(owner) => owner.stages.push(index),
            None => self.direct.push(index),
        }
        Ok(index)
    }
}

// =============================================================================
// TESTS
// =============================================================================
