//! # Registry
//!
//! The in-memory store mapping assigned identifiers to Processes, and the
//! entry point for stage addressing and timer transitions.
//!
//! ## Ownership and locking
//!
//! The Registry is a plain value. Every mutation takes `&mut self`, so a
//! caller that shares it behind one lock (the HTTP shell uses a `RwLock`)
//! holds that lock for the whole check-then-act of a transition: of two
//! concurrent `start` calls on one Stage exactly one succeeds.
//!
//! ## Identifiers
//!
//! Identifiers start at 1, are strictly increasing and are never reused
//! for the lifetime of the Registry.

use crate::clock::{Clock, SystemClock};
use crate::model::{Process, ProcessDraft, Stage, StageDraft};
use crate::snapshot::{ProcessSnapshot, RegistryStats};
use crate::{ProcessId, StageIndex, TempoError};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Process-wide store of Processes.
#[derive(Debug)]
pub struct Registry {
    processes: BTreeMap<ProcessId, Process>,
    /// Last identifier handed out; 0 means none yet.
    last_id: u64,
    clock: Arc<dyn Clock>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty registry reading time from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            processes: BTreeMap::new(),
            last_id: 0,
            clock,
        }
    }

    // =========================================================================
    // PROCESS OPERATIONS
    // =========================================================================

    /// Store a new Process and return its freshly assigned identifier.
    ///
    /// The draft is validated first; nothing is stored and no identifier
    /// is consumed if validation fails. Shells may validate earlier, but
    /// this check is the one the stored state relies on.
    pub fn create(&mut self, draft: ProcessDraft) -> Result<ProcessId, TempoError> {
        draft.validate()?;

        let next = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| TempoError::InvalidInput("process identifiers exhausted".into()))?;
        let id = ProcessId(next);
        self.last_id = next;
        self.processes.insert(id, Process::from_draft(id, draft));
        Ok(id)
    }

    /// Look up a Process.
    pub fn get(&self, id: ProcessId) -> Result<&Process, TempoError> {
        self.processes
            .get(&id)
            .ok_or(TempoError::ProcessNotFound(id))
    }

    fn get_mut(&mut self, id: ProcessId) -> Result<&mut Process, TempoError> {
        self.processes
            .get_mut(&id)
            .ok_or(TempoError::ProcessNotFound(id))
    }

    /// All Processes in creation order.
    pub fn list(&self) -> impl Iterator<Item = &Process> {
        // Ids are assigned monotonically, so key order is creation order.
        self.processes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Append a new idle Stage to a Process and return its address.
    ///
    /// With `iteration = Some(i)` the stage is listed under iteration `i`;
    /// otherwise the Process owns it directly.
    pub fn add_stage(
        &mut self,
        id: ProcessId,
        stage: StageDraft,
        iteration: Option<usize>,
    ) -> Result<StageIndex, TempoError> {
        self.get_mut(id)?.push_stage(stage, iteration)
    }

    // =========================================================================
    // STAGE ADDRESSING
    // =========================================================================

    /// Resolve `(process, stage index)` to a Stage.
    pub fn stage(&self, id: ProcessId, index: StageIndex) -> Result<&Stage, TempoError> {
        self.get(id)?
            .stage(index)
            .ok_or(TempoError::StageNotFound(id, index))
    }

    fn stage_mut(&mut self, id: ProcessId, index: StageIndex) -> Result<&mut Stage, TempoError> {
        self.get_mut(id)?
            .stage_mut(index)
            .ok_or(TempoError::StageNotFound(id, index))
    }

    // =========================================================================
    // TIMER CONTROLLER
    // =========================================================================

    /// Start the timer of an idle Stage. Returns the recorded start instant.
    pub fn start_timer(
        &mut self,
        id: ProcessId,
        index: StageIndex,
    ) -> Result<DateTime<Utc>, TempoError> {
        let now = self.clock.now();
        self.stage_mut(id, index)?.start(now)?;
        Ok(now)
    }

    /// Stop the timer of a running Stage.
    ///
    /// Returns the elapsed time of the interval just closed; the Stage's
    /// accumulated total is updated by the same amount.
    pub fn stop_timer(&mut self, id: ProcessId, index: StageIndex) -> Result<Duration, TempoError> {
        let now = self.clock.now();
        Ok(self.stage_mut(id, index)?.stop(now)?)
    }

    // =========================================================================
    // REPORTING
    // =========================================================================

    /// Nested snapshot of one Process.
    pub fn snapshot(&self, id: ProcessId) -> Result<ProcessSnapshot, TempoError> {
        let now = self.clock.now();
        Ok(ProcessSnapshot::capture(self.get(id)?, now))
    }

    /// Snapshots of every Process in creation order.
    #[must_use]
    pub fn snapshots(&self) -> Vec<ProcessSnapshot> {
        let now = self.clock.now();
        self.list()
            .map(|process| ProcessSnapshot::capture(process, now))
            .collect()
    }

    /// Registry-wide counters.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        self.list().fold(
            RegistryStats {
                process_count: self.len(),
                ..RegistryStats::default()
            },
            |mut stats, process| {
                stats.stage_count = stats.stage_count.saturating_add(process.stage_count());
                stats.running_timers = stats.running_timers.saturating_add(process.running_count());
                stats
            },
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
