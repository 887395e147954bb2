//! # tempo-core
//!
//! The process timing engine for Tempo - THE LOGIC.
//!
//! Tempo tracks hierarchical work breakdowns (Process → Iteration → Stage)
//! and measures the wall-clock time spent in each Stage with a start/stop
//! timer.
//!
//! ## Components
//!
//! - `model` - Process, Iteration and Stage, plus the drafts used to create them
//! - `timer` - the single-flight stage timer state machine
//! - `registry` - identifier assignment, stage addressing, timer operations
//! - `snapshot` - serializable point-in-time views
//! - `clock` - the injected wall-clock reference
//!
//! ## Architectural Constraints
//!
//! The core:
//! - Is synchronous: NO async, NO network, NO logging dependencies
//! - Keeps state only in memory; nothing survives a restart
//! - Reads time only through a [`Clock`], so every transition is testable
//! - Keeps durations as integers; `f64` seconds exist only in snapshots

// =============================================================================
// MODULES
// =============================================================================

pub mod clock;
pub mod limits;
pub mod model;
pub mod registry;
pub mod snapshot;
pub mod timer;
pub mod types;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use types::{ErrorKind, ProcessId, StageIndex, TempoError, TimerFault};

pub use clock::{Clock, ManualClock, SystemClock};
pub use model::{Iteration, IterationDraft, Process, ProcessDraft, Stage, StageDraft};
pub use registry::Registry;
pub use snapshot::{IterationSnapshot, ProcessSnapshot, RegistryStats, RunSnapshot, StageSnapshot};
pub use timer::{Run, TimerState};
