//! # Core Type Definitions
//!
//! This module contains the identifier and error types shared by every
//! other module of the Tempo core:
//! - Process identifiers (`ProcessId`) and stage addresses (`StageIndex`)
//! - Timer transition faults (`TimerFault`)
//! - Error types (`TempoError`, `ErrorKind`)

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier assigned to a Process by the Registry.
///
/// Identifiers start at 1, are strictly increasing and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub u64);

impl ProcessId {
    /// Get the raw identifier value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Zero-based position of a Stage inside its Process's stage arena.
pub type StageIndex = usize;

// =============================================================================
// TIMER FAULTS
// =============================================================================

/// Why a timer transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerFault {
    /// `start` on a Stage whose timer is already running.
    #[error("timer already started")]
    AlreadyRunning,

    /// `stop` on a Stage whose timer is idle.
    #[error("timer not started")]
    NotRunning,

    /// The stop instant precedes the start instant.
    #[error("stop time precedes start time")]
    ClockWentBackwards,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Tempo core.
///
/// Every variant is caused by the caller's input; the core performs no I/O.
#[derive(Debug, Error)]
pub enum TempoError {
    /// No Process has been assigned this identifier.
    #[error("Process not found: {0}")]
    ProcessNotFound(ProcessId),

    /// The stage index is outside `[0, stage_count)` for the Process.
    #[error("Stage not found: process {0}, stage {1}")]
    StageNotFound(ProcessId, StageIndex),

    /// The iteration index is outside the Process's iteration list.
    #[error("Iteration not found: process {0}, iteration {1}")]
    IterationNotFound(ProcessId, usize),

    /// A timer operation violated the stage timer state machine.
    #[error("Invalid transition: {0}")]
    InvalidTransition(#[from] TimerFault),

    /// A draft or request field failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Coarse classification of a [`TempoError`] for callers that map
/// failures onto a transport (e.g. HTTP status codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced process, iteration or stage does not exist.
    NotFound,
    /// A timer guard rejected the operation.
    InvalidTransition,
    /// The caller supplied malformed input.
    InvalidInput,
}

impl TempoError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProcessNotFound(_) | Self::StageNotFound(..) | Self::IterationNotFound(..) => {
                ErrorKind::NotFound
            }
            Self::InvalidTransition(_) => ErrorKind::InvalidTransition,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
