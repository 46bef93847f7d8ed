//! Run result and failure reporting models

use crate::core::store::ValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Why a stage aborted the run
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum StageError {
    /// Declared input keys absent from the value store. Structural, never
    /// retried; the processor is not invoked.
    #[error("Missing inputs: {0:?}")]
    MissingInputs(Vec<String>),

    /// The final attempt's error text, after the retry budget ran out
    #[error("{0}")]
    Processing(String),

    /// The result did not match the declared outputs' arity. Evaluated
    /// only after a successful attempt, so never retried.
    #[error("Stage {stage} returned unexpected output format: {value}")]
    UnexpectedOutput { stage: String, value: String },
}

impl StageError {
    /// True for the failure kind that consumes a stage's retry budget
    pub fn is_retryable(&self) -> bool {
        matches!(self, StageError::Processing(_))
    }
}

/// A (stage, error) pair recorded when a run aborts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFailure {
    /// Name of the stage that failed
    pub stage: String,

    /// What went wrong
    pub error: StageError,
}

impl StageFailure {
    /// The failure message as presented to callers
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// Terminal report of one pipeline invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Unique run identifier
    pub run_id: Uuid,

    /// Whether every stage completed
    pub success: bool,

    /// The value store as of termination: complete on success, partial on
    /// failure (prior stages' outputs remain; the failing stage
    /// contributes nothing)
    pub values: ValueStore,

    /// Failures in order of occurrence; at most one entry, because
    /// execution stops at the first failure
    pub failures: Vec<StageFailure>,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run terminated
    pub finished_at: DateTime<Utc>,
}

impl RunResult {
    /// The failure that aborted the run, if any
    pub fn first_failure(&self) -> Option<&StageFailure> {
        self.failures.first()
    }

    /// Wall-clock time the run took
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
