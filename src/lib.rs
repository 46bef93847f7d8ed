//! stageline - a staged pipeline runner for literary-corpus processing workflows

pub mod core;
pub mod execution;

// Re-export commonly used types
pub use crate::core::{Plan, Processor, Stage, StageOutput};
pub use crate::core::{ProcessorRegistry, RunResult, StageError, StageFailure, ValueStore};
pub use crate::execution::{DelayStrategy, ExecutionEngine, FixedDelay, LogSink, NoDelay};
