//! Plan execution engine

pub mod engine;
pub mod retry;
pub mod sink;

pub use engine::ExecutionEngine;
pub use retry::{DelayStrategy, FixedDelay, NoDelay};
pub use sink::LogSink;
