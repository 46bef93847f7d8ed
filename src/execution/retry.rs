//! Bounded retry around stage processors

use crate::core::stage::{Stage, StageOutput};
use crate::execution::sink::LogSink;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// Pause taken between a failed attempt and the next one.
///
/// Injected so tests can observe or eliminate the wait without touching
/// global clocks.
pub trait DelayStrategy: Send + Sync {
    /// Block until the next attempt may start. `attempt` is the index of
    /// the attempt that just failed, starting at 1.
    fn pause(&self, attempt: usize);
}

/// Constant pause, independent of the attempt number
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    /// Pause for `delay` after every failed attempt
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
        }
    }
}

impl DelayStrategy for FixedDelay {
    fn pause(&self, _attempt: usize) {
        std::thread::sleep(self.delay);
    }
}

/// No pause at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayStrategy for NoDelay {
    fn pause(&self, _attempt: usize) {}
}

/// Invoke a stage's processor up to `retries + 1` times.
///
/// Attempts run strictly in sequence, with a pause after every failed
/// attempt, including the last. Each failure is reported to the sink with
/// the attempt index and budget; only the final attempt's error survives.
pub(crate) fn run_with_retries(
    stage: &Stage,
    args: &[Value],
    sink: &LogSink,
    delay: &dyn DelayStrategy,
) -> anyhow::Result<StageOutput> {
    let budget = stage.attempt_budget();
    let mut attempt = 0;

    loop {
        attempt += 1;
        match stage.processor.process(args) {
            Ok(output) => return Ok(output),
            Err(error) => {
                warn!(
                    "Attempt {}/{} failed for stage {}: {}",
                    attempt, budget, stage.name, error
                );
                sink.emit(&format!(
                    "Attempt {}/{} failed for stage {}: {}",
                    attempt, budget, stage.name, error
                ));
                delay.pause(attempt);

                if attempt >= budget {
                    return Err(error);
                }
            }
        }
    }
}
