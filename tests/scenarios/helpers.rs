//! Test utility functions for stageline scenarios

use serde_json::Value;
use stageline::{
    DelayStrategy, ExecutionEngine, LogSink, NoDelay, Plan, Processor, RunResult, Stage,
    StageOutput, ValueStore,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Processor that fails a fixed number of times before succeeding.
///
/// Successful calls return the one-based call number, so assertions can
/// tell which attempt produced the bound value.
pub struct FlakyProcessor {
    failures_before_success: usize,
    calls: Arc<AtomicUsize>,
}

impl FlakyProcessor {
    /// Create a processor and a handle to its invocation counter
    pub fn new(failures_before_success: usize) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                failures_before_success,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl Processor for FlakyProcessor {
    fn process(&self, _args: &[Value]) -> anyhow::Result<StageOutput> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures_before_success {
            anyhow::bail!("flaky failure on call {}", call);
        }
        Ok(StageOutput::Single(Value::from(call as u64)))
    }
}

/// Processor that counts invocations and returns a fixed output
pub struct CountingProcessor {
    output: StageOutput,
    calls: Arc<AtomicUsize>,
}

impl CountingProcessor {
    /// Create a processor and a handle to its invocation counter
    pub fn new(output: StageOutput) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                output,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl Processor for CountingProcessor {
    fn process(&self, _args: &[Value]) -> anyhow::Result<StageOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }
}

/// Delay strategy that counts pauses instead of sleeping
#[derive(Clone, Default)]
pub struct CountingDelay {
    pauses: Arc<AtomicUsize>,
}

impl CountingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pauses taken so far
    pub fn count(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }
}

impl DelayStrategy for CountingDelay {
    fn pause(&self, _attempt: usize) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}

/// Sink that records every emitted line
pub fn recording_sink() -> (LogSink, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink_lines = lines.clone();
    let sink = LogSink::custom(move |line: &str| {
        sink_lines.lock().unwrap().push(line.to_string());
    });
    (sink, lines)
}

/// Run stages with no inter-attempt delay and no logging
pub fn run_quiet(stages: Vec<Stage>, initial: ValueStore) -> RunResult {
    ExecutionEngine::new(Plan::new("test", stages))
        .with_delay(NoDelay)
        .run(initial)
}
