//! Main execution engine - runs a plan from start to first failure

use crate::core::{Plan, RunResult, StageError, StageFailure, ValueStore};
use crate::execution::retry::{run_with_retries, DelayStrategy, FixedDelay};
use crate::execution::sink::LogSink;
use chrono::Utc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Executes a plan's stages in declared order, one at a time.
///
/// One engine owns one plan and may run it any number of times; each run
/// gets a fresh value store and result. Execution is synchronous and
/// fail-fast: the first missing input, exhausted retry budget, or output
/// shape mismatch aborts the run, and no later stage is attempted.
pub struct ExecutionEngine {
    plan: Plan,
    sink: LogSink,
    delay: Box<dyn DelayStrategy>,
}

impl ExecutionEngine {
    /// Create an engine with a silent sink and the default fixed delay
    pub fn new(plan: Plan) -> Self {
        Self {
            plan,
            sink: LogSink::Silent,
            delay: Box::new(FixedDelay::default()),
        }
    }

    /// Replace the log sink
    pub fn with_sink(mut self, sink: LogSink) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the inter-attempt delay strategy
    pub fn with_delay(mut self, delay: impl DelayStrategy + 'static) -> Self {
        self.delay = Box::new(delay);
        self
    }

    /// The plan this engine runs
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Run every stage against the seeded store, stopping at the first
    /// failure
    pub fn run(&self, initial: impl Into<ValueStore>) -> RunResult {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut store = initial.into();

        info!("Starting run {} of plan {}", run_id, self.plan.name);

        for stage in self.plan.stages() {
            self.sink.emit(&format!("Running stage: {}", stage.name));
            debug!("Stage {} inputs: {:?}", stage.name, stage.inputs);

            let args = match stage.resolve_inputs(&store) {
                Ok(args) => args,
                Err(err) => {
                    error!("Stage {} failed: {}", stage.name, err);
                    return self.fail(run_id, started_at, store, &stage.name, err);
                }
            };

            let output =
                match run_with_retries(stage, &args, &self.sink, self.delay.as_ref()) {
                    Ok(output) => output,
                    Err(err) => {
                        error!("Stage {} exhausted its retry budget: {}", stage.name, err);
                        let err = StageError::Processing(err.to_string());
                        return self.fail(run_id, started_at, store, &stage.name, err);
                    }
                };

            if let Err(err) = stage.bind_outputs(&mut store, output) {
                error!("Stage {} failed: {}", stage.name, err);
                return self.fail(run_id, started_at, store, &stage.name, err);
            }

            info!("Stage {} completed", stage.name);
        }

        info!("Run {} of plan {} completed", run_id, self.plan.name);
        RunResult {
            run_id,
            success: true,
            values: store,
            failures: Vec::new(),
            started_at,
            finished_at: Utc::now(),
        }
    }

    fn fail(
        &self,
        run_id: Uuid,
        started_at: chrono::DateTime<Utc>,
        values: ValueStore,
        stage: &str,
        error: StageError,
    ) -> RunResult {
        RunResult {
            run_id,
            success: false,
            values,
            failures: vec![StageFailure {
                stage: stage.to_string(),
                error,
            }],
            started_at,
            finished_at: Utc::now(),
        }
    }
}
