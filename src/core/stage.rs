//! Stage domain model

use crate::core::result::StageError;
use crate::core::store::ValueStore;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A processing capability plugged into a stage.
///
/// Implementations receive the stage's resolved inputs as positional values
/// and return either a single value or an ordered sequence of values. Any
/// error is treated as retryable by the executor, up to the stage's budget.
pub trait Processor: Send + Sync {
    /// Process one fixed-arity argument tuple
    fn process(&self, args: &[Value]) -> anyhow::Result<StageOutput>;
}

impl<F> Processor for F
where
    F: Fn(&[Value]) -> anyhow::Result<StageOutput> + Send + Sync,
{
    fn process(&self, args: &[Value]) -> anyhow::Result<StageOutput> {
        self(args)
    }
}

/// Result of a successful processor invocation.
///
/// Processors declare their shape explicitly: one scalar value, or a
/// fixed-size ordered sequence destined for element-wise binding.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutput {
    /// One value
    Single(Value),
    /// An ordered sequence of values
    Many(Vec<Value>),
}

impl StageOutput {
    /// Collapse the output into one value. Sequences become arrays.
    pub fn into_value(self) -> Value {
        match self {
            StageOutput::Single(value) => value,
            StageOutput::Many(values) => Value::Array(values),
        }
    }

    /// Render the output for failure reports
    fn render(&self) -> String {
        match self {
            StageOutput::Single(value) => value.to_string(),
            StageOutput::Many(values) => Value::Array(values.clone()).to_string(),
        }
    }
}

impl From<Value> for StageOutput {
    fn from(value: Value) -> Self {
        StageOutput::Single(value)
    }
}

impl From<Vec<Value>> for StageOutput {
    fn from(values: Vec<Value>) -> Self {
        StageOutput::Many(values)
    }
}

/// A single stage in a plan
#[derive(Clone)]
pub struct Stage {
    /// Unique stage name, used in logs and failure reports.
    ///
    /// Uniqueness within a plan is a caller obligation; the executor does
    /// not enforce it, and duplicates make log output ambiguous. Declared
    /// plans reject duplicates during validation.
    pub name: String,

    /// The processing capability invoked with the resolved inputs
    pub processor: Arc<dyn Processor>,

    /// Value-store keys resolved positionally into processor arguments
    pub inputs: Vec<String>,

    /// Value-store keys bound from the processor's result
    pub outputs: Vec<String>,

    /// Reserved for external memoization layers; the executor never
    /// consults it
    pub cache: bool,

    /// Retry attempts permitted after an initial failure
    pub retries: usize,
}

impl Stage {
    /// Create a stage with no retries and the cache flag set
    pub fn new(
        name: &str,
        processor: impl Processor + 'static,
        inputs: &[&str],
        outputs: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            processor: Arc::new(processor),
            inputs: inputs.iter().map(|key| key.to_string()).collect(),
            outputs: outputs.iter().map(|key| key.to_string()).collect(),
            cache: true,
            retries: 0,
        }
    }

    /// Set the retry budget
    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    /// Set the reserved memoization flag
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Total attempts the executor may spend on this stage
    pub fn attempt_budget(&self) -> usize {
        self.retries + 1
    }

    /// Resolve the declared inputs against the store, in declared order.
    ///
    /// Fails with every absent key when any is missing; the processor is
    /// never invoked in that case.
    pub fn resolve_inputs(&self, store: &ValueStore) -> Result<Vec<Value>, StageError> {
        let mut args = Vec::with_capacity(self.inputs.len());
        let mut missing = Vec::new();

        for key in &self.inputs {
            match store.get(key) {
                Some(value) => args.push(value.clone()),
                None => missing.push(key.clone()),
            }
        }

        if missing.is_empty() {
            Ok(args)
        } else {
            Err(StageError::MissingInputs(missing))
        }
    }

    /// Bind a successful result to the declared output keys.
    ///
    /// A single-output stage takes the whole result, sequence or not. With
    /// more (or fewer) declared outputs, only a sequence of matching length
    /// binds, element-wise in order. Anything else is a shape mismatch and
    /// the store is left untouched.
    pub fn bind_outputs(
        &self,
        store: &mut ValueStore,
        output: StageOutput,
    ) -> Result<(), StageError> {
        if self.outputs.len() == 1 {
            store.insert(self.outputs[0].clone(), output.into_value());
            return Ok(());
        }

        match output {
            StageOutput::Many(values) if values.len() == self.outputs.len() => {
                for (key, value) in self.outputs.iter().zip(values) {
                    store.insert(key.clone(), value);
                }
                Ok(())
            }
            other => Err(StageError::UnexpectedOutput {
                stage: self.name.clone(),
                value: other.render(),
            }),
        }
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("cache", &self.cache)
            .field("retries", &self.retries)
            .finish_non_exhaustive()
    }
}
