//! Log sink - injected line logging for pipeline runs

use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Destination for the executor's human-readable progress lines.
///
/// Defaults to `Silent`: the executor never writes to process-wide output
/// on its own. Structured `tracing` events are emitted separately by the
/// engine and retry wrapper regardless of the sink.
#[derive(Clone, Default)]
pub enum LogSink {
    /// Discard every line
    #[default]
    Silent,

    /// Forward lines to `tracing` at info level
    Tracing,

    /// Forward lines to an arbitrary callable
    Custom(Arc<dyn Fn(&str) + Send + Sync>),
}

impl LogSink {
    /// Build a sink from any line-consuming closure
    pub fn custom(f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        LogSink::Custom(Arc::new(f))
    }

    /// Emit one line
    pub fn emit(&self, line: &str) {
        match self {
            LogSink::Silent => {}
            LogSink::Tracing => info!("{}", line),
            LogSink::Custom(f) => f(line),
        }
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSink::Silent => f.write_str("Silent"),
            LogSink::Tracing => f.write_str("Tracing"),
            LogSink::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
