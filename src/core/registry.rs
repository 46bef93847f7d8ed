//! Processor registry for resolving declared plans

use crate::core::stage::Processor;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of named processors.
///
/// Declared plans reference processors by name; the registry supplies the
/// implementations when a configuration is resolved into a runnable plan.
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    processors: HashMap<String, Arc<dyn Processor>>,
}

impl ProcessorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor under a name, replacing any previous entry
    pub fn register(&mut self, name: &str, processor: impl Processor + 'static) {
        self.processors.insert(name.to_string(), Arc::new(processor));
    }

    /// Look up a processor by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Processor>> {
        self.processors.get(name).cloned()
    }

    /// Check whether a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.processors.contains_key(name)
    }

    /// Registered names, sorted for stable listings
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.processors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("names", &self.names())
            .finish()
    }
}
