//! Plan domain model

use crate::core::stage::Stage;

/// The ordered, immutable list of stages defining one pipeline's shape.
///
/// A plan is constructed once and may be reused across many runs; runtime
/// state lives entirely in the per-run value store and result.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Human-readable plan name, used in logs
    pub name: String,

    stages: Vec<Stage>,
}

impl Plan {
    /// Create a plan from stages in execution order
    pub fn new(name: &str, stages: Vec<Stage>) -> Self {
        Self {
            name: name.to_string(),
            stages,
        }
    }

    /// The stages, in execution order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Look up a stage by name
    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.name == name)
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check whether the plan has no stages
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
