//! Plan configuration from YAML

use crate::core::plan::Plan;
use crate::core::registry::ProcessorRegistry;
use crate::core::stage::Stage;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Top-level plan configuration loaded from YAML.
///
/// A configuration declares the shape of a plan - stage order, wiring, and
/// retry budgets. Processors are always code, supplied by name through a
/// [`ProcessorRegistry`] when the configuration is resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Plan name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Keys the caller promises to seed into the value store. When
    /// present, stage wiring is checked statically against them.
    #[serde(default)]
    pub inputs: Option<Vec<String>>,

    /// Global default retry budget for stages that do not set their own
    #[serde(default)]
    pub retries: Option<usize>,

    /// Stage declarations, in execution order
    pub stages: Vec<StageConfig>,
}

/// Stage declaration as written in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// Unique stage name
    pub name: String,

    /// Registered processor this stage invokes
    pub processor: String,

    /// Value-store keys resolved into processor arguments
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Value-store keys bound from the result
    #[serde(default)]
    pub outputs: Vec<String>,

    /// Retry budget override for this stage
    #[serde(default)]
    pub retries: Option<usize>,

    /// Reserved memoization flag, carried through to the stage
    #[serde(default = "default_cache")]
    pub cache: bool,
}

fn default_cache() -> bool {
    true
}

impl PlanConfig {
    /// Load a plan configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a plan configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PlanConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the plan configuration
    pub fn validate(&self) -> Result<()> {
        // Check that all stage names are present and unique
        let mut seen_names = HashSet::new();
        for stage in &self.stages {
            if stage.name.is_empty() {
                anyhow::bail!("Stage names cannot be empty");
            }
            if !seen_names.insert(&stage.name) {
                anyhow::bail!("Duplicate stage name: {}", stage.name);
            }
        }

        // With declared plan inputs, every stage input must be satisfiable
        // from the seeds plus earlier stages' outputs. The executor still
        // checks at run time; this only catches wiring mistakes early.
        if let Some(seeds) = &self.inputs {
            let mut available: HashSet<&str> = seeds.iter().map(String::as_str).collect();
            for stage in &self.stages {
                for input in &stage.inputs {
                    if !available.contains(input.as_str()) {
                        anyhow::bail!(
                            "Stage '{}' input '{}' is not a declared plan input or an earlier stage's output",
                            stage.name,
                            input
                        );
                    }
                }
                available.extend(stage.outputs.iter().map(String::as_str));
            }
        }

        Ok(())
    }

    /// Resolve processor references and build a runnable plan
    pub fn resolve(&self, registry: &ProcessorRegistry) -> Result<Plan> {
        let mut stages = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let processor = registry.get(&stage.processor).ok_or_else(|| {
                anyhow::anyhow!(
                    "Stage '{}' references unknown processor '{}'",
                    stage.name,
                    stage.processor
                )
            })?;

            stages.push(Stage {
                name: stage.name.clone(),
                processor,
                inputs: stage.inputs.clone(),
                outputs: stage.outputs.clone(),
                cache: stage.cache,
                retries: stage.retries.or(self.retries).unwrap_or(0),
            });
        }

        Ok(Plan::new(&self.name, stages))
    }
}
