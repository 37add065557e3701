//! Scenario files and compilation into executable actions

use crate::errors::FlowError;
use action_primitives::{ActionRecord, UiAction};
use replay_recipes::{signatures_of, ActionSignature, Cluster, ClusterDetector};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Scenario as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioFile {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub steps: Vec<ActionRecord>,
}

impl ScenarioFile {
    /// Parse a YAML (or JSON) scenario
    pub fn from_yaml_str(raw: &str) -> Result<Self, FlowError> {
        serde_yaml::from_str(raw).map_err(|err| FlowError::ScenarioLoad(err.to_string()))
    }

    /// Load a scenario file; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_path(path: &Path) -> Result<Self, FlowError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| FlowError::ScenarioLoad(format!("{}: {}", path.display(), err)))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let parsed: Result<Self, String> = if is_json {
            serde_json::from_str(&raw).map_err(|err| err.to_string())
        } else {
            serde_yaml::from_str(&raw).map_err(|err| err.to_string())
        };
        parsed.map_err(|err| FlowError::ScenarioLoad(format!("{}: {}", path.display(), err)))
    }

    /// Validate every record and rank its candidates.
    ///
    /// The first invalid record aborts the compile and is named by index.
    pub fn compile(self) -> Result<Scenario, FlowError> {
        let mut actions = Vec::with_capacity(self.steps.len());

        for (index, record) in self.steps.into_iter().enumerate() {
            let action = UiAction::from_record(record).map_err(|err| FlowError::InvalidStep {
                index,
                reason: err.to_string(),
            })?;
            actions.push(action);
        }

        debug!(scenario = %self.name, steps = actions.len(), "Compiled scenario");

        Ok(Scenario {
            name: self.name,
            actions,
        })
    }
}

/// Compiled scenario
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub actions: Vec<UiAction>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, actions: Vec<UiAction>) -> Self {
        Self {
            name: name.into(),
            actions,
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn signatures(&self) -> Vec<ActionSignature> {
        signatures_of(&self.actions)
    }

    pub fn clusters(&self, detector: &ClusterDetector) -> Vec<Cluster> {
        detector.detect_actions(&self.actions)
    }
}
