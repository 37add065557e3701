//! Configuration management module
//!
//! One YAML document with a section per layer. Every section has defaults,
//! so an empty or partial file is valid.

use action_flow::{FailureStrategy, FlowConfig};
use action_primitives::ExecConfig;
use anyhow::{bail, Context, Result};
use replay_recipes::RecPolicyView;
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable overriding `executor.element_wait_ms`
pub const ENV_ELEMENT_WAIT_MS: &str = "LOCATOR_REPLAY_ELEMENT_WAIT_MS";
/// Environment variable overriding `executor.max_candidates`
pub const ENV_MAX_CANDIDATES: &str = "LOCATOR_REPLAY_MAX_CANDIDATES";
/// Environment variable overriding `flow.on_failure`
pub const ENV_ON_FAILURE: &str = "LOCATOR_REPLAY_ON_FAILURE";

/// Application configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub executor: ExecConfig,
    pub flow: FlowConfig,
    pub recipes: RecPolicyView,
}

impl Config {
    /// Parse a YAML document
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).context("Failed to parse config file")
    }

    pub fn validate(&self) -> Result<()> {
        if self.executor.element_wait_ms == 0 {
            bail!("executor.element_wait_ms must be greater than zero");
        }
        if self.executor.max_candidates == Some(0) {
            bail!("executor.max_candidates must be at least 1 when set");
        }
        self.recipes
            .validate()
            .context("invalid recipes section")?;
        Ok(())
    }

    /// Apply `LOCATOR_REPLAY_*` environment overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(raw) = env::var(ENV_ELEMENT_WAIT_MS) {
            self.executor.element_wait_ms = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be an integer, got '{}'", ENV_ELEMENT_WAIT_MS, raw))?;
        }

        if let Ok(raw) = env::var(ENV_MAX_CANDIDATES) {
            let raw = raw.trim();
            self.executor.max_candidates = if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(raw.parse().with_context(|| {
                    format!("{} must be an integer or 'none', got '{}'", ENV_MAX_CANDIDATES, raw)
                })?)
            };
        }

        if let Ok(raw) = env::var(ENV_ON_FAILURE) {
            self.flow.on_failure = match raw.trim().to_ascii_lowercase().as_str() {
                "abort" => FailureStrategy::Abort,
                "continue" => FailureStrategy::Continue,
                other => bail!("{} must be 'abort' or 'continue', got '{}'", ENV_ON_FAILURE, other),
            };
        }

        Ok(())
    }
}
