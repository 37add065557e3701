//! Scenario Orchestration Layer
//!
//! Compiles recorded scenario files into validated actions and runs them in
//! order over an action executor, with abort/continue failure handling,
//! cooperative cancellation between steps and repeated-run detection.

pub mod errors;
pub mod runner;
pub mod scenario;
pub mod types;

pub use errors::FlowError;
pub use runner::{DefaultScenarioRunner, ScenarioRunner};
pub use scenario::{Scenario, ScenarioFile};
pub use types::{FailureStrategy, FlowConfig, ScenarioReport, StepResult};
