//! locator-replay - replays recorded UI actions against ranked locators
//!
//! The binary wires the workspace crates together: scenario files are
//! compiled by `action-flow`, locators ranked by `action-locator`, actions
//! executed by `action-primitives` and repeated runs found by `recipes`.

pub mod cli;
pub mod config;

pub use config::Config;
