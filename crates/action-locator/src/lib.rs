//! Locator ranking - turns recorded selector candidates into a primary locator
//! plus an ordered fallback chain.
//!
//! This crate implements the static half of element resolution:
//! - Candidate normalization (trim, drop empties, first-seen dedup)
//! - Tier classification by selector syntax
//! - Icon exclusion and primary/fallback selection
//!
//! Nothing here talks to a browser; the live walk over a [`LocatorSet`] lives
//! in `action-primitives`.

pub mod errors;
pub mod normalizer;
pub mod ranker;
pub mod tier;
pub mod types;

pub use errors::*;
pub use normalizer::*;
pub use ranker::*;
pub use tier::*;
pub use types::*;
