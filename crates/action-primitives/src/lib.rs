//! Action primitives - executes recorded UI actions over ranked locators
//!
//! This crate provides the live half of element resolution:
//! - The [`ElementDriver`] port any automation backend implements
//! - Text mode resolution (DOM text vs displayed text)
//! - The fallback walk with bounded lookups and a single cross-mode retry
//! - Typed outcomes and per-candidate attempt reports
//! - An offline page snapshot driver for dry runs and tests

pub mod driver;
pub mod errors;
pub mod executor;
pub mod outcome;
pub mod snapshot;
pub mod text_mode;
pub mod types;

pub use driver::*;
pub use errors::*;
pub use executor::*;
pub use outcome::*;
pub use snapshot::*;
pub use text_mode::*;
pub use types::*;
