//! Driver port consumed by the executor
//!
//! The executor never talks to a browser directly. Any automation backend
//! (a CDP session, a WebDriver bridge, an offline page snapshot) plugs in by
//! implementing [`ElementDriver`].

use crate::{errors::DriverError, types::TextMode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Opaque reference to a resolved element, owned by the driver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Element-level operations the executor needs from an automation backend
#[async_trait]
pub trait ElementDriver: Send + Sync {
    /// Find the first element matching `selector`, waiting at most `timeout`.
    ///
    /// `Ok(None)` means nothing matched within the wait.
    async fn find_element(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Option<ElementHandle>, DriverError>;

    /// Raw `textContent` of the element
    async fn read_dom_text(&self, handle: &ElementHandle) -> Result<String, DriverError>;

    /// Rendered `innerText` of the element, after CSS transforms
    async fn read_displayed_text(&self, handle: &ElementHandle) -> Result<String, DriverError>;

    async fn click(&self, handle: &ElementHandle) -> Result<(), DriverError>;

    /// Clear the element and set `value`
    async fn fill(&self, handle: &ElementHandle, value: &str) -> Result<(), DriverError>;

    /// Read text in the requested mode
    async fn read_text(&self, handle: &ElementHandle, mode: TextMode) -> Result<String, DriverError> {
        match mode {
            TextMode::DomText => self.read_dom_text(handle).await,
            TextMode::DisplayedText => self.read_displayed_text(handle).await,
        }
    }
}
