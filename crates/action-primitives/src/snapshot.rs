//! Offline page snapshot driver
//!
//! A [`PageSnapshot`] lists the elements of a page together with the
//! selectors each one answers to and both of its texts. [`SnapshotDriver`]
//! serves lookups from it, so scenarios can be replayed without a browser.

use crate::{
    driver::{ElementDriver, ElementHandle},
    errors::{ActionError, DriverError},
};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

fn default_interactable() -> bool {
    true
}

/// One element in a page snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotElement {
    /// Stable id; generated from the position when omitted
    #[serde(default)]
    pub id: Option<String>,

    /// Selectors this element matches
    pub selectors: Vec<String>,

    #[serde(default)]
    pub dom_text: String,

    /// Rendered text; same as `dom_text` when omitted
    #[serde(default)]
    pub displayed_text: Option<String>,

    #[serde(default)]
    pub value: Option<String>,

    #[serde(default = "default_interactable")]
    pub interactable: bool,

    /// Element only appears after this delay (lazy rendering)
    #[serde(default)]
    pub appears_after_ms: u64,
}

impl SnapshotElement {
    pub fn new(selectors: &[&str], dom_text: impl Into<String>) -> Self {
        Self {
            id: None,
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            dom_text: dom_text.into(),
            displayed_text: None,
            value: None,
            interactable: true,
            appears_after_ms: 0,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_displayed_text(mut self, text: impl Into<String>) -> Self {
        self.displayed_text = Some(text.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.interactable = false;
        self
    }

    pub fn appearing_after(mut self, ms: u64) -> Self {
        self.appears_after_ms = ms;
        self
    }

    fn displayed(&self) -> &str {
        self.displayed_text.as_deref().unwrap_or(&self.dom_text)
    }

    fn answers_to(&self, selector: &str) -> bool {
        self.selectors.iter().any(|s| s.trim() == selector.trim())
    }
}

/// Serialized description of a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub elements: Vec<SnapshotElement>,
}

impl PageSnapshot {
    pub fn new(elements: Vec<SnapshotElement>) -> Self {
        Self { url: None, elements }
    }

    /// Parse a YAML (or JSON) snapshot
    pub fn from_yaml_str(raw: &str) -> Result<Self, ActionError> {
        let snapshot: Self =
            serde_yaml::from_str(raw).map_err(|err| ActionError::SnapshotLoad(err.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Load a snapshot file; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_path(path: &Path) -> Result<Self, ActionError> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            ActionError::SnapshotLoad(format!("{}: {}", path.display(), err))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            let snapshot: Self = serde_json::from_str(&raw).map_err(|err| {
                ActionError::SnapshotLoad(format!("{}: {}", path.display(), err))
            })?;
            snapshot.validate()?;
            Ok(snapshot)
        } else {
            Self::from_yaml_str(&raw)
        }
    }

    /// Element ids, explicit or generated `el-N`, must be unique
    pub fn validate(&self) -> Result<(), ActionError> {
        let mut seen = HashSet::with_capacity(self.elements.len());
        for index in 0..self.elements.len() {
            let id = self.element_id(index);
            if !seen.insert(id.clone()) {
                return Err(ActionError::SnapshotLoad(format!(
                    "duplicate element id '{}'",
                    id
                )));
            }
        }
        Ok(())
    }

    fn element_id(&self, index: usize) -> String {
        self.elements[index]
            .id
            .clone()
            .unwrap_or_else(|| format!("el-{}", index))
    }
}

/// Side effect recorded by the snapshot driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Interaction {
    Click { element: String },
    Fill { element: String, value: String },
}

/// [`ElementDriver`] backed by a [`PageSnapshot`]
pub struct SnapshotDriver {
    snapshot: Mutex<PageSnapshot>,
    interactions: Mutex<Vec<Interaction>>,
}

impl SnapshotDriver {
    pub fn new(snapshot: PageSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            interactions: Mutex::new(Vec::new()),
        }
    }

    /// Interactions performed so far, in order
    pub fn interactions(&self) -> Vec<Interaction> {
        self.interactions.lock().clone()
    }

    /// Current value of an element, after any fills
    pub fn value_of(&self, element_id: &str) -> Option<String> {
        let snapshot = self.snapshot.lock();
        (0..snapshot.elements.len())
            .find(|&index| snapshot.element_id(index) == element_id)
            .and_then(|index| snapshot.elements[index].value.clone())
    }

    fn with_element<T>(
        &self,
        handle: &ElementHandle,
        f: impl FnOnce(&mut SnapshotElement) -> Result<T, DriverError>,
    ) -> Result<T, DriverError> {
        let mut snapshot = self.snapshot.lock();
        let index = (0..snapshot.elements.len())
            .find(|&index| snapshot.element_id(index) == handle.as_str())
            .ok_or_else(|| DriverError::StaleHandle(handle.to_string()))?;
        f(&mut snapshot.elements[index])
    }
}

#[async_trait]
impl ElementDriver for SnapshotDriver {
    async fn find_element(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Option<ElementHandle>, DriverError> {
        let found = {
            let snapshot = self.snapshot.lock();
            snapshot
                .elements
                .iter()
                .position(|element| element.answers_to(selector))
                .map(|index| {
                    (
                        snapshot.element_id(index),
                        snapshot.elements[index].appears_after_ms,
                    )
                })
        };

        let Some((id, delay_ms)) = found else {
            debug!(selector = %selector, "No snapshot element matches");
            return Ok(None);
        };

        let delay = Duration::from_millis(delay_ms);
        if delay > timeout {
            tokio::time::sleep(timeout).await;
            return Ok(None);
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        Ok(Some(ElementHandle::new(id)))
    }

    async fn read_dom_text(&self, handle: &ElementHandle) -> Result<String, DriverError> {
        self.with_element(handle, |element| Ok(element.dom_text.clone()))
    }

    async fn read_displayed_text(&self, handle: &ElementHandle) -> Result<String, DriverError> {
        self.with_element(handle, |element| Ok(element.displayed().to_string()))
    }

    async fn click(&self, handle: &ElementHandle) -> Result<(), DriverError> {
        self.with_element(handle, |element| {
            if element.interactable {
                Ok(())
            } else {
                Err(DriverError::NotInteractable(handle.to_string()))
            }
        })?;
        self.interactions.lock().push(Interaction::Click {
            element: handle.to_string(),
        });
        Ok(())
    }

    async fn fill(&self, handle: &ElementHandle, value: &str) -> Result<(), DriverError> {
        self.with_element(handle, |element| {
            if !element.interactable {
                return Err(DriverError::NotInteractable(handle.to_string()));
            }
            element.value = Some(value.to_string());
            Ok(())
        })?;
        self.interactions.lock().push(Interaction::Fill {
            element: handle.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextMode;

    fn driver() -> SnapshotDriver {
        SnapshotDriver::new(PageSnapshot::new(vec![
            SnapshotElement::new(&["#title", "h1"], "Pre-Arrival")
                .with_id("title")
                .with_displayed_text("PRE-ARRIVAL"),
            SnapshotElement::new(&["#email"], "").with_id("email"),
            SnapshotElement::new(&["#locked"], "").disabled(),
        ]))
    }

    #[tokio::test]
    async fn finds_by_any_listed_selector() {
        let driver = driver();
        let handle = driver
            .find_element("h1", Duration::from_millis(10))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(handle.as_str(), "title");
        assert!(driver
            .find_element("#missing", Duration::from_millis(10))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn reads_both_text_modes() {
        let driver = driver();
        let handle = ElementHandle::new("title");
        assert_eq!(driver.read_text(&handle, TextMode::DomText).await.unwrap(), "Pre-Arrival");
        assert_eq!(
            driver.read_text(&handle, TextMode::DisplayedText).await.unwrap(),
            "PRE-ARRIVAL"
        );
    }

    #[tokio::test]
    async fn fill_updates_value_and_logs() {
        let driver = driver();
        driver.fill(&ElementHandle::new("email"), "a@b.c").await.unwrap();
        assert_eq!(driver.value_of("email").as_deref(), Some("a@b.c"));
        assert_eq!(
            driver.interactions(),
            vec![Interaction::Fill {
                element: "email".into(),
                value: "a@b.c".into()
            }]
        );
    }

    #[tokio::test]
    async fn disabled_and_stale_elements_fail() {
        let driver = driver();
        let err = driver.click(&ElementHandle::new("el-2")).await.unwrap_err();
        assert!(matches!(err, DriverError::NotInteractable(_)));
        let err = driver.click(&ElementHandle::new("nope")).await.unwrap_err();
        assert!(matches!(err, DriverError::StaleHandle(_)));
        assert!(driver.interactions().is_empty());
    }

    #[tokio::test]
    async fn late_elements_miss_short_waits() {
        let driver = SnapshotDriver::new(PageSnapshot::new(vec![
            SnapshotElement::new(&["#late"], "").appearing_after(50),
        ]));
        assert!(driver
            .find_element("#late", Duration::from_millis(5))
            .await
            .unwrap()
            .is_none());
        assert!(driver
            .find_element("#late", Duration::from_millis(1000))
            .await
            .unwrap()
            .is_some());
    }

    #[test]
    fn parses_yaml_snapshot() {
        let yaml = r##"
url: https://example.test/booking
elements:
  - id: status
    selectors: ["[data-testid='status']"]
    domText: Pre-Arrival
    displayedText: PRE-ARRIVAL
  - selectors: ["#save"]
    interactable: false
"##;
        let snapshot = PageSnapshot::from_yaml_str(yaml).unwrap();
        assert_eq!(snapshot.elements.len(), 2);
        assert!(snapshot.elements[0].interactable);
        assert!(!snapshot.elements[1].interactable);
        assert_eq!(snapshot.element_id(1), "el-1");
    }

    #[test]
    fn duplicate_element_ids_are_rejected() {
        let explicit = r##"
elements:
  - id: save
    selectors: ["#save"]
  - id: save
    selectors: ["button.save"]
"##;
        let err = PageSnapshot::from_yaml_str(explicit).unwrap_err();
        assert_eq!(
            err,
            ActionError::SnapshotLoad("duplicate element id 'save'".into())
        );

        let generated = r##"
elements:
  - id: el-1
    selectors: ["#first"]
  - selectors: ["#second"]
"##;
        let err = PageSnapshot::from_yaml_str(generated).unwrap_err();
        assert!(err.to_string().contains("duplicate element id 'el-1'"));
    }

    #[test]
    fn loads_json_snapshot_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        std::fs::write(
            &path,
            r##"{"elements":[{"id":"save","selectors":["#save"],"domText":"Save"}]}"##,
        )
        .unwrap();

        let snapshot = PageSnapshot::from_path(&path).unwrap();
        assert_eq!(snapshot.elements[0].dom_text, "Save");

        let missing = PageSnapshot::from_path(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(missing, ActionError::SnapshotLoad(_)));
    }
}
