//! Core data types for action execution

use action_locator::{build_locator_set, LocatorSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::errors::ActionError;

/// Which text an element is compared by
///
/// - DomText: raw `textContent`, unaffected by CSS
/// - DisplayedText: rendered text after transforms such as `text-transform`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TextMode {
    #[default]
    DomText,
    DisplayedText,
}

impl TextMode {
    /// The mode used for the single cross-mode retry
    pub fn other(&self) -> TextMode {
        match self {
            TextMode::DomText => TextMode::DisplayedText,
            TextMode::DisplayedText => TextMode::DomText,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TextMode::DomText => "domText",
            TextMode::DisplayedText => "displayedText",
        }
    }
}

impl fmt::Display for TextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Action tag without payload; used for records and signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    Click,
    Input,
    VerifyText,
}

impl ActionType {
    pub fn name(&self) -> &'static str {
        match self {
            ActionType::Click => "click",
            ActionType::Input => "input",
            ActionType::VerifyText => "verifyText",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an action does once its element is resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ActionKind {
    Click,
    Input { value: String },
    VerifyText { expected: String },
}

impl ActionKind {
    pub fn action_type(&self) -> ActionType {
        match self {
            ActionKind::Click => ActionType::Click,
            ActionKind::Input { .. } => ActionType::Input,
            ActionKind::VerifyText { .. } => ActionType::VerifyText,
        }
    }
}

/// One recorded step as it appears in scenario files
///
/// Every field except `kind` is optional at this layer so a malformed
/// record can be reported as a configuration error instead of a parse
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    pub kind: ActionType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_mode: Option<TextMode>,

    #[serde(default)]
    pub css_sensitive: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A validated UI action ready for execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiAction {
    #[serde(flatten)]
    pub kind: ActionKind,

    pub locators: LocatorSet,

    /// Explicit mode; overrides the resolver when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_mode: Option<TextMode>,

    #[serde(default)]
    pub css_sensitive: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UiAction {
    /// Create a new action over an already ranked locator set
    pub fn new(kind: ActionKind, locators: LocatorSet) -> Self {
        Self {
            kind,
            locators,
            text_mode: None,
            css_sensitive: false,
            description: None,
        }
    }

    /// Validate a record and rank its candidates.
    ///
    /// Fails when the candidate list is absent or degenerate, or when the
    /// field required by the record's kind is missing.
    pub fn from_record(record: ActionRecord) -> Result<Self, ActionError> {
        let kind = match record.kind {
            ActionType::Click => ActionKind::Click,
            ActionType::Input => ActionKind::Input {
                value: record.value.ok_or_else(|| {
                    ActionError::Configuration("input action requires 'value'".to_string())
                })?,
            },
            ActionType::VerifyText => ActionKind::VerifyText {
                expected: record.expected.ok_or_else(|| {
                    ActionError::Configuration(
                        "verifyText action requires 'expected'".to_string(),
                    )
                })?,
            },
        };

        let locators = build_locator_set(record.candidates.as_deref())?;

        Ok(Self {
            kind,
            locators,
            text_mode: record.text_mode,
            css_sensitive: record.css_sensitive,
            description: record.description,
        })
    }

    /// Force a text mode
    pub fn with_text_mode(mut self, mode: TextMode) -> Self {
        self.text_mode = Some(mode);
        self
    }

    /// Mark the step as affected by CSS text transforms
    pub fn with_css_sensitive(mut self, css_sensitive: bool) -> Self {
        self.css_sensitive = css_sensitive;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn action_type(&self) -> ActionType {
        self.kind.action_type()
    }

    /// Human readable step description
    pub fn describe(&self) -> String {
        if let Some(description) = &self.description {
            return description.clone();
        }

        let selector = &self.locators.primary.selector;
        match &self.kind {
            ActionKind::Click => format!("Click '{}'", selector),
            ActionKind::Input { value } => format!("Fill '{}' with '{}'", selector, value),
            ActionKind::VerifyText { expected } => {
                format!("Verify text of '{}' is '{}'", selector, expected)
            }
        }
    }
}

/// Executor configuration
///
/// Passed explicitly to the executor; nothing here is read from the
/// environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Bounded wait per candidate lookup (milliseconds)
    pub element_wait_ms: u64,

    /// Cap on candidates attempted per action; `None` walks all of them
    pub max_candidates: Option<usize>,

    /// Retry a failed text comparison once in the other mode
    pub cross_mode_retry: bool,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            element_wait_ms: 5000,
            max_candidates: None,
            cross_mode_retry: true,
        }
    }
}

impl ExecConfig {
    pub fn element_wait(&self) -> Duration {
        Duration::from_millis(self.element_wait_ms)
    }

    /// Number of candidates to walk for a set of `available` candidates.
    ///
    /// Always at least one so an action is never skipped silently.
    pub fn candidate_budget(&self, available: usize) -> usize {
        match self.max_candidates {
            Some(cap) => available.min(cap.max(1)),
            None => available,
        }
    }

    pub fn with_element_wait_ms(mut self, ms: u64) -> Self {
        self.element_wait_ms = ms;
        self
    }

    pub fn with_max_candidates(mut self, cap: Option<usize>) -> Self {
        self.max_candidates = cap;
        self
    }

    pub fn with_cross_mode_retry(mut self, enabled: bool) -> Self {
        self.cross_mode_retry = enabled;
        self
    }
}
