//! Text mode resolution
//!
//! Decides whether a step compares DOM text or displayed text. Only the
//! step's own text and flags are consulted, never the page.

use crate::types::{ActionKind, TextMode, UiAction};
use action_locator::{semantic_text_of, Tier};

/// Resolve the mode for a piece of expected text.
///
/// Displayed text is chosen when the step is CSS-sensitive or the text has
/// casing that natural prose would not, which is what a CSS case transform
/// leaves behind.
pub fn resolve_text_mode(text: &str, css_sensitive: bool) -> TextMode {
    if css_sensitive || has_irregular_casing(text) {
        TextMode::DisplayedText
    } else {
        TextMode::DomText
    }
}

/// True for an uppercase run of two or more letters, or a lowercase letter
/// followed directly by an uppercase one.
pub fn has_irregular_casing(text: &str) -> bool {
    let mut upper_run = 0usize;
    let mut prev_lower = false;

    for ch in text.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                return true;
            }
            upper_run += 1;
            if upper_run >= 2 {
                return true;
            }
            prev_lower = false;
        } else if ch.is_lowercase() {
            upper_run = 0;
            prev_lower = true;
        } else {
            upper_run = 0;
            prev_lower = false;
        }
    }

    false
}

/// Mode the executor uses for an action.
///
/// An explicit mode on the action wins. Clicks on a semantic-text primary
/// are tagged from the selector text; the executor does not compare text
/// for clicks, so that tag is informational.
pub fn effective_text_mode(action: &UiAction) -> TextMode {
    if let Some(mode) = action.text_mode {
        return mode;
    }

    match &action.kind {
        ActionKind::VerifyText { expected } => resolve_text_mode(expected, action.css_sensitive),
        ActionKind::Click if action.locators.primary.tier == Tier::SemanticText => {
            let text = semantic_text_of(&action.locators.primary.selector).unwrap_or_default();
            resolve_text_mode(&text, action.css_sensitive)
        }
        ActionKind::Click | ActionKind::Input { .. } => resolve_text_mode("", action.css_sensitive),
    }
}
