use std::fmt;

use action_locator::Tier;
use action_primitives::{ActionType, UiAction};
use serde::{Deserialize, Serialize};

/// Shape of an action for repetition matching: what it does and how stable
/// its primary locator is. Selector text and values are ignored.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSignature {
    pub action: ActionType,
    pub tier: Tier,
}

impl ActionSignature {
    pub fn new(action: ActionType, tier: Tier) -> Self {
        Self { action, tier }
    }

    pub fn of(action: &UiAction) -> Self {
        Self::new(action.action_type(), action.locators.primary.tier)
    }
}

impl fmt::Display for ActionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.action, self.tier)
    }
}

pub fn signatures_of(actions: &[UiAction]) -> Vec<ActionSignature> {
    actions.iter().map(ActionSignature::of).collect()
}
