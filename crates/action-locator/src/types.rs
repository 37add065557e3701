//! Core types for locator system

use crate::tier::Tier;
use serde::{Deserialize, Serialize};

/// One normalized selector with its derived tier
///
/// `position` is the index in the normalized input and breaks ties between
/// candidates of the same tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorCandidate {
    /// Selector expression as recorded
    pub selector: String,

    /// Tier inferred from the selector syntax
    pub tier: Tier,

    /// Index in the normalized candidate list
    pub position: usize,
}

impl SelectorCandidate {
    /// Classify a selector at the given position
    pub fn new(selector: impl Into<String>, position: usize) -> Self {
        let selector = selector.into();
        let tier = Tier::classify(&selector);
        Self {
            selector,
            tier,
            position,
        }
    }

    /// Ranking key: tier first, then original order
    pub fn rank_key(&self) -> (Tier, usize) {
        (self.tier, self.position)
    }
}

/// Ranked locators for one logical element
///
/// `primary` and `fallbacks` never hold an icon candidate. Excluded icon
/// selectors are kept only for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorSet {
    /// Best candidate
    pub primary: SelectorCandidate,

    /// Remaining rankable candidates, in walk order
    pub fallbacks: Vec<SelectorCandidate>,

    /// Icon candidates dropped from the pool
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<SelectorCandidate>,
}

impl LocatorSet {
    /// Iterate primary then fallbacks, in walk order
    pub fn candidates(&self) -> impl Iterator<Item = &SelectorCandidate> {
        std::iter::once(&self.primary).chain(self.fallbacks.iter())
    }

    /// Selector strings in walk order
    pub fn selectors(&self) -> Vec<String> {
        self.candidates().map(|c| c.selector.clone()).collect()
    }

    /// Number of rankable candidates
    pub fn len(&self) -> usize {
        1 + self.fallbacks.len()
    }

    /// A set always holds a primary, so it is never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn primary_tier(&self) -> Tier {
        self.primary.tier
    }
}
