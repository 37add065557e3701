//! Primary/fallback selection over classified candidates

use crate::errors::LocatorError;
use crate::normalizer::normalize_candidates;
use crate::tier::Tier;
use crate::types::{LocatorSet, SelectorCandidate};
use tracing::debug;

/// Rank an already normalized candidate list.
///
/// Icon candidates are set aside. The remaining pool is stably sorted by
/// tier, so equal tiers keep their recorded order.
pub fn rank_candidates<S: AsRef<str>>(normalized: &[S]) -> Result<LocatorSet, LocatorError> {
    if normalized.is_empty() {
        return Err(LocatorError::EmptyCandidates);
    }

    let (mut pool, excluded): (Vec<_>, Vec<_>) = normalized
        .iter()
        .enumerate()
        .map(|(position, selector)| {
            let selector: &str = selector.as_ref();
            SelectorCandidate::new(selector, position)
        })
        .partition(|candidate| candidate.tier.is_rankable());

    for icon in &excluded {
        debug!(selector = %icon.selector, "Excluding icon selector from locator pool");
    }

    if pool.is_empty() {
        return Err(LocatorError::OnlyIconCandidates {
            count: excluded.len(),
            selectors: excluded
                .iter()
                .map(|c| c.selector.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    pool.sort_by_key(SelectorCandidate::rank_key);
    let mut ranked = pool.into_iter();
    let primary = ranked.next().ok_or(LocatorError::EmptyCandidates)?;

    debug!(
        selector = %primary.selector,
        tier = %primary.tier,
        fallbacks = ranked.len(),
        "Selected primary locator"
    );

    Ok(LocatorSet {
        primary,
        fallbacks: ranked.collect(),
        excluded,
    })
}

/// Normalize a raw recording and rank it in one step
pub fn build_locator_set<S: AsRef<str>>(raw: Option<&[S]>) -> Result<LocatorSet, LocatorError> {
    let normalized = normalize_candidates(raw)?;
    rank_candidates(&normalized)
}

/// Tiers of the walk order, useful for diagnostics
pub fn walk_tiers(set: &LocatorSet) -> Vec<Tier> {
    set.candidates().map(|c| c.tier).collect()
}
