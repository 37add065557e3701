//! Candidate normalization
//!
//! Trims every recorded selector, drops the empty ones and removes exact
//! duplicates while keeping the first occurrence in place.

use crate::errors::LocatorError;
use std::collections::HashSet;

/// Normalize a raw candidate list.
///
/// `None` means the recording carried no candidate list at all, which is a
/// configuration error. An all-blank list normalizes to an empty vector; the
/// ranker decides what an empty pool means.
pub fn normalize_candidates<S: AsRef<str>>(raw: Option<&[S]>) -> Result<Vec<String>, LocatorError> {
    let raw = raw.ok_or(LocatorError::MissingCandidates)?;

    let mut seen = HashSet::with_capacity(raw.len());
    let mut normalized = Vec::with_capacity(raw.len());

    for candidate in raw {
        let candidate: &str = candidate.as_ref();
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed) {
            normalized.push(trimmed.to_string());
        }
    }

    Ok(normalized)
}
