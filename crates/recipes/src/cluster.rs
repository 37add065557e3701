use std::ops::Range;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::errors::RecResult;
use crate::policy::RecPolicyView;
use crate::signature::{signatures_of, ActionSignature};
use action_primitives::UiAction;

pub type SignatureRun = SmallVec<[ActionSignature; 8]>;

/// One flagged run of actions. Runs sharing a `group` repeat the same
/// signature sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub group: usize,
    pub start: usize,
    pub end: usize,
    pub signature: SignatureRun,
}

impl Cluster {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Finds repeated action runs worth extracting into reusable procedures.
#[derive(Clone, Debug)]
pub struct ClusterDetector {
    min_len: usize,
    enabled: bool,
}

impl Default for ClusterDetector {
    fn default() -> Self {
        let policy = RecPolicyView::default();
        Self {
            min_len: policy.min_cluster_len,
            enabled: policy.enabled,
        }
    }
}

impl ClusterDetector {
    pub fn new(policy: &RecPolicyView) -> RecResult<Self> {
        policy.validate()?;
        Ok(Self {
            min_len: policy.min_cluster_len,
            enabled: policy.enabled,
        })
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn detect_actions(&self, actions: &[UiAction]) -> Vec<Cluster> {
        self.detect(&signatures_of(actions))
    }

    /// Longest windows are tried first, then earliest start. A window is
    /// accepted when its run recurs later without touching anything already
    /// flagged; every such recurrence joins the same group.
    pub fn detect(&self, signatures: &[ActionSignature]) -> Vec<Cluster> {
        let n = signatures.len();
        let mut taken = vec![false; n];
        let mut clusters = Vec::new();
        let mut group = 0;

        if !self.enabled || n < self.min_len * 2 {
            return clusters;
        }

        for k in (self.min_len..=n / 2).rev() {
            for i in 0..=n - k {
                if taken[i..i + k].iter().any(|t| *t) {
                    continue;
                }

                let pattern = &signatures[i..i + k];
                let mut starts = vec![i];
                let mut j = i + k;
                while j + k <= n {
                    let free = !taken[j..j + k].iter().any(|t| *t);
                    if free && &signatures[j..j + k] == pattern {
                        starts.push(j);
                        j += k;
                    } else {
                        j += 1;
                    }
                }

                if starts.len() < 2 {
                    continue;
                }

                debug!(
                    group = group,
                    len = k,
                    occurrences = starts.len(),
                    "Flagged repeated action run"
                );

                for &start in &starts {
                    taken[start..start + k].iter_mut().for_each(|t| *t = true);
                    clusters.push(Cluster {
                        group,
                        start,
                        end: start + k,
                        signature: pattern.iter().copied().collect(),
                    });
                }
                group += 1;
            }
        }

        clusters.sort_by_key(|c| c.start);
        clusters
    }
}

pub fn flagged_ranges(clusters: &[Cluster]) -> Vec<Range<usize>> {
    clusters.iter().map(Cluster::range).collect()
}
