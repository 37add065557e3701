use serde::{Deserialize, Serialize};

use crate::errors::{RecError, RecErrorKind, RecResult};

/// Shortest run of actions that can form a cluster.
pub const MIN_CLUSTER_LEN: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecPolicyView {
    pub enabled: bool,
    pub min_cluster_len: usize,
}

impl Default for RecPolicyView {
    fn default() -> Self {
        Self {
            enabled: true,
            min_cluster_len: MIN_CLUSTER_LEN,
        }
    }
}

impl RecPolicyView {
    pub fn validate(&self) -> RecResult<()> {
        if self.min_cluster_len < MIN_CLUSTER_LEN {
            return Err(RecError::new(RecErrorKind::InvalidPolicy(format!(
                "min_cluster_len must be at least {}, got {}",
                MIN_CLUSTER_LEN, self.min_cluster_len
            ))));
        }
        Ok(())
    }
}
