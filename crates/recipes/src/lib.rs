pub mod cluster;
pub mod errors;
pub mod policy;
pub mod signature;

pub use cluster::{flagged_ranges, Cluster, ClusterDetector, SignatureRun};
pub use errors::{RecError, RecErrorKind, RecResult};
pub use policy::{RecPolicyView, MIN_CLUSTER_LEN};
pub use signature::{signatures_of, ActionSignature};
