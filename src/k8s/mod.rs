/// Kubernetes cluster operations
pub mod applier;

pub use applier::{check_apply, ClusterApplier, KubectlApplier};
