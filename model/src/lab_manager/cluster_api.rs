use crate::Result;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};

/// The Kubernetes object operations `setup` performs directly, as opposed to through Helm.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Create the namespace `name` if it does not exist yet.
    async fn ensure_namespace(&self, name: &str) -> Result<()>;

    /// Delete any secret with the same name and namespace as `secret`, then create `secret`.
    /// Returns `true` when an existing secret was replaced.
    async fn replace_secret(&self, secret: Secret) -> Result<bool>;

    /// Create or update a cluster role and its binding.
    async fn apply_cluster_role(&self, role: ClusterRole, binding: ClusterRoleBinding)
        -> Result<()>;
}
