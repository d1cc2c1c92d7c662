use super::manager_impl::settle;
use super::ClusterApi;
use crate::error::{self, Result};
use crate::system::lab_namespace;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Namespace, Secret};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use kube::api::{DeleteParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config, ResourceExt};
use log::{info, warn};
use snafu::{ensure, ResultExt};
use std::path::Path;
use std::time::Duration;

/// # Lab Manager
///
/// The lab manager performs the Kubernetes object operations of `setup` against a live cluster:
/// namespaces, the GitHub App secret and the metrics RBAC objects. Charts are installed through
/// Helm instead, see [`crate::helm::Helm`].
pub struct LabManager {
    pub k8s_client: Client,
}

impl LabManager {
    /// Polls made while waiting for a namespace to appear or a secret to disappear.
    const SETTLE_POLLS: u32 = 100;
    const SETTLE_INTERVAL: Duration = Duration::from_millis(100);

    /// Create a `LabManager` from the path to a kubeconfig file.
    pub async fn new_from_kubeconfig_path(kubeconfig_path: &Path) -> Result<Self> {
        let kubeconfig = Kubeconfig::read_from(kubeconfig_path).context(error::ConfigReadSnafu)?;
        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .context(error::ClientCreateKubeconfigSnafu)?;
        Ok(LabManager {
            k8s_client: config.try_into().context(error::KubeSnafu {
                action: "create client from `Kubeconfig`",
            })?,
        })
    }

    /// Create a `LabManager` using the default `kube::Client`. minikube makes its profile the
    /// current context, so this targets the lab cluster once the profile is selected.
    pub async fn new() -> Result<Self> {
        Ok(LabManager {
            k8s_client: Client::try_default().await.context(error::KubeSnafu {
                action: "create client from `Kubeconfig`",
            })?,
        })
    }
}

#[async_trait]
impl ClusterApi for LabManager {
    async fn ensure_namespace(&self, name: &str) -> Result<()> {
        self.create_or_update(&self.api::<Namespace>(), &lab_namespace(name), "namespace")
            .await?;

        // Give the object enough time to settle.
        let api = self.api::<Namespace>();
        let api_ref = &api;
        settle(Self::SETTLE_POLLS, Self::SETTLE_INTERVAL, move || async move {
            api_ref.get(name).await.is_ok()
        })
        .await;

        api.get(name)
            .await
            .context(error::CreateSnafu { what: "namespace" })?;
        info!("Namespace '{}' is present", name);
        Ok(())
    }

    async fn replace_secret(&self, secret: Secret) -> Result<bool> {
        let namespace = secret.namespace().unwrap_or_default();
        let name = secret.name_any();
        let api: Api<Secret> = self.namespaced_api(&namespace);

        let replaced = match api.delete(&name, &DeleteParams::default()).await {
            Ok(_) => true,
            Err(e) if is_not_found(&e) => false,
            Err(e) => {
                return Err(e).context(error::KubeSnafu {
                    action: format!("delete secret '{}/{}'", namespace, name),
                })
            }
        };
        if replaced {
            warn!(
                "Replacing existing secret '{}/{}' with the current credentials",
                namespace, name
            );
            let (api_ref, name_ref) = (&api, name.as_str());
            let gone = settle(Self::SETTLE_POLLS, Self::SETTLE_INTERVAL, move || async move {
                matches!(api_ref.get_opt(name_ref).await, Ok(None))
            })
            .await;
            ensure!(
                gone,
                error::SecretTerminatingSnafu {
                    name: format!("{}/{}", namespace, name),
                    waited: Self::SETTLE_INTERVAL * Self::SETTLE_POLLS,
                }
            );
        }

        api.create(&PostParams::default(), &secret)
            .await
            .context(error::CreateSnafu {
                what: format!("secret '{}/{}'", namespace, name),
            })?;
        info!("Created secret '{}/{}'", namespace, name);
        Ok(replaced)
    }

    async fn apply_cluster_role(
        &self,
        role: ClusterRole,
        binding: ClusterRoleBinding,
    ) -> Result<()> {
        self.create_or_update(&self.api(), &role, "Metrics Reader Cluster Role")
            .await?;
        self.create_or_update(&self.api(), &binding, "Metrics Reader Cluster Role Binding")
            .await?;
        info!(
            "Applied cluster role '{}' and binding '{}'",
            role.name_any(),
            binding.name_any()
        );
        Ok(())
    }
}

fn is_not_found(e: &kube::Error) -> bool {
    matches!(e, kube::Error::Api(response) if response.code == 404)
}
