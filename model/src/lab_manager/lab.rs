use super::ClusterApi;
use crate::constants::{
    DEFAULT_RUNNER_IMAGE, KUBECTL, MINIKUBE, MONITORING_NAMESPACE, MONITORING_REPO_NAME,
    MONITORING_REPO_URL, REQUIRED_TOOLS, RUNNER_NAMESPACE,
};
use crate::error::{self, Result};
use crate::helm::Helm;
use crate::minikube::{ClusterProfile, Minikube, ProfileState};
use crate::system::{
    controller_release, github_app_secret, metrics_endpoint, metrics_reader_cluster_role,
    metrics_reader_cluster_role_binding, monitoring_release, runner_set_release, RunnerSetValues,
};
use crate::tools::{check_dependencies, run_checked, CommandRunner, Invocation};
use crate::{Credentials, RunnerVariant};
use log::info;
use snafu::ResultExt;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// The knobs of a lab that are not credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabSettings {
    pub profile: ClusterProfile,
    /// Install the metrics stack and the RBAC objects that go with it.
    pub monitoring: bool,
    /// Applied verbatim with `kubectl apply` instead of the built-in metrics reader role.
    pub rbac_manifest: Option<PathBuf>,
    pub runner_image: String,
}

impl Default for LabSettings {
    fn default() -> Self {
        Self {
            profile: ClusterProfile::default(),
            monitoring: false,
            rbac_manifest: None,
            runner_image: DEFAULT_RUNNER_IMAGE.to_string(),
        }
    }
}

/// Sequences the `setup` steps. Holding validated [`Credentials`] is a precondition for building
/// a `Lab`, so nothing here runs before the credentials have been checked.
///
/// `setup` is split in two because the Kubernetes client can only be built once the cluster
/// exists: [`Lab::provision`] only uses command line tools, [`Lab::deploy`] additionally needs a
/// [`ClusterApi`].
pub struct Lab<'a> {
    runner: &'a dyn CommandRunner,
    settings: LabSettings,
    credentials: Credentials,
}

impl<'a> Lab<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        settings: LabSettings,
        credentials: Credentials,
    ) -> Self {
        Self {
            runner,
            settings,
            credentials,
        }
    }

    pub fn settings(&self) -> &LabSettings {
        &self.settings
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn check_dependencies(&self) -> Result<()> {
        check_dependencies(self.runner, &REQUIRED_TOOLS)
    }

    /// Start or reuse the minikube profile and load the sidecar image into it if there is one.
    pub async fn provision(&self) -> Result<ProfileState> {
        let minikube = Minikube::new(self.runner, &self.settings.profile);
        let state = minikube.ensure_cluster().await?;
        match self.credentials.variant() {
            RunnerVariant::WithSidecar { image } => minikube.load_image(image).await?,
            RunnerVariant::WithoutSidecar => {
                info!("No sidecar image configured, skipping image load")
            }
        }
        Ok(state)
    }

    /// Install the charts and objects into the provisioned cluster.
    pub async fn deploy(&self, cluster: &dyn ClusterApi) -> Result<()> {
        let helm = Helm::new(self.runner);
        if self.settings.monitoring {
            self.install_monitoring(&helm, cluster).await?;
        }

        helm.upgrade_install(&controller_release()).await?;

        cluster.ensure_namespace(RUNNER_NAMESPACE).await?;
        cluster
            .replace_secret(github_app_secret(&self.credentials))
            .await?;

        if self.settings.monitoring {
            self.apply_rbac(cluster).await?;
        }

        let values = self.runner_set_values();
        // Kept alive until helm has read it.
        let values_file = write_values(&values)?;
        helm.upgrade_install(&runner_set_release(values_file.path())).await?;
        info!(
            "Runner scale set installed with {} container(s) per runner pod",
            values
                .template
                .spec
                .as_ref()
                .map(|spec| spec.containers.len())
                .unwrap_or_default()
        );
        Ok(())
    }

    /// The values `deploy` hands to the runner scale-set chart.
    pub fn runner_set_values(&self) -> RunnerSetValues {
        RunnerSetValues::new(
            &self.credentials,
            &self.settings.runner_image,
            metrics_endpoint(),
        )
    }

    async fn install_monitoring(&self, helm: &Helm<'_>, cluster: &dyn ClusterApi) -> Result<()> {
        helm.repo_add(MONITORING_REPO_NAME, MONITORING_REPO_URL).await?;
        helm.repo_update().await?;
        cluster.ensure_namespace(MONITORING_NAMESPACE).await?;
        helm.upgrade_install(&monitoring_release()).await?;
        info!("Metrics endpoint available at '{}'", metrics_endpoint());
        Ok(())
    }

    async fn apply_rbac(&self, cluster: &dyn ClusterApi) -> Result<()> {
        match &self.settings.rbac_manifest {
            Some(manifest) => {
                info!("Applying RBAC manifest '{}'", manifest.display());
                run_checked(
                    self.runner,
                    Invocation::new(KUBECTL)
                        .args(["apply", "-f"])
                        .arg(manifest.display().to_string()),
                )
                .await?;
            }
            None => {
                cluster
                    .apply_cluster_role(
                        metrics_reader_cluster_role(),
                        metrics_reader_cluster_role_binding(),
                    )
                    .await?
            }
        }
        Ok(())
    }
}

/// Delete the minikube profile. Whether it exists is left to minikube.
pub async fn cleanup(runner: &dyn CommandRunner, profile: &ClusterProfile) -> Result<()> {
    check_dependencies(runner, &[MINIKUBE])?;
    Minikube::new(runner, profile).delete().await
}

fn write_values(values: &RunnerSetValues) -> Result<NamedTempFile> {
    let yaml = values.to_yaml()?;
    let mut file = tempfile::Builder::new()
        .prefix("arc-runner-set-")
        .suffix(".yaml")
        .tempfile()
        .context(error::ValuesFileSnafu)?;
    file.write_all(yaml.as_bytes()).context(error::ValuesFileSnafu)?;
    file.flush().context(error::ValuesFileSnafu)?;
    Ok(file)
}
