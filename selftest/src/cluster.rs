use crate::test_settings::TestSettings;
use anyhow::{format_err, Result};
use k8s_openapi::api::core::v1::{Pod, Secret};
use kube::{
    api::ListParams,
    config::{KubeConfigOptions, Kubeconfig},
    Api, Client, Config,
};
use std::convert::TryInto;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use tokio::time::{sleep, Duration, Instant};

pub const KUBECONFIG_FILENAME: &str = "kubeconfig.yaml";

/// Represents a `minikube` profile. The `Drop` trait is implemented deleting the profile when it
/// goes out of scope.
#[derive(Debug)]
pub struct Cluster {
    profile: String,
    kubeconfig_dir: TempDir,
}

impl Cluster {
    /// Creates a `Cluster` while starting a minikube profile. If a profile named `profile`
    /// already exists, it will be deleted first.
    pub fn new(profile: &str) -> Result<Cluster> {
        let kubeconfig_dir = TempDir::new()?;
        let kubeconfig = kubeconfig_dir.path().join(KUBECONFIG_FILENAME);
        Self::delete_profile(profile, &kubeconfig)?;
        Self::create_profile(profile, &kubeconfig)?;
        Ok(Self {
            profile: profile.into(),
            kubeconfig_dir,
        })
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Returns the path to the kubeconfig file in the `TempDir` created for the cluster. minikube
    /// writes the profile's context here and keeps it current.
    pub fn kubeconfig(&self) -> PathBuf {
        self.kubeconfig_dir.path().join(KUBECONFIG_FILENAME)
    }

    /// Returns `true` if minikube still knows about the profile.
    pub fn profile_exists(&self) -> Result<bool> {
        let output = Self::minikube(&self.kubeconfig())
            .args(["profile", "list", "-o", "json"])
            .output()?;
        Ok(output.status.success()
            && String::from_utf8_lossy(&output.stdout)
                .contains(&format!("\"Name\":\"{}\"", self.profile)))
    }

    /// Create the k8s client for the cluster.
    pub async fn k8s_client(&self) -> Result<Client> {
        let kubeconfig = Kubeconfig::read_from(self.kubeconfig())?;
        let config =
            Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;
        Ok(config.try_into()?)
    }

    /// The keys of the secret `name` in `namespace`, or `None` if there is no such secret.
    pub async fn secret_keys(&self, namespace: &str, name: &str) -> Result<Option<Vec<String>>> {
        let api: Api<Secret> = Api::namespaced(self.k8s_client().await?, namespace);
        Ok(api.get_opt(name).await?.map(|secret| {
            secret
                .data
                .unwrap_or_default()
                .into_keys()
                .collect::<Vec<_>>()
        }))
    }

    /// The number of secrets in `namespace` whose name is `name`.
    pub async fn secret_count(&self, namespace: &str, name: &str) -> Result<usize> {
        let api: Api<Secret> = Api::namespaced(self.k8s_client().await?, namespace);
        let secrets = api
            .list(&ListParams {
                field_selector: Some(format!("metadata.name={}", name)),
                ..Default::default()
            })
            .await?;
        Ok(secrets.items.len())
    }

    /// Returns `true` if a pod in `namespace` matching `label_selector` is running.
    pub async fn is_pod_running(&self, namespace: &str, label_selector: &str) -> Result<bool> {
        let pod_api = Api::<Pod>::namespaced(self.k8s_client().await?, namespace);
        let pods = pod_api
            .list(&ListParams {
                label_selector: Some(label_selector.to_string()),
                ..Default::default()
            })
            .await?;
        Ok(pods.into_iter().any(|pod| {
            pod.status
                .unwrap_or_default()
                .phase
                .unwrap_or_default()
                == "Running"
        }))
    }

    /// Waits until a pod in `namespace` matching `label_selector` is running.
    pub async fn wait_for_pod(
        &self,
        namespace: &str,
        label_selector: &str,
        timeout: Duration,
    ) -> Result<()> {
        let start = Instant::now();
        while !self.is_pod_running(namespace, label_selector).await? {
            if start.elapsed() > timeout {
                return Err(format_err!(
                    "no pod matching '{}' in '{}' was running after {:?}",
                    label_selector,
                    namespace,
                    timeout
                ));
            }
            sleep(Duration::from_secs(2)).await;
        }
        Ok(())
    }

    fn minikube(kubeconfig: &Path) -> Command {
        let mut command = Command::new(TestSettings::minikube_path());
        command.env("KUBECONFIG", kubeconfig);
        command
    }

    fn create_profile(name: &str, kubeconfig: &Path) -> Result<()> {
        let output = Self::minikube(kubeconfig)
            .args(["start", "-p", name, "--driver", TestSettings::driver()])
            .output()?;
        check(output, "minikube start")
    }

    fn delete_profile(name: &str, kubeconfig: &Path) -> Result<()> {
        let output = Self::minikube(kubeconfig)
            .args(["delete", "-p", name])
            .output()?;
        check(output, "minikube delete")
    }
}

fn check(output: Output, what: &str) -> Result<()> {
    if !output.status.success() {
        return Err(format_err!(
            "'{}' failed with exit status '{}'\n\n{}\n\n{}",
            what,
            output.status.code().unwrap_or(1),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        ));
    }
    Ok(())
}

impl Drop for Cluster {
    fn drop(&mut self) {
        if let Err(e) = Self::delete_profile(&self.profile, &self.kubeconfig()) {
            eprintln!("unable to delete minikube profile '{}': {}", self.profile, e)
        }
    }
}
