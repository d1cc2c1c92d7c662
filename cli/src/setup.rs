use anyhow::{Context, Result};
use arc_lab_model::constants::{
    CLUSTER_CPUS, CLUSTER_DRIVER, CLUSTER_MEMORY, DEFAULT_RUNNER_IMAGE, PROFILE,
};
use arc_lab_model::tools::ProcessRunner;
use arc_lab_model::{ClusterProfile, Credentials, Lab, LabManager, LabSettings, ProfileState};
use clap::Parser;
use log::info;
use std::path::PathBuf;

/// The setup subcommand brings the lab up. Running it again reuses the cluster and refreshes
/// everything installed into it.
#[derive(Debug, Parser)]
pub(crate) struct Setup {
    /// Install the metrics stack and grant it read access to the cluster.
    #[clap(long = "with-monitoring")]
    with_monitoring: bool,

    /// Apply this manifest with `kubectl` instead of the built-in metrics reader role. Only used
    /// together with `--with-monitoring`, ignored otherwise.
    #[clap(long = "rbac-manifest")]
    rbac_manifest: Option<PathBuf>,

    /// Image for the runner container.
    #[clap(long = "runner-image", default_value = DEFAULT_RUNNER_IMAGE)]
    runner_image: String,

    /// Name of the minikube profile.
    #[clap(long = "profile", default_value = PROFILE)]
    profile: String,

    /// CPUs for a newly created profile.
    #[clap(long = "cpus", default_value_t = CLUSTER_CPUS)]
    cpus: u32,

    /// Memory for a newly created profile, in any form minikube accepts.
    #[clap(long = "memory", default_value = CLUSTER_MEMORY)]
    memory: String,

    /// minikube driver for a newly created profile.
    #[clap(long = "driver", default_value = CLUSTER_DRIVER)]
    driver: String,
}

impl Setup {
    pub(crate) async fn run(
        self,
        credentials: Credentials,
        kubeconfig: Option<PathBuf>,
    ) -> Result<()> {
        let runner = ProcessRunner::new(kubeconfig);
        let lab = Lab::new(&runner, self.settings(), credentials);
        lab.check_dependencies()
            .context("Missing a tool required by setup")?;

        let state = lab
            .provision()
            .await
            .context("Unable to provision the minikube cluster")?;
        if state == ProfileState::Absent {
            info!("Created minikube profile '{}'", lab.settings().profile.name);
        }

        // minikube wrote the profile's context into the same kubeconfig helm and kubectl use.
        let client = match runner.kubeconfig() {
            Some(path) => LabManager::new_from_kubeconfig_path(path)
                .await
                .context(format!(
                    "Unable to create Kubernetes client from path '{}'",
                    path.display()
                ))?,
            None => LabManager::new()
                .await
                .context("Unable to create default Kubernetes client")?,
        };
        lab.deploy(&client).await.context(
            "Unable to install Actions Runner Controller. (Some artifacts may be left behind)",
        )?;

        println!(
            "Actions Runner Controller lab is ready in minikube profile '{}'.",
            lab.settings().profile.name
        );
        Ok(())
    }

    fn settings(self) -> LabSettings {
        LabSettings {
            profile: ClusterProfile {
                name: self.profile,
                cpus: self.cpus,
                memory: self.memory,
                driver: self.driver,
            },
            monitoring: self.with_monitoring,
            rbac_manifest: self.rbac_manifest,
            runner_image: self.runner_image,
        }
    }
}
