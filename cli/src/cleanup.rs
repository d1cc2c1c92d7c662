use anyhow::{Context, Result};
use arc_lab_model::constants::PROFILE;
use arc_lab_model::tools::ProcessRunner;
use arc_lab_model::{cleanup, ClusterProfile};
use clap::Parser;
use std::path::PathBuf;

/// The cleanup subcommand deletes the minikube profile and everything installed in it.
#[derive(Debug, Parser)]
pub(crate) struct Cleanup {
    /// Name of the minikube profile.
    #[clap(long = "profile", default_value = PROFILE)]
    profile: String,
}

impl Cleanup {
    pub(crate) async fn run(self, kubeconfig: Option<PathBuf>) -> Result<()> {
        let profile = ClusterProfile {
            name: self.profile,
            ..Default::default()
        };
        cleanup(&ProcessRunner::new(kubeconfig), &profile)
            .await
            .context(format!(
                "Unable to delete minikube profile '{}'",
                profile.name
            ))?;

        println!("minikube profile '{}' was deleted.", profile.name);

        Ok(())
    }
}
