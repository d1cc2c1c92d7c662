use crate::constants::{CLUSTER_CPUS, CLUSTER_DRIVER, CLUSTER_MEMORY, MINIKUBE, PROFILE};
use crate::error::{self, Result};
use crate::tools::{run_checked, CommandRunner, Invocation};
use log::{debug, info};
use serde::Deserialize;
use snafu::ResultExt;

/// The minikube profile `arc-lab` runs in, and the resources it is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterProfile {
    pub name: String,
    pub cpus: u32,
    /// Memory in the form minikube accepts for `--memory`, e.g. `8192` or `8g`.
    pub memory: String,
    pub driver: String,
}

impl Default for ClusterProfile {
    fn default() -> Self {
        Self {
            name: PROFILE.to_string(),
            cpus: CLUSTER_CPUS,
            memory: CLUSTER_MEMORY.to_string(),
            driver: CLUSTER_DRIVER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileState {
    Absent,
    Running,
    Stopped,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileList {
    #[serde(default)]
    valid: Vec<ProfileEntry>,
    #[serde(default)]
    invalid: Vec<ProfileEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProfileEntry {
    name: String,
    #[serde(default)]
    status: String,
}

/// Drives the `minikube` binary for a single profile.
pub struct Minikube<'a> {
    runner: &'a dyn CommandRunner,
    profile: &'a ClusterProfile,
}

impl<'a> Minikube<'a> {
    pub fn new(runner: &'a dyn CommandRunner, profile: &'a ClusterProfile) -> Self {
        Self { runner, profile }
    }

    pub async fn state(&self) -> Result<ProfileState> {
        let invocation = Invocation::new(MINIKUBE).args(["profile", "list", "-o", "json"]);
        let output = self.runner.run(&invocation).await?;
        // minikube exits non-zero when there are no profiles at all.
        if !output.success() {
            debug!(
                "'{}' exited with {:?}, treating profile '{}' as absent",
                invocation, output.code, self.profile.name
            );
            return Ok(ProfileState::Absent);
        }
        parse_profile_state(&output.stdout, &self.profile.name)
    }

    /// Start the profile unless it is already running, then make it the active profile. Returns
    /// the state the profile was found in.
    pub async fn ensure_cluster(&self) -> Result<ProfileState> {
        let state = self.state().await?;
        match state {
            ProfileState::Running => {
                info!("Reusing running minikube profile '{}'", self.profile.name)
            }
            ProfileState::Stopped => {
                info!("Resuming stopped minikube profile '{}'", self.profile.name);
                run_checked(
                    self.runner,
                    Invocation::new(MINIKUBE).args(["start", "-p", self.profile.name.as_str()]),
                )
                .await?;
            }
            ProfileState::Absent => {
                info!(
                    "Creating minikube profile '{}' ({} cpus, {} memory, {} driver)",
                    self.profile.name, self.profile.cpus, self.profile.memory, self.profile.driver
                );
                run_checked(self.runner, self.start_invocation()).await?;
            }
        }
        run_checked(
            self.runner,
            Invocation::new(MINIKUBE).args(["profile", self.profile.name.as_str()]),
        )
        .await?;
        Ok(state)
    }

    /// Push a locally built image into the cluster's image cache.
    pub async fn load_image(&self, image: &str) -> Result<()> {
        info!("Loading image '{}' into profile '{}'", image, self.profile.name);
        run_checked(
            self.runner,
            Invocation::new(MINIKUBE)
                .args(["-p", self.profile.name.as_str()])
                .args(["image", "load", image]),
        )
        .await?;
        Ok(())
    }

    pub async fn delete(&self) -> Result<()> {
        info!("Deleting minikube profile '{}'", self.profile.name);
        run_checked(
            self.runner,
            Invocation::new(MINIKUBE).args(["delete", "-p", self.profile.name.as_str()]),
        )
        .await?;
        Ok(())
    }

    fn start_invocation(&self) -> Invocation {
        Invocation::new(MINIKUBE)
            .args(["start", "-p", self.profile.name.as_str()])
            .arg("--cpus")
            .arg(self.profile.cpus.to_string())
            .arg("--memory")
            .arg(&self.profile.memory)
            .arg("--driver")
            .arg(&self.profile.driver)
    }
}

fn parse_profile_state(json: &str, name: &str) -> Result<ProfileState> {
    let list: ProfileList = serde_json::from_str(json).context(error::ProfileParseSnafu)?;
    if let Some(entry) = list.valid.iter().find(|entry| entry.name == name) {
        return Ok(match entry.status.as_str() {
            // Newer minikube releases report a healthy profile as "OK".
            "Running" | "OK" => ProfileState::Running,
            _ => ProfileState::Stopped,
        });
    }
    if list.invalid.iter().any(|entry| entry.name == name) {
        return Ok(ProfileState::Stopped);
    }
    Ok(ProfileState::Absent)
}
