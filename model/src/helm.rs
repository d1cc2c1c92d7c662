use crate::constants::HELM;
use crate::error::Result;
use crate::tools::{failed, run_checked, CommandRunner, Invocation};
use log::info;
use snafu::ensure;
use std::path::{Path, PathBuf};

/// A Helm release to install or upgrade. Every release is installed with `--wait`, so
/// [`Helm::upgrade_install`] returns once Helm reports the release ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub name: String,
    pub chart: String,
    pub namespace: String,
    pub create_namespace: bool,
    pub values_file: Option<PathBuf>,
    pub set: Vec<(String, String)>,
}

impl Release {
    pub fn new<S1, S2, S3>(name: S1, chart: S2, namespace: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self {
            name: name.into(),
            chart: chart.into(),
            namespace: namespace.into(),
            create_namespace: false,
            values_file: None,
            set: Vec::new(),
        }
    }

    pub fn create_namespace(mut self) -> Self {
        self.create_namespace = true;
        self
    }

    pub fn values_file(mut self, path: &Path) -> Self {
        self.values_file = Some(path.to_path_buf());
        self
    }

    pub fn set<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set.push((key.into(), value.into()));
        self
    }

    pub fn upgrade_invocation(&self) -> Invocation {
        let mut invocation = Invocation::new(HELM)
            .args(["upgrade", "--install"])
            .arg(&self.name)
            .arg(&self.chart)
            .arg("--namespace")
            .arg(&self.namespace);
        if self.create_namespace {
            invocation = invocation.arg("--create-namespace");
        }
        if let Some(values_file) = &self.values_file {
            invocation = invocation.arg("-f").arg(values_file.display().to_string());
        }
        for (key, value) in &self.set {
            invocation = invocation.arg("--set").arg(format!("{}={}", key, value));
        }
        invocation.arg("--wait")
    }
}

/// Drives the `helm` binary.
pub struct Helm<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> Helm<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Register a chart repository. A repository that is already registered is not an error.
    pub async fn repo_add(&self, name: &str, url: &str) -> Result<()> {
        let invocation = Invocation::new(HELM).args(["repo", "add", name, url]);
        let output = self.runner.run(&invocation).await?;
        if !output.success() {
            ensure!(
                output.stderr.contains("already exists")
                    || output.stdout.contains("already exists"),
                failed(&invocation, &output)
            );
            info!("Helm repository '{}' already exists", name);
        }
        Ok(())
    }

    pub async fn repo_update(&self) -> Result<()> {
        run_checked(self.runner, Invocation::new(HELM).args(["repo", "update"])).await?;
        Ok(())
    }

    pub async fn upgrade_install(&self, release: &Release) -> Result<()> {
        info!(
            "Installing release '{}' from '{}' into namespace '{}'",
            release.name, release.chart, release.namespace
        );
        run_checked(self.runner, release.upgrade_invocation()).await?;
        Ok(())
    }
}
