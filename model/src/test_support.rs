//! In-memory stand-ins for the two seams, shared by the unit tests.

use crate::lab_manager::ClusterApi;
use crate::tools::{CommandOutput, CommandRunner, Invocation};
use crate::Result;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use kube::ResourceExt;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

type Journal = Arc<Mutex<Vec<String>>>;

/// Records every invocation in a journal and answers with canned output. Invocations without a
/// canned answer succeed with empty output.
#[derive(Default)]
pub(crate) struct RecordingRunner {
    missing: HashSet<String>,
    responses: Vec<(String, CommandOutput)>,
    journal: Journal,
}

impl RecordingRunner {
    pub(crate) fn without_tool(mut self, tool: &str) -> Self {
        self.missing.insert(tool.to_string());
        self
    }

    /// Answer any invocation whose command line starts with `prefix` with `output`.
    pub(crate) fn respond(mut self, prefix: &str, output: CommandOutput) -> Self {
        self.responses.push((prefix.to_string(), output));
        self
    }

    pub(crate) fn respond_stdout(self, prefix: &str, stdout: &str) -> Self {
        self.respond(
            prefix,
            CommandOutput {
                code: Some(0),
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        )
    }

    /// Everything recorded so far, including events from a [`RecordingCluster`] sharing the
    /// journal.
    pub(crate) fn journal(&self) -> Vec<String> {
        self.journal.lock().unwrap().clone()
    }

    /// Only the command lines that start with `program`.
    pub(crate) fn calls_to(&self, program: &str) -> Vec<String> {
        self.journal()
            .into_iter()
            .filter(|entry| entry.starts_with(&format!("{} ", program)))
            .collect()
    }

    pub(crate) fn cluster(&self) -> RecordingCluster {
        RecordingCluster {
            journal: Arc::clone(&self.journal),
            secrets: Default::default(),
        }
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        if self.missing.contains(program) {
            None
        } else {
            Some(PathBuf::from("/usr/local/bin").join(program))
        }
    }

    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let line = invocation.to_string();
        self.journal.lock().unwrap().push(line.clone());
        Ok(self
            .responses
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or(CommandOutput {
                code: Some(0),
                ..Default::default()
            }))
    }
}

/// Keeps secrets in a map and journals each object operation as `k8s <what> <name>`.
pub(crate) struct RecordingCluster {
    journal: Journal,
    secrets: Mutex<BTreeMap<String, Secret>>,
}

impl RecordingCluster {
    pub(crate) fn secrets(&self) -> BTreeMap<String, Secret> {
        self.secrets.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.journal.lock().unwrap().push(entry)
    }
}

#[async_trait]
impl ClusterApi for RecordingCluster {
    async fn ensure_namespace(&self, name: &str) -> Result<()> {
        self.record(format!("k8s namespace {}", name));
        Ok(())
    }

    async fn replace_secret(&self, secret: Secret) -> Result<bool> {
        let key = format!(
            "{}/{}",
            secret.namespace().unwrap_or_default(),
            secret.name_any()
        );
        self.record(format!("k8s secret {}", key));
        Ok(self.secrets.lock().unwrap().insert(key, secret).is_some())
    }

    async fn apply_cluster_role(
        &self,
        role: ClusterRole,
        binding: ClusterRoleBinding,
    ) -> Result<()> {
        self.record(format!(
            "k8s rbac {} {}",
            role.name_any(),
            binding.name_any()
        ));
        Ok(())
    }
}
