use super::{CommandOutput, CommandRunner, Invocation};
use crate::error::{self, Result};
use async_trait::async_trait;
use log::debug;
use snafu::ResultExt;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Runs commands as child processes, capturing their output.
///
/// With a kubeconfig every child gets `KUBECONFIG` pointing at it, so `minikube`, `helm` and
/// `kubectl` act on the same cluster as a [`crate::LabManager`] built from that file.
#[derive(Debug, Default, Clone)]
pub struct ProcessRunner {
    kubeconfig: Option<PathBuf>,
}

impl ProcessRunner {
    pub fn new(kubeconfig: Option<PathBuf>) -> Self {
        Self { kubeconfig }
    }

    pub fn kubeconfig(&self) -> Option<&Path> {
        self.kubeconfig.as_deref()
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        debug!("Running '{}'", invocation);
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(kubeconfig) = &self.kubeconfig {
            command.env("KUBECONFIG", kubeconfig);
        }
        let output = command
            .output()
            .await
            .context(error::CommandSpawnSnafu {
                command: invocation.to_string(),
            })?;
        let output = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            "'{}' exited with {:?}\n{}{}",
            invocation.program, output.code, output.stdout, output.stderr
        );
        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod test {
    use super::*;

    fn echo_kubeconfig() -> Invocation {
        Invocation::new("sh").args(["-c", "printf %s \"${KUBECONFIG:-unset}\""])
    }

    #[tokio::test]
    async fn kubeconfig_is_passed_to_children() {
        let runner = ProcessRunner::new(Some(PathBuf::from("/tmp/lab-kubeconfig.yaml")));
        let output = runner.run(&echo_kubeconfig()).await.unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "/tmp/lab-kubeconfig.yaml");
    }

    #[tokio::test]
    async fn exit_code_is_captured() {
        let output = ProcessRunner::default()
            .run(&Invocation::new("sh").args(["-c", "echo oops >&2; exit 3"]))
            .await
            .unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stderr, "oops\n");
    }
}
