/*!

The seam between `arc-lab` and the command line tools it drives (`minikube`, `helm`, `kubectl`).
Everything that leaves the process goes through a [`CommandRunner`] so the order and shape of
the invocations can be checked without the tools installed.

!*/

use crate::error::{self, Result};
use async_trait::async_trait;
use log::{debug, info};
use snafu::{ensure, OptionExt};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod process;

pub use process::ProcessRunner;

/// A single command line: the program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<S>(program: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg<S>(mut self, arg: S) -> Self
    where
        S: Into<String>,
    {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// What a finished command left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Resolve `program` on `PATH`.
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Run `invocation` to completion. Only a failure to start the process is an `Err`; a
    /// non-zero exit is reported through [`CommandOutput::code`].
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Run `invocation` and turn a non-zero exit into [`crate::Error::CommandFailed`].
pub async fn run_checked(
    runner: &dyn CommandRunner,
    invocation: Invocation,
) -> Result<CommandOutput> {
    let output = runner.run(&invocation).await?;
    ensure!(output.success(), failed(&invocation, &output));
    Ok(output)
}

pub(crate) fn failed(
    invocation: &Invocation,
    output: &CommandOutput,
) -> error::CommandFailedSnafu<String, i32, String, String> {
    error::CommandFailedSnafu {
        command: invocation.to_string(),
        code: output.code.unwrap_or(1),
        stdout: output.stdout.clone(),
        stderr: output.stderr.clone(),
    }
}

/// Make sure every tool in `tools` resolves on `PATH`. The first missing one is fatal.
pub fn check_dependencies(runner: &dyn CommandRunner, tools: &[&str]) -> Result<()> {
    for tool in tools {
        let path = runner
            .locate(tool)
            .context(error::MissingToolSnafu { tool: *tool })?;
        debug!("Found '{}' at '{}'", tool, path.display());
    }
    info!("All required tools found: {}", tools.join(", "));
    Ok(())
}
