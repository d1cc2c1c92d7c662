use snafu::Snafu;
use std::path::PathBuf;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for everything `arc-lab` does short of argument parsing.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Unable to spawn '{}': {}", command, source))]
    CommandSpawn {
        command: String,
        source: std::io::Error,
    },

    #[snafu(display(
        "'{}' failed with exit status '{}'\n\n{}\n\n{}",
        command,
        code,
        stdout,
        stderr
    ))]
    CommandFailed {
        command: String,
        code: i32,
        stdout: String,
        stderr: String,
    },

    #[snafu(display("Error Creating {}: {}", what, source))]
    Create { what: String, source: kube::Error },

    #[snafu(display("Unable to read env file '{}': {}", path.display(), source))]
    EnvFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display(
        "Malformed line {} in env file '{}', expected KEY=VALUE: '{}'",
        line_number,
        path.display(),
        line
    ))]
    EnvFileLine {
        path: PathBuf,
        line_number: usize,
        line: String,
    },

    #[snafu(display("Unable to read settings from the environment: {}", source))]
    EnvDeserialize { source: envy::Error },

    #[snafu(display("Unable to {}: {}", action, source))]
    Kube { action: String, source: kube::Error },

    #[snafu(display("Unable to read kubeconfig: {}", source))]
    ConfigRead {
        source: kube::config::KubeconfigError,
    },

    #[snafu(display("Unable to create client: {}", source))]
    ClientCreateKubeconfig {
        source: kube::config::KubeconfigError,
    },

    #[snafu(display("Required value '{}' is missing or empty", name))]
    MissingCredential { name: String },

    #[snafu(display("Required tool '{}' was not found on PATH", tool))]
    MissingTool { tool: String },

    #[snafu(display("GitHub App private key file '{}' does not exist", path.display()))]
    PrivateKeyNotFound { path: PathBuf },

    #[snafu(display("Unable to read GitHub App private key '{}': {}", path.display(), source))]
    PrivateKeyRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unable to parse minikube profile list: {}", source))]
    ProfileParse { source: serde_json::Error },

    #[snafu(display(
        "Secret '{}' was still terminating after {:?}, unable to recreate it",
        name,
        waited
    ))]
    SecretTerminating { name: String, waited: Duration },

    #[snafu(display("Unable to serialize Helm values: {}", source))]
    ValuesSerialize { source: serde_yaml::Error },

    #[snafu(display("Unable to write Helm values file: {}", source))]
    ValuesFile { source: std::io::Error },
}
