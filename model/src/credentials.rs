use crate::constants::{ENV_APP_ID, ENV_CONFIG_URL, ENV_INSTALLATION_ID, ENV_PRIVATE_KEY_PATH};
use crate::env_file::Environment;
use crate::error::{self, Result};
use serde::Deserialize;
use snafu::{ensure, OptionExt, ResultExt};
use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};

/// The values as they appear in the environment, before validation.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawCredentials {
    pub github_config_url: Option<String>,
    pub github_app_id: Option<String>,
    pub github_app_installation_id: Option<String>,
    pub github_app_private_key_path: Option<PathBuf>,
    pub sidecar_image: Option<String>,
}

/// Whether the runner pod carries the sidecar container. Decided only by whether a sidecar
/// image was supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerVariant {
    WithSidecar { image: String },
    WithoutSidecar,
}

impl RunnerVariant {
    pub fn sidecar_image(&self) -> Option<&str> {
        match self {
            RunnerVariant::WithSidecar { image } => Some(image),
            RunnerVariant::WithoutSidecar => None,
        }
    }
}

/// The GitHub App credential bundle. A `Credentials` can only be obtained through validation,
/// so holding one means every required value is present and the private key has been read.
#[derive(Clone)]
pub struct Credentials {
    config_url: String,
    app_id: String,
    installation_id: String,
    private_key_path: PathBuf,
    private_key: Vec<u8>,
    variant: RunnerVariant,
}

impl Credentials {
    /// Deserialize and validate the credentials found in `environment`.
    pub fn from_environment(environment: &Environment) -> Result<Self> {
        let raw: RawCredentials =
            envy::from_iter(environment.vars()).context(error::EnvDeserializeSnafu)?;
        Self::validate(raw)
    }

    pub fn validate(raw: RawCredentials) -> Result<Self> {
        let config_url = required(raw.github_config_url, ENV_CONFIG_URL)?;
        let app_id = required(raw.github_app_id, ENV_APP_ID)?;
        let installation_id = required(raw.github_app_installation_id, ENV_INSTALLATION_ID)?;
        let private_key_path = raw
            .github_app_private_key_path
            .filter(|path| !path.as_os_str().is_empty())
            .context(error::MissingCredentialSnafu {
                name: ENV_PRIVATE_KEY_PATH,
            })?;
        ensure!(
            private_key_path.is_file(),
            error::PrivateKeyNotFoundSnafu {
                path: private_key_path.clone()
            }
        );
        let private_key = std::fs::read(&private_key_path).context(error::PrivateKeyReadSnafu {
            path: private_key_path.clone(),
        })?;
        let variant = match raw.sidecar_image.map(|image| image.trim().to_string()) {
            Some(image) if !image.is_empty() => RunnerVariant::WithSidecar { image },
            _ => RunnerVariant::WithoutSidecar,
        };

        Ok(Self {
            config_url,
            app_id,
            installation_id,
            private_key_path,
            private_key,
            variant,
        })
    }

    pub fn config_url(&self) -> &str {
        &self.config_url
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn installation_id(&self) -> &str {
        &self.installation_id
    }

    pub fn private_key_path(&self) -> &Path {
        &self.private_key_path
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    pub fn variant(&self) -> &RunnerVariant {
        &self.variant
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("config_url", &self.config_url)
            .field("app_id", &self.app_id)
            .field("installation_id", &self.installation_id)
            .field("private_key_path", &self.private_key_path)
            .field("private_key", &"<redacted>")
            .field("variant", &self.variant)
            .finish()
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .context(error::MissingCredentialSnafu { name })
}
