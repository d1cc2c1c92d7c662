use super::runner::{runner_pod_template, SidecarConfig};
use crate::constants::{
    CONTROLLER_NAMESPACE, CONTROLLER_SERVICE_ACCOUNT, GITHUB_APP_SECRET, MAX_RUNNERS, MIN_RUNNERS,
};
use crate::error::{self, Result};
use crate::Credentials;
use k8s_openapi::api::core::v1::PodTemplateSpec;
use serde::Serialize;
use snafu::ResultExt;

/// The values handed to the `gha-runner-scale-set` chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerSetValues {
    pub github_config_url: String,
    /// Name of the secret holding the GitHub App credentials.
    pub github_config_secret: String,
    pub min_runners: u32,
    pub max_runners: u32,
    pub controller_service_account: ControllerServiceAccount,
    pub template: PodTemplateSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerServiceAccount {
    pub namespace: String,
    pub name: String,
}

impl RunnerSetValues {
    pub fn new(credentials: &Credentials, runner_image: &str, metrics_endpoint: String) -> Self {
        let sidecar = SidecarConfig::for_variant(credentials.variant(), metrics_endpoint);
        Self {
            github_config_url: credentials.config_url().to_string(),
            github_config_secret: GITHUB_APP_SECRET.to_string(),
            min_runners: MIN_RUNNERS,
            max_runners: MAX_RUNNERS,
            controller_service_account: ControllerServiceAccount {
                namespace: CONTROLLER_NAMESPACE.to_string(),
                name: CONTROLLER_SERVICE_ACCOUNT.to_string(),
            },
            template: runner_pod_template(runner_image, sidecar.as_ref()),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context(error::ValuesSerializeSnafu)
    }
}
