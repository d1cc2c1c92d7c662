/// Encapsulates the Kubernetes objects and Helm inputs `arc-lab` produces
mod namespace;
mod rbac;
mod releases;
mod runner;
mod secret;
mod values;

pub use namespace::lab_namespace;
pub use rbac::{metrics_reader_cluster_role, metrics_reader_cluster_role_binding};
pub use releases::{
    controller_release, metrics_endpoint, monitoring_release, runner_set_release,
};
pub use runner::{runner_pod_template, SidecarConfig};
pub use secret::github_app_secret;
pub use values::{ControllerServiceAccount, RunnerSetValues};

use crate::constants::{APP_MANAGED_BY, APP_PART_OF};
use std::collections::BTreeMap;

/// The labels put on every object `arc-lab` creates directly.
pub(crate) fn lab_labels() -> BTreeMap<String, String> {
    maplit::btreemap! {
        APP_MANAGED_BY.to_string() => "arc-lab".to_string(),
        APP_PART_OF.to_string() => "arc-lab".to_string(),
    }
}
