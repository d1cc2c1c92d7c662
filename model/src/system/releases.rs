use crate::constants::{
    CONTROLLER_CHART, CONTROLLER_NAMESPACE, CONTROLLER_RELEASE, MONITORING_CHART,
    MONITORING_NAMESPACE, MONITORING_RELEASE, RUNNER_NAMESPACE, RUNNER_SET_CHART,
    RUNNER_SET_RELEASE,
};
use crate::helm::Release;
use std::path::Path;

/// The scale-set controller, installed into its own system namespace.
pub fn controller_release() -> Release {
    Release::new(CONTROLLER_RELEASE, CONTROLLER_CHART, CONTROLLER_NAMESPACE).create_namespace()
}

/// The runner scale set. Everything but the release coordinates comes from `values_file`.
pub fn runner_set_release(values_file: &Path) -> Release {
    Release::new(RUNNER_SET_RELEASE, RUNNER_SET_CHART, RUNNER_NAMESPACE)
        .create_namespace()
        .values_file(values_file)
}

/// The metrics stack. Only the server and kube-state-metrics are enabled, and the server
/// accepts remote writes so the sidecar can push to it.
pub fn monitoring_release() -> Release {
    Release::new(MONITORING_RELEASE, MONITORING_CHART, MONITORING_NAMESPACE)
        .set("alertmanager.enabled", "false")
        .set("prometheus-pushgateway.enabled", "false")
        .set("prometheus-node-exporter.enabled", "false")
        .set("kube-state-metrics.enabled", "true")
        .set("server.extraFlags[0]", "web.enable-remote-write-receiver")
}

/// The cluster-internal remote write endpoint of the monitoring release's server.
pub fn metrics_endpoint() -> String {
    format!(
        "http://{}-server.{}.svc.cluster.local/api/v1/write",
        MONITORING_RELEASE, MONITORING_NAMESPACE
    )
}

#[test]
fn metrics_endpoint_is_deterministic() {
    assert_eq!(
        metrics_endpoint(),
        "http://prometheus-server.monitoring.svc.cluster.local/api/v1/write"
    );
}
