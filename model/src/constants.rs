/// Helper macro to avoid retyping the OCI registry path that both ARC charts are published under.
/// When given no parameters, this returns the registry path. When given a string literal
/// parameter it adds `/parameter` to the end.
macro_rules! arc_charts {
    () => {
        "oci://ghcr.io/actions/actions-runner-controller-charts"
    };
    ($s:literal) => {
        concat!(arc_charts!(), "/", $s)
    };
}

// Cluster profile
pub const PROFILE: &str = "arc-lab";
pub const CLUSTER_CPUS: u32 = 4;
pub const CLUSTER_MEMORY: &str = "8192";
pub const CLUSTER_DRIVER: &str = "docker";

// External tools
pub const MINIKUBE: &str = "minikube";
pub const HELM: &str = "helm";
pub const KUBECTL: &str = "kubectl";
pub const DOCKER: &str = "docker";
pub const REQUIRED_TOOLS: [&str; 4] = [MINIKUBE, HELM, KUBECTL, DOCKER];

// Scale-set controller
pub const CONTROLLER_CHART: &str = arc_charts!("gha-runner-scale-set-controller");
pub const CONTROLLER_RELEASE: &str = "arc";
pub const CONTROLLER_NAMESPACE: &str = "arc-systems";
/// The chart names the controller's service account `<release>-gha-rs-controller`.
pub const CONTROLLER_SERVICE_ACCOUNT: &str = "arc-gha-rs-controller";

// Runner scale set
pub const RUNNER_SET_CHART: &str = arc_charts!("gha-runner-scale-set");
pub const RUNNER_SET_RELEASE: &str = "arc-runner-set";
pub const RUNNER_NAMESPACE: &str = "arc-runners";
pub const MIN_RUNNERS: u32 = 0;
pub const MAX_RUNNERS: u32 = 2;
pub const DEFAULT_RUNNER_IMAGE: &str = "ghcr.io/actions/actions-runner:latest";

// GitHub App secret
pub const GITHUB_APP_SECRET: &str = "arc-github-app";
pub const SECRET_KEY_CONFIG_URL: &str = "github_config_url";
pub const SECRET_KEY_APP_ID: &str = "github_app_id";
pub const SECRET_KEY_INSTALLATION_ID: &str = "github_app_installation_id";
pub const SECRET_KEY_PRIVATE_KEY: &str = "github_app_private_key";

// Environment variables
pub const ENV_CONFIG_URL: &str = "GITHUB_CONFIG_URL";
pub const ENV_APP_ID: &str = "GITHUB_APP_ID";
pub const ENV_INSTALLATION_ID: &str = "GITHUB_APP_INSTALLATION_ID";
pub const ENV_PRIVATE_KEY_PATH: &str = "GITHUB_APP_PRIVATE_KEY_PATH";
pub const ENV_SIDECAR_IMAGE: &str = "SIDECAR_IMAGE";
pub const DEFAULT_ENV_FILE: &str = ".env";

// Monitoring
pub const MONITORING_REPO_NAME: &str = "prometheus-community";
pub const MONITORING_REPO_URL: &str = "https://prometheus-community.github.io/helm-charts";
pub const MONITORING_CHART: &str = "prometheus-community/prometheus";
pub const MONITORING_RELEASE: &str = "prometheus";
pub const MONITORING_NAMESPACE: &str = "monitoring";
pub const METRICS_READER_ROLE: &str = "arc-lab-metrics-reader";
pub const METRICS_READER_BINDING: &str = "arc-lab-metrics-reader-binding";

// Runner pod
pub const RUNNER_CONTAINER: &str = "runner";
pub const SIDECAR_CONTAINER: &str = "sidecar";
pub const WORK_VOLUME: &str = "work";
pub const WORK_DIR: &str = "/home/runner/_work";
pub const DOCKER_SOCK_VOLUME: &str = "docker-sock";
pub const DOCKER_SOCK_PATH: &str = "/var/run/docker.sock";
pub const DIAG_PATH: &str = "/home/runner/_work/_diag";
pub const LABEL_SCALE_SET_NAME: &str = "actions.github.com/scale-set-name";
pub const SIDECAR_CPU_LIMIT: &str = "200m";
pub const SIDECAR_MEMORY_LIMIT: &str = "256Mi";

// Standard tags https://kubernetes.io/docs/concepts/overview/working-with-objects/common-labels/
pub const APP_PART_OF: &str = "app.kubernetes.io/part-of";
pub const APP_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

#[test]
fn arc_charts_macro_test() {
    assert_eq!(
        "oci://ghcr.io/actions/actions-runner-controller-charts",
        arc_charts!()
    );
    assert_eq!(
        "oci://ghcr.io/actions/actions-runner-controller-charts/gha-runner-scale-set",
        RUNNER_SET_CHART
    );
}
