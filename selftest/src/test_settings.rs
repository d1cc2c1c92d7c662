use serde::Deserialize;

/// Test settings provides a way to send arguments into the Rust tests using environment variables.
pub(super) struct TestSettings {}

impl TestSettings {
    /// The path or name of the `minikube` binary.
    pub(super) fn minikube_path() -> &'static str {
        TEST_SETTINGS.minikube_path.as_str()
    }

    /// The minikube driver selftest clusters are created with.
    pub(super) fn driver() -> &'static str {
        TEST_SETTINGS.driver.as_str()
    }
}

#[derive(Debug, Deserialize)]
struct Inner {
    /// The path to the [minikube] binary. Defaults to `minikube` (i.e. by default the minikube
    /// binary is expected to be found via `$PATH`).
    ///
    /// # Example
    ///
    /// ```text
    /// ARC_LAB_SELFTEST_MINIKUBE_PATH=/wherever/minikube
    /// ```
    ///
    /// [minikube]: https://minikube.sigs.k8s.io/
    #[serde(default = "minikube")]
    minikube_path: String,

    /// ```text
    /// ARC_LAB_SELFTEST_DRIVER=podman
    /// ```
    #[serde(default = "docker")]
    driver: String,
}

lazy_static::lazy_static! {
    static ref TEST_SETTINGS: Inner =
        envy::prefixed("ARC_LAB_SELFTEST_")
            .from_env::<Inner>()
            .expect("Error parsing TestSettings environment variables");
}

/// We need these to provide defaults for serde.
fn minikube() -> String {
    String::from("minikube")
}

fn docker() -> String {
    String::from("docker")
}
