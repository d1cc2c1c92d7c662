#![cfg(feature = "integ")]
use arc_lab_model::constants::{GITHUB_APP_SECRET, RUNNER_NAMESPACE};
use arc_lab_model::system::github_app_secret;
use arc_lab_model::{ClusterApi, Credentials, LabManager, RawCredentials};
use selftest::Cluster;
use std::io::Write;

#[tokio::test]
async fn secret_is_replaced_not_duplicated() {
    let cluster = Cluster::new("arc-lab-model-integ").unwrap();
    let manager = LabManager::new_from_kubeconfig_path(&cluster.kubeconfig())
        .await
        .unwrap();

    let mut key = tempfile::NamedTempFile::new().unwrap();
    key.write_all(b"pem").unwrap();
    let credentials = Credentials::validate(RawCredentials {
        github_config_url: Some("https://github.com/arc-lab-integ".to_string()),
        github_app_id: Some("1".to_string()),
        github_app_installation_id: Some("2".to_string()),
        github_app_private_key_path: Some(key.path().to_path_buf()),
        sidecar_image: None,
    })
    .unwrap();

    manager.ensure_namespace(RUNNER_NAMESPACE).await.unwrap();
    // A second call finds the namespace and updates it in place.
    manager.ensure_namespace(RUNNER_NAMESPACE).await.unwrap();

    assert!(!manager
        .replace_secret(github_app_secret(&credentials))
        .await
        .unwrap());
    assert!(manager
        .replace_secret(github_app_secret(&credentials))
        .await
        .unwrap());
    assert_eq!(
        cluster
            .secret_count(RUNNER_NAMESPACE, GITHUB_APP_SECRET)
            .await
            .unwrap(),
        1
    );
}
