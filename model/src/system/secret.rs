use super::lab_labels;
use crate::constants::{
    GITHUB_APP_SECRET, RUNNER_NAMESPACE, SECRET_KEY_APP_ID, SECRET_KEY_CONFIG_URL,
    SECRET_KEY_INSTALLATION_ID, SECRET_KEY_PRIVATE_KEY,
};
use crate::Credentials;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use maplit::btreemap;

/// Defines the generic secret the runner scale set authenticates with. Three values are
/// literals, the private key is the raw content of the key file.
pub fn github_app_secret(credentials: &Credentials) -> Secret {
    let installation_id = credentials.installation_id().as_bytes();
    Secret {
        metadata: ObjectMeta {
            name: Some(GITHUB_APP_SECRET.to_string()),
            namespace: Some(RUNNER_NAMESPACE.to_string()),
            labels: Some(lab_labels()),
            ..Default::default()
        },
        data: Some(btreemap! {
            SECRET_KEY_CONFIG_URL.to_string() => bytes(credentials.config_url().as_bytes()),
            SECRET_KEY_APP_ID.to_string() => bytes(credentials.app_id().as_bytes()),
            SECRET_KEY_INSTALLATION_ID.to_string() => bytes(installation_id),
            SECRET_KEY_PRIVATE_KEY.to_string() => bytes(credentials.private_key()),
        }),
        type_: Some("Opaque".to_string()),
        ..Default::default()
    }
}

fn bytes(value: &[u8]) -> ByteString {
    ByteString(value.to_vec())
}
