use super::lab_labels;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::ObjectMeta;

/// Defines a namespace named `name` labeled as managed by arc-lab.
pub fn lab_namespace(name: &str) -> Namespace {
    Namespace {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            labels: Some(lab_labels()),
            ..Default::default()
        },
        ..Default::default()
    }
}
