use super::lab_labels;
use crate::constants::{
    METRICS_READER_BINDING, METRICS_READER_ROLE, MONITORING_NAMESPACE, MONITORING_RELEASE,
};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, PolicyRule, RoleRef, Subject};
use kube::api::ObjectMeta;

/// Defines the cluster role that lets the metrics server scrape pods and nodes.
pub fn metrics_reader_cluster_role() -> ClusterRole {
    ClusterRole {
        metadata: ObjectMeta {
            name: Some(METRICS_READER_ROLE.to_string()),
            labels: Some(lab_labels()),
            ..Default::default()
        },
        rules: Some(vec![
            PolicyRule {
                api_groups: Some(vec!["".to_string()]),
                resources: Some(
                    ["pods", "nodes", "nodes/metrics", "services", "endpoints"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                ),
                verbs: vec!["get", "list", "watch"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                ..Default::default()
            },
            PolicyRule {
                non_resource_urls: Some(vec!["/metrics".to_string()]),
                verbs: vec!["get".to_string()],
                ..Default::default()
            },
        ]),
        ..Default::default()
    }
}

/// Grants the metrics reader role to the service account of the monitoring release's server.
pub fn metrics_reader_cluster_role_binding() -> ClusterRoleBinding {
    ClusterRoleBinding {
        metadata: ObjectMeta {
            name: Some(METRICS_READER_BINDING.to_string()),
            labels: Some(lab_labels()),
            ..Default::default()
        },
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".to_string(),
            kind: "ClusterRole".to_string(),
            name: METRICS_READER_ROLE.to_string(),
        },
        subjects: Some(vec![Subject {
            kind: "ServiceAccount".to_string(),
            name: format!("{}-server", MONITORING_RELEASE),
            namespace: Some(MONITORING_NAMESPACE.to_string()),
            ..Default::default()
        }]),
    }
}
