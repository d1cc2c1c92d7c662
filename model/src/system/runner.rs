use crate::constants::{
    DIAG_PATH, DOCKER_SOCK_PATH, DOCKER_SOCK_VOLUME, LABEL_SCALE_SET_NAME, RUNNER_CONTAINER,
    SIDECAR_CONTAINER, SIDECAR_CPU_LIMIT, SIDECAR_MEMORY_LIMIT, WORK_DIR, WORK_VOLUME,
};
use crate::RunnerVariant;
use k8s_openapi::api::core::v1::{
    Container, EmptyDirVolumeSource, EnvVar, EnvVarSource, HostPathVolumeSource,
    ObjectFieldSelector, PodSpec, PodTemplateSpec, ResourceRequirements, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use maplit::btreemap;

/// What the sidecar container needs besides its image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarConfig {
    pub image: String,
    pub metrics_endpoint: String,
}

impl SidecarConfig {
    pub fn for_variant(variant: &RunnerVariant, metrics_endpoint: String) -> Option<Self> {
        variant.sidecar_image().map(|image| Self {
            image: image.to_string(),
            metrics_endpoint,
        })
    }
}

/// Defines the runner pod template. The runner container always mounts the shared work
/// directory and the host's Docker socket; with a `sidecar` a second container gets read-only
/// access to both.
pub fn runner_pod_template(
    runner_image: &str,
    sidecar: Option<&SidecarConfig>,
) -> PodTemplateSpec {
    let mut containers = vec![runner_container(runner_image)];
    containers.extend(sidecar.map(sidecar_container));

    PodTemplateSpec {
        metadata: None,
        spec: Some(PodSpec {
            containers,
            restart_policy: Some("Never".to_string()),
            volumes: Some(vec![
                Volume {
                    name: WORK_VOLUME.to_string(),
                    empty_dir: Some(EmptyDirVolumeSource::default()),
                    ..Default::default()
                },
                Volume {
                    name: DOCKER_SOCK_VOLUME.to_string(),
                    host_path: Some(HostPathVolumeSource {
                        path: DOCKER_SOCK_PATH.to_string(),
                        type_: Some("Socket".to_string()),
                    }),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        }),
    }
}

fn runner_container(image: &str) -> Container {
    Container {
        name: RUNNER_CONTAINER.to_string(),
        image: Some(image.to_string()),
        command: Some(vec!["/home/runner/run.sh".to_string()]),
        env: Some(vec![EnvVar {
            name: "DOCKER_HOST".to_string(),
            value: Some(format!("unix://{}", DOCKER_SOCK_PATH)),
            ..Default::default()
        }]),
        volume_mounts: Some(shared_mounts(false)),
        ..Default::default()
    }
}

fn sidecar_container(sidecar: &SidecarConfig) -> Container {
    Container {
        name: SIDECAR_CONTAINER.to_string(),
        image: Some(sidecar.image.clone()),
        // The image is loaded into the cluster, there is no registry to pull it from.
        image_pull_policy: Some("Never".to_string()),
        env: Some(vec![
            field_env("POD_NAME", "metadata.name"),
            field_env("POD_NAMESPACE", "metadata.namespace"),
            field_env(
                "SCALE_SET_NAME",
                &format!("metadata.labels['{}']", LABEL_SCALE_SET_NAME),
            ),
            value_env("DIAG_PATH", DIAG_PATH),
            value_env("METRICS_ENDPOINT", &sidecar.metrics_endpoint),
        ]),
        resources: Some(ResourceRequirements {
            limits: Some(btreemap! {
                "cpu".to_string() => Quantity(SIDECAR_CPU_LIMIT.to_string()),
                "memory".to_string() => Quantity(SIDECAR_MEMORY_LIMIT.to_string()),
            }),
            ..Default::default()
        }),
        volume_mounts: Some(shared_mounts(true)),
        ..Default::default()
    }
}

fn shared_mounts(read_only: bool) -> Vec<VolumeMount> {
    let read_only = if read_only { Some(true) } else { None };
    vec![
        VolumeMount {
            name: WORK_VOLUME.to_string(),
            mount_path: WORK_DIR.to_string(),
            read_only,
            ..Default::default()
        },
        VolumeMount {
            name: DOCKER_SOCK_VOLUME.to_string(),
            mount_path: DOCKER_SOCK_PATH.to_string(),
            read_only,
            ..Default::default()
        },
    ]
}

fn field_env(name: &str, field_path: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value_from: Some(EnvVarSource {
            field_ref: Some(ObjectFieldSelector {
                field_path: field_path.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn value_env(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        ..Default::default()
    }
}
