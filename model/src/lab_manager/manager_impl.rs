use super::LabManager;
use crate::error::{self, Result};
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Patch, PatchParams, PostParams};
use kube::{Api, Resource as KubeResource, ResourceExt};
use serde::{de::DeserializeOwned, Serialize};
use snafu::ResultExt;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

impl LabManager {
    /// Create or update an existing k8s object
    pub(super) async fn create_or_update<T>(
        &self,
        api: &Api<T>,
        data: &T,
        what: &str,
    ) -> Result<()>
    where
        T: KubeResource + Clone + DeserializeOwned + Serialize + Debug,
    {
        // If the data already exists, update it with the new one using a `Patch`. If not create a
        // new one.
        match api.get_opt(&data.name_any()).await {
            Ok(Some(existing)) => {
                api.patch(
                    &existing.name_any(),
                    &PatchParams::default(),
                    &Patch::Merge(data),
                )
                .await
            }
            Ok(None) => api.create(&PostParams::default(), data).await,
            Err(e) => Err(e),
        }
        .context(error::CreateSnafu { what })?;

        Ok(())
    }

    /// Creates a non namespaced api of type `T`
    pub(super) fn api<T>(&self) -> Api<T>
    where
        T: KubeResource,
        <T as KubeResource>::DynamicType: Default,
    {
        Api::<T>::all(self.k8s_client.clone())
    }

    /// Creates an api of type `T` in `namespace`
    pub(super) fn namespaced_api<T>(&self, namespace: &str) -> Api<T>
    where
        T: KubeResource<Scope = NamespaceResourceScope>,
        <T as KubeResource>::DynamicType: Default,
    {
        Api::<T>::namespaced(self.k8s_client.clone(), namespace)
    }
}

/// Poll `done` until it reports `true`, sleeping `interval` between polls. Gives up after `polls`
/// sleeps and returns whether `done` was ever satisfied.
pub(super) async fn settle<F, Fut>(polls: u32, interval: Duration, mut done: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..polls {
        if done().await {
            return true;
        }
        tokio::time::sleep(interval).await;
    }
    done().await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn settle_stops_once_done() {
        let mut polls = 0;
        let done = settle(10, Duration::from_millis(1), || {
            polls += 1;
            let done = polls == 3;
            async move { done }
        })
        .await;
        assert!(done);
        assert_eq!(polls, 3);
    }

    #[tokio::test]
    async fn settle_gives_up_after_bound() {
        let mut polls = 0;
        let done = settle(4, Duration::from_millis(1), || {
            polls += 1;
            async { false }
        })
        .await;
        assert!(!done);
        assert_eq!(polls, 5);
    }

    #[test]
    fn terminating_secret_is_reported() {
        let err: Error = error::SecretTerminatingSnafu {
            name: "arc-runners/arc-github-app",
            waited: Duration::from_secs(10),
        }
        .build();
        assert_eq!(
            err.to_string(),
            "Secret 'arc-runners/arc-github-app' was still terminating after 10s, unable to \
             recreate it"
        );
    }
}
