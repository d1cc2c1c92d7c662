/*!

This library provides the pieces `arc-lab` is built from: loading and validating the GitHub App
credentials, the typed Kubernetes objects and Helm values for Actions Runner Controller, wrappers
around the `minikube` and `helm` command line tools, and the [`Lab`] that sequences them.

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use credentials::{Credentials, RawCredentials, RunnerVariant};
pub use env_file::Environment;
pub use error::{Error, Result};
pub use lab_manager::{cleanup, ClusterApi, Lab, LabManager, LabSettings};
pub use minikube::{ClusterProfile, ProfileState};

pub mod constants;
mod credentials;
pub mod env_file;
mod error;
pub mod helm;
pub mod lab_manager;
pub mod minikube;
pub mod system;
#[cfg(test)]
mod test_support;
pub mod tools;
