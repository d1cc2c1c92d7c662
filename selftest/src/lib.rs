/*!

Provides utilities for testing arc-lab against a real `minikube` profile.
We call this testing modality `selftest` to distinguish it from the unit tests, which run against
in-memory stand-ins for the command line tools and the Kubernetes API.

!*/

pub mod cluster;
mod test_settings;

pub use cluster::Cluster;
