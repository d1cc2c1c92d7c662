pub use cluster_api::ClusterApi;
pub use lab::{cleanup, Lab, LabSettings};
pub use manager::LabManager;

mod cluster_api;
mod lab;
mod manager;
mod manager_impl;
