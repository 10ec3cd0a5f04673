pub mod deployment;
pub mod policy;

pub use deployment::{DeploymentRecord, ObjectInfo, group_by_deployment, rank_deployments};
pub use policy::{RetentionPolicy, select_for_deletion};
