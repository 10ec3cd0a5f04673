use async_trait::async_trait;
use deadhead_retention::ObjectInfo;

use crate::Result;

/// The bucket operations a pruning run needs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Lists every object in the bucket.
    async fn list_objects(&self) -> Result<Vec<ObjectInfo>>;

    /// Deletes the bare `deployment_id` object and everything under
    /// `deployment_id/`, returning how many objects were removed.
    async fn delete_deployment(&self, deployment_id: &str) -> Result<u64>;
}
