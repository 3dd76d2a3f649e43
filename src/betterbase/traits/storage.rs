use async_trait::async_trait;

use crate::betterbase::client::result::MetaResult;
use crate::betterbase::model::meta::{Acknowledgement, StorageBucket, StorageFile};

#[async_trait]
pub trait StorageOperations: Send + Sync {
    async fn list_buckets(&self) -> MetaResult<Vec<StorageBucket>>;
    async fn list_files(&self, bucket: &str, prefix: Option<&str>) -> MetaResult<Vec<StorageFile>>;
    async fn delete_file(&self, bucket: &str, key: &str) -> MetaResult<Acknowledgement>;
}
