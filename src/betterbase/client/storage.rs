use async_trait::async_trait;
use log::{debug, info};
use reqwest::Method;

use super::result::MetaResult;
use super::MetaClient;
use crate::betterbase::model::meta::{Acknowledgement, StorageBucket, StorageFile};
use crate::betterbase::traits::StorageOperations;

#[async_trait]
impl StorageOperations for MetaClient {
    async fn list_buckets(&self) -> MetaResult<Vec<StorageBucket>> {
        self.get(&["storage", "buckets"], vec![]).await
    }

    async fn list_files(&self, bucket: &str, prefix: Option<&str>) -> MetaResult<Vec<StorageFile>> {
        debug!("list_files called with bucket={bucket}, prefix={prefix:?}");
        let query = prefix
            .map(|prefix| vec![("prefix", prefix.to_string())])
            .unwrap_or_default();
        self.get(&["storage", bucket, "files"], query).await
    }

    async fn delete_file(&self, bucket: &str, key: &str) -> MetaResult<Acknowledgement> {
        info!("Deleting {bucket}/{key}");
        self.send(Method::DELETE, &["storage", bucket, "files", key], None)
            .await
    }
}
