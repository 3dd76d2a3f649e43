use async_trait::async_trait;

use crate::betterbase::client::result::MetaResult;
use crate::betterbase::model::meta::{LogBucket, LogFilter, RequestLog};

/// Trait for request log operations
#[async_trait]
pub trait LogOperations: Send + Sync {
    async fn list_logs(&self, filter: &LogFilter) -> MetaResult<Vec<RequestLog>>;

    /// Request and error counts per hour
    async fn get_log_chart(&self) -> MetaResult<Vec<LogBucket>>;
}
