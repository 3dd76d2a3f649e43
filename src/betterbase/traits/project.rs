use async_trait::async_trait;

use crate::betterbase::client::result::MetaResult;
use crate::betterbase::model::meta::{
    ApiKey, GraphqlSchema, ProjectInfo, ProjectStats, ProviderInfo, RealtimeStats,
};

/// Project-wide metadata: info, counters, keys and backend capabilities.
#[async_trait]
pub trait ProjectOperations: Send + Sync {
    async fn get_project(&self) -> MetaResult<ProjectInfo>;
    async fn get_stats(&self) -> MetaResult<ProjectStats>;
    async fn list_api_keys(&self) -> MetaResult<Vec<ApiKey>>;
    async fn get_realtime_stats(&self) -> MetaResult<RealtimeStats>;
    /// Database provider and dialect
    async fn get_provider(&self) -> MetaResult<ProviderInfo>;
    async fn get_graphql_schema(&self) -> MetaResult<GraphqlSchema>;
}
