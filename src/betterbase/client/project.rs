use async_trait::async_trait;
use log::debug;

use super::result::MetaResult;
use super::MetaClient;
use crate::betterbase::model::meta::{
    ApiKey, GraphqlSchema, ProjectInfo, ProjectStats, ProviderInfo, RealtimeStats,
};
use crate::betterbase::traits::ProjectOperations;

#[async_trait]
impl ProjectOperations for MetaClient {
    async fn get_project(&self) -> MetaResult<ProjectInfo> {
        debug!("get_project called");
        self.get(&["project"], vec![]).await
    }

    async fn get_stats(&self) -> MetaResult<ProjectStats> {
        self.get(&["stats"], vec![]).await
    }

    async fn list_api_keys(&self) -> MetaResult<Vec<ApiKey>> {
        self.get(&["keys"], vec![]).await
    }

    async fn get_realtime_stats(&self) -> MetaResult<RealtimeStats> {
        self.get(&["realtime"], vec![]).await
    }

    async fn get_provider(&self) -> MetaResult<ProviderInfo> {
        self.get(&["provider"], vec![]).await
    }

    async fn get_graphql_schema(&self) -> MetaResult<GraphqlSchema> {
        self.get(&["graphql", "schema"], vec![]).await
    }
}
