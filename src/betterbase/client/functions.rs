use async_trait::async_trait;

use super::result::MetaResult;
use super::MetaClient;
use crate::betterbase::model::meta::EdgeFunction;
use crate::betterbase::traits::FunctionOperations;

#[async_trait]
impl FunctionOperations for MetaClient {
    async fn list_functions(&self) -> MetaResult<Vec<EdgeFunction>> {
        self.get(&["functions"], vec![]).await
    }
}
