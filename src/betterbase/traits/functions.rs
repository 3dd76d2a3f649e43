use async_trait::async_trait;

use crate::betterbase::client::result::MetaResult;
use crate::betterbase::model::meta::EdgeFunction;

#[async_trait]
pub trait FunctionOperations: Send + Sync {
    async fn list_functions(&self) -> MetaResult<Vec<EdgeFunction>>;
}
