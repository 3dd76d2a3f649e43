use async_trait::async_trait;

use crate::betterbase::client::result::MetaResult;
use crate::betterbase::model::meta::{TableInfo, TablePolicies, TableRow};

#[async_trait]
pub trait TableOperations: Send + Sync {
    async fn list_tables(&self) -> MetaResult<Vec<TableInfo>>;

    /// Get one page of rows. `limit` and `offset` are sent as given, a zero
    /// limit is not clamped.
    ///
    /// # Arguments
    /// * `table` - Table name
    /// * `limit` - Maximum number of rows to return (UI default 50)
    /// * `offset` - Number of rows to skip (UI default 0)
    async fn get_table_rows(&self, table: &str, limit: u32, offset: u32) -> MetaResult<Vec<TableRow>>;

    /// RLS policies grouped per table
    async fn list_rls_policies(&self) -> MetaResult<Vec<TablePolicies>>;
}
