use async_trait::async_trait;

use crate::betterbase::client::result::MetaResult;
use crate::betterbase::model::meta::{Acknowledgement, AuthUser};

#[async_trait]
pub trait UserOperations: Send + Sync {
    /// List auth users, one page at a time (UI default 20/0)
    async fn list_users(&self, limit: u32, offset: u32) -> MetaResult<Vec<AuthUser>>;
    async fn delete_user(&self, user_id: &str) -> MetaResult<Acknowledgement>;
}
