use async_trait::async_trait;
use log::{debug, info};
use reqwest::Method;

use super::result::MetaResult;
use super::MetaClient;
use crate::betterbase::model::meta::{Acknowledgement, AuthUser};
use crate::betterbase::traits::UserOperations;

#[async_trait]
impl UserOperations for MetaClient {
    async fn list_users(&self, limit: u32, offset: u32) -> MetaResult<Vec<AuthUser>> {
        debug!("list_users called with limit={limit}, offset={offset}");
        self.get(
            &["users"],
            vec![("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }

    async fn delete_user(&self, user_id: &str) -> MetaResult<Acknowledgement> {
        info!("Deleting user {user_id}");
        self.send(Method::DELETE, &["users", user_id], None).await
    }
}
