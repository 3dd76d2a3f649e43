use async_trait::async_trait;

use crate::betterbase::client::result::MetaResult;
use crate::betterbase::model::meta::{Acknowledgement, Webhook, WebhookInput, WebhookTestResult};

#[async_trait]
pub trait WebhookOperations: Send + Sync {
    async fn list_webhooks(&self) -> MetaResult<Vec<Webhook>>;
    async fn create_webhook(&self, input: &WebhookInput) -> MetaResult<Webhook>;
    async fn update_webhook(&self, webhook_id: &str, input: &WebhookInput) -> MetaResult<Webhook>;
    async fn delete_webhook(&self, webhook_id: &str) -> MetaResult<Acknowledgement>;

    /// Ask the backend to deliver a test event to the webhook target
    async fn test_webhook(&self, webhook_id: &str) -> MetaResult<WebhookTestResult>;
}
