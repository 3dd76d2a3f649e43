use async_trait::async_trait;
use log::info;
use reqwest::Method;

use super::result::MetaResult;
use super::MetaClient;
use crate::betterbase::model::meta::{Acknowledgement, Webhook, WebhookInput, WebhookTestResult};
use crate::betterbase::traits::WebhookOperations;

fn webhook_body<T>(input: &WebhookInput) -> Result<serde_json::Value, MetaResult<T>> {
    serde_json::to_value(input).map_err(|e| MetaResult::failure(format!("Network error: {e}")))
}

#[async_trait]
impl WebhookOperations for MetaClient {
    async fn list_webhooks(&self) -> MetaResult<Vec<Webhook>> {
        self.get(&["webhooks"], vec![]).await
    }

    async fn create_webhook(&self, input: &WebhookInput) -> MetaResult<Webhook> {
        info!("Creating webhook {:?}", input.name);
        let body = match webhook_body(input) {
            Ok(body) => body,
            Err(failure) => return failure,
        };
        self.send(Method::POST, &["webhooks"], Some(body)).await
    }

    async fn update_webhook(&self, webhook_id: &str, input: &WebhookInput) -> MetaResult<Webhook> {
        info!("Updating webhook {webhook_id}");
        let body = match webhook_body(input) {
            Ok(body) => body,
            Err(failure) => return failure,
        };
        self.send(Method::PUT, &["webhooks", webhook_id], Some(body)).await
    }

    async fn delete_webhook(&self, webhook_id: &str) -> MetaResult<Acknowledgement> {
        info!("Deleting webhook {webhook_id}");
        self.send(Method::DELETE, &["webhooks", webhook_id], None).await
    }

    async fn test_webhook(&self, webhook_id: &str) -> MetaResult<WebhookTestResult> {
        self.send(Method::POST, &["webhooks", webhook_id, "test"], None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::betterbase::client::tests::test_client;
    use mockito::{Matcher, Server};

    const WEBHOOK: &str = r#"{"id":"w1","name":"notify","table":"posts","events":["INSERT"],"url":"https://hooks.example.com","enabled":true}"#;

    #[tokio::test]
    async fn test_create_webhook_sends_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/meta/webhooks")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "notify",
                "table": "posts",
                "events": ["INSERT"],
                "url": "https://hooks.example.com"
            })))
            .with_status(201)
            .with_body(format!(r#"{{"data":{WEBHOOK},"error":null}}"#))
            .create_async()
            .await;

        let input = WebhookInput {
            name: Some("notify".into()),
            table: Some("posts".into()),
            events: Some(vec!["INSERT".into()]),
            url: Some("https://hooks.example.com".into()),
            ..WebhookInput::default()
        };
        let result = test_client(&server).create_webhook(&input).await;

        mock.assert_async().await;
        let webhook = result.data.unwrap();
        assert_eq!(webhook.id, "w1");
        assert!(webhook.enabled);
    }

    #[tokio::test]
    async fn test_update_webhook() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/meta/webhooks/w1")
            .match_body(Matcher::Json(serde_json::json!({"enabled": false})))
            .with_status(200)
            .with_body(format!(r#"{{"data":{WEBHOOK},"error":null}}"#))
            .create_async()
            .await;

        let input = WebhookInput {
            enabled: Some(false),
            ..WebhookInput::default()
        };
        let result = test_client(&server).update_webhook("w1", &input).await;

        mock.assert_async().await;
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn test_delete_webhook() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/meta/webhooks/w1")
            .with_status(200)
            .with_body(r#"{"data":true,"error":null}"#)
            .create_async()
            .await;

        let result = test_client(&server).delete_webhook("w1").await;

        mock.assert_async().await;
        assert_eq!(result.error, None);
        assert_eq!(result.data, Some(Acknowledgement(serde_json::json!(true))));
    }

    #[tokio::test]
    async fn test_test_webhook_delivery() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/meta/webhooks/w1/test")
            .with_status(200)
            .with_body(r#"{"data":{"success":false,"statusCode":502,"error":"Bad Gateway"},"error":null}"#)
            .create_async()
            .await;

        let result = test_client(&server).test_webhook("w1").await;

        mock.assert_async().await;
        let delivery = result.data.unwrap();
        assert!(!delivery.success);
        assert_eq!(delivery.status_code, Some(502));
    }

    #[tokio::test]
    async fn test_list_webhooks() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/meta/webhooks")
            .with_status(200)
            .with_body(format!(r#"{{"data":[{WEBHOOK}],"error":null}}"#))
            .create_async()
            .await;

        let webhooks = test_client(&server).list_webhooks().await.data.unwrap();
        assert_eq!(webhooks[0].events, vec!["INSERT"]);
    }
}
