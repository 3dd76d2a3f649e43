pub mod base;
pub mod result;

mod functions;
mod logs;
mod project;
mod storage;
mod tables;
mod users;
mod webhooks;

use anyhow::Result;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use self::base::{BaseClient, RequestOptions};
use self::result::MetaResult;
use crate::betterbase::config::ClientSettings;
use crate::betterbase::model::Connection;
use crate::betterbase::traits::MetaApi;

/// Typed client for the `/api/meta` namespace of one connection.
///
/// Holds no state besides the normalized base URL, the credential and a
/// cancellation token, so it is cheap to build per command.
#[derive(Debug, Clone)]
pub struct MetaClient {
    base: BaseClient,
}

impl MetaClient {
    pub fn new(connection: &Connection, settings: &ClientSettings) -> Result<Self> {
        Ok(Self {
            base: BaseClient::new(connection, settings)?,
        })
    }

    /// Binds the client to a cancellation token. Once the token is cancelled,
    /// in-flight and later calls resolve to a "Request cancelled" error.
    pub fn with_cancellation(self, cancel: CancellationToken) -> Self {
        Self {
            base: self.base.with_cancellation(cancel),
        }
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        self.base.cancellation_token()
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: Vec<(&'static str, String)>,
    ) -> MetaResult<T> {
        self.base
            .request(Method::GET, segments, RequestOptions::query(query))
            .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<serde_json::Value>,
    ) -> MetaResult<T> {
        let options = body.map(RequestOptions::body).unwrap_or_default();
        self.base.request(method, segments, options).await
    }
}

impl MetaApi for MetaClient {
    fn base_url(&self) -> &str {
        self.base.base_url()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::betterbase::model::meta::ProjectInfo;
    use crate::betterbase::traits::{ProjectOperations, UserOperations};
    use mockito::{Matcher, Server};
    use std::time::Duration;
    use time::OffsetDateTime;

    pub(crate) const TEST_KEY: &str = "bb_service_test";

    pub(crate) fn test_connection(url: &str) -> Connection {
        Connection {
            id: "c1".into(),
            name: "Demo".into(),
            url: url.into(),
            service_role_key: TEST_KEY.into(),
            project_id: "p1".into(),
            added_at: OffsetDateTime::now_utc(),
            last_connected_at: None,
        }
    }

    pub(crate) fn test_client(server: &Server) -> MetaClient {
        MetaClient::new(&test_connection(&server.url()), &ClientSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_sends_bearer_and_content_type() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/meta/project")
            .match_header("authorization", format!("Bearer {TEST_KEY}").as_str())
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"data":{"id":"p1","name":"Demo"},"error":null}"#)
            .create_async()
            .await;

        let result = test_client(&server).get_project().await;

        mock.assert_async().await;
        assert_eq!(
            result,
            MetaResult {
                data: Some(ProjectInfo {
                    id: "p1".into(),
                    name: "Demo".into(),
                    description: None,
                    created_at: None,
                }),
                error: None,
                count: None,
            }
        );
    }

    #[tokio::test]
    async fn test_trailing_slash_is_stripped() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/meta/project")
            .with_status(200)
            .with_body(r#"{"data":{"id":"p1","name":"Demo"},"error":null}"#)
            .create_async()
            .await;

        let connection = test_connection(&format!("{}/", server.url()));
        let client = MetaClient::new(&connection, &ClientSettings::default()).unwrap();
        assert_eq!(client.base_url(), server.url());
        assert_eq!(client.get_project().await.error, None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_field_of_failed_response() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/meta/project")
            .with_status(500)
            .with_body(r#"{"error":"boom"}"#)
            .create_async()
            .await;

        let result = test_client(&server).get_project().await;
        assert_eq!(result.data, None);
        assert_eq!(result.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_status_fallback_without_error_field() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/meta/project")
            .with_status(401)
            .with_body("Unauthorized")
            .create_async()
            .await;

        let result = test_client(&server).get_project().await;
        assert_eq!(result.data, None);
        assert_eq!(result.error.as_deref(), Some("HTTP 401"));
    }

    #[tokio::test]
    async fn test_network_failure_never_panics() {
        // Bind and release a port so nothing is listening on it
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let connection = test_connection(&format!("http://127.0.0.1:{port}"));
        let client = MetaClient::new(&connection, &ClientSettings::default()).unwrap();

        let result = client.get_project().await;
        assert_eq!(result.data, None);
        assert!(result.error.unwrap().starts_with("Network error: "));
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_network_error() {
        let client =
            MetaClient::new(&test_connection("not a url"), &ClientSettings::default()).unwrap();
        let result = client.get_project().await;
        assert!(result.error.unwrap().starts_with("Network error: "));
    }

    #[tokio::test]
    async fn test_cancelled_client_resolves_without_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/meta/project")
            .expect(0)
            .create_async()
            .await;

        let cancel = CancellationToken::new();
        let client = test_client(&server).with_cancellation(cancel.clone());
        cancel.cancel();

        let result = client.get_project().await;
        assert_eq!(result.error.as_deref(), Some("Request cancelled"));
        assert!(client.cancellation_token().is_cancelled());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_cancelling_resolves_in_flight_request() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accepts the connection and never answers
        let stalled = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let cancel = CancellationToken::new();
        let client = MetaClient::new(
            &test_connection(&format!("http://{addr}")),
            &ClientSettings::default(),
        )
        .unwrap()
        .with_cancellation(cancel.clone());

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        let result = tokio::time::timeout(Duration::from_secs(5), client.get_project())
            .await
            .expect("pending call resolves once cancelled");
        assert_eq!(result.data, None);
        assert_eq!(result.error.as_deref(), Some("Request cancelled"));
        stalled.abort();
    }

    #[tokio::test]
    async fn test_connection_maps_result() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/meta/project")
            .with_status(200)
            .with_body(r#"{"data":{"id":"p1","name":"Demo"},"error":null}"#)
            .create_async()
            .await;
        let check = test_client(&server).test_connection().await;
        assert!(check.ok);
        assert!(check.error.is_none());

        let mut failing = Server::new_async().await;
        failing
            .mock("GET", "/api/meta/project")
            .with_status(200)
            .with_body(r#"{"data":null,"error":"project not initialized"}"#)
            .create_async()
            .await;
        let check = test_client(&failing).test_connection().await;
        assert!(!check.ok);
        assert_eq!(check.error.as_deref(), Some("project not initialized"));
    }

    #[tokio::test]
    async fn test_count_is_passed_through() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/meta/users")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data":[],"error":null,"count":137}"#)
            .create_async()
            .await;

        let result = test_client(&server).list_users(20, 0).await;
        assert_eq!(result.data, Some(vec![]));
        assert_eq!(result.count, Some(137));
    }
}
