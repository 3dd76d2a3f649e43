use async_trait::async_trait;
use log::debug;

use super::result::MetaResult;
use super::MetaClient;
use crate::betterbase::model::meta::{LogBucket, LogFilter, RequestLog};
use crate::betterbase::traits::LogOperations;

#[async_trait]
impl LogOperations for MetaClient {
    async fn list_logs(&self, filter: &LogFilter) -> MetaResult<Vec<RequestLog>> {
        debug!("list_logs called with {filter:?}");
        self.get(&["logs"], filter.query_pairs()).await
    }

    async fn get_log_chart(&self) -> MetaResult<Vec<LogBucket>> {
        self.get(&["logs", "chart"], vec![]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::betterbase::client::tests::test_client;
    use crate::betterbase::model::meta::MethodFilter;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_list_logs_with_filters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/meta/logs")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "10".into()),
                Matcher::UrlEncoded("offset".into(), "0".into()),
                Matcher::UrlEncoded("method".into(), "GET".into()),
                Matcher::UrlEncoded("statusMin".into(), "500".into()),
                Matcher::UrlEncoded("statusMax".into(), "599".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"data":[{"id":"l1","method":"GET","path":"/api/posts","status":503,"durationMs":12.5}],"error":null,"count":1}"#,
            )
            .create_async()
            .await;

        let filter = LogFilter {
            limit: 10,
            method: Some(MethodFilter::Get),
            status_min: Some(500),
            status_max: Some(599),
            ..LogFilter::default()
        };
        let result = test_client(&server).list_logs(&filter).await;

        mock.assert_async().await;
        let logs = result.data.unwrap();
        assert_eq!(logs[0].status, 503);
        assert_eq!(logs[0].duration_ms, Some(12.5));
    }

    #[tokio::test]
    async fn test_get_log_chart() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/meta/logs/chart")
            .with_status(200)
            .with_body(r#"{"data":[{"hour":"10:00","requests":42,"errors":3},{"hour":"11:00"}],"error":null}"#)
            .create_async()
            .await;

        let buckets = test_client(&server).get_log_chart().await.data.unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].errors, 3);
        assert_eq!(buckets[1].requests, 0);
    }
}
