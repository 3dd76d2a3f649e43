use async_trait::async_trait;
use log::debug;

use super::result::MetaResult;
use super::MetaClient;
use crate::betterbase::model::meta::{TableInfo, TablePolicies, TableRow};
use crate::betterbase::traits::TableOperations;

#[async_trait]
impl TableOperations for MetaClient {
    async fn list_tables(&self) -> MetaResult<Vec<TableInfo>> {
        self.get(&["tables"], vec![]).await
    }

    async fn get_table_rows(&self, table: &str, limit: u32, offset: u32) -> MetaResult<Vec<TableRow>> {
        debug!("get_table_rows called with table={table}, limit={limit}, offset={offset}");
        self.get(
            &["tables", table, "rows"],
            vec![("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }

    async fn list_rls_policies(&self) -> MetaResult<Vec<TablePolicies>> {
        self.get(&["rls", "policies"], vec![]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::betterbase::client::tests::test_client;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_get_table_rows() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/meta/tables/users/rows")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "50".into()),
                Matcher::UrlEncoded("offset".into(), "0".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"data":[{"id":1,"email":"a@example.com"}],"error":null}"#)
            .create_async()
            .await;

        let result = test_client(&server).get_table_rows("users", 50, 0).await;

        mock.assert_async().await;
        let expected = serde_json::json!([{"id": 1, "email": "a@example.com"}]);
        assert_eq!(serde_json::to_value(result.data.unwrap()).unwrap(), expected);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_zero_limit_is_not_clamped() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/meta/tables/users/rows")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "0".into()),
                Matcher::UrlEncoded("offset".into(), "0".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"data":[],"error":null}"#)
            .create_async()
            .await;

        let result = test_client(&server).get_table_rows("users", 0, 0).await;

        mock.assert_async().await;
        assert_eq!(result.data, Some(vec![]));
    }

    #[tokio::test]
    async fn test_list_tables() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/meta/tables")
            .with_status(200)
            .with_body(
                r#"{"data":[{"name":"users","rowCount":2,"columns":[{"name":"id","type":"integer","primaryKey":true}]}],"error":null}"#,
            )
            .create_async()
            .await;

        let tables = test_client(&server).list_tables().await.data.unwrap();
        assert_eq!(tables[0].name, "users");
        assert_eq!(tables[0].row_count, Some(2));
        assert!(tables[0].columns[0].primary_key);
        assert!(!tables[0].columns[0].nullable);
    }

    #[tokio::test]
    async fn test_list_rls_policies() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/meta/rls/policies")
            .with_status(200)
            .with_body(
                r#"{"data":[{"table":"posts","rlsEnabled":true,"policies":[{"name":"owner_read","command":"SELECT","using":"auth.uid() = user_id"}]}],"error":null}"#,
            )
            .create_async()
            .await;

        let tables = test_client(&server).list_rls_policies().await.data.unwrap();
        assert!(tables[0].rls_enabled);
        assert_eq!(tables[0].policies[0].command, "SELECT");
        assert!(tables[0].policies[0].roles.is_empty());
    }
}
