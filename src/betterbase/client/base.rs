use anyhow::{Context, Result};
use log::{debug, info, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::result::MetaResult;
use crate::betterbase::config::{expand_env_vars, ClientSettings};
use crate::betterbase::model::Connection;

/// Query, body and extra headers of a single meta-API request.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub query: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
    /// Merged over the default headers; a header set here replaces the default.
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn query(query: Vec<(&'static str, String)>) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub fn body(body: serde_json::Value) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    count: Option<u64>,
}

/// Base HTTP client for the meta API.
/// Owns the credential and builds authenticated requests under `{url}/api/meta`.
#[derive(Clone)]
pub struct BaseClient {
    pub client: reqwest::Client,
    base_url: String,
    service_role_key: String,
    cancel: CancellationToken,
}

impl std::fmt::Debug for BaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseClient")
            .field("base_url", &self.base_url)
            .field("service_role_key", &"***redacted***")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl BaseClient {
    pub fn new(connection: &Connection, settings: &ClientSettings) -> Result<Self> {
        let mut client_builder = reqwest::Client::builder().use_rustls_tls();

        if let Some(timeout) = settings.timeout() {
            client_builder = client_builder.timeout(timeout);
        }

        // Configure proxy if specified in settings (takes priority)
        if let Some(proxy_url) = &settings.proxy {
            let proxy_url = expand_env_vars(proxy_url)?;
            let proxy = reqwest::Proxy::all(&proxy_url)
                .with_context(|| format!("Invalid proxy URL: {proxy_url}"))?;
            client_builder = client_builder.proxy(proxy);
            info!("🔀 Using proxy from settings: {proxy_url}");
        } else {
            // Fall back to standard environment variables if no configured proxy
            if let Ok(http_proxy) = std::env::var("HTTP_PROXY").or_else(|_| std::env::var("http_proxy")) {
                let proxy = reqwest::Proxy::http(&http_proxy)
                    .with_context(|| format!("Invalid HTTP_PROXY: {http_proxy}"))?;
                client_builder = client_builder.proxy(proxy);
                info!("🔀 Using proxy from HTTP_PROXY: {http_proxy}");
            }
            if let Ok(https_proxy) = std::env::var("HTTPS_PROXY").or_else(|_| std::env::var("https_proxy")) {
                let proxy = reqwest::Proxy::https(&https_proxy)
                    .with_context(|| format!("Invalid HTTPS_PROXY: {https_proxy}"))?;
                client_builder = client_builder.proxy(proxy);
                info!("🔀 Using proxy from HTTPS_PROXY: {https_proxy}");
            }
        }

        let service_role_key = expand_env_vars(&connection.service_role_key)
            .context("Failed to resolve the service role key")?;

        Ok(Self {
            client: client_builder.build()?,
            base_url: connection.url.trim_end_matches('/').to_string(),
            service_role_key,
            cancel: CancellationToken::new(),
        })
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/api/meta/{segments...}`, each segment percent-encoded.
    pub fn meta_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base URL '{}'", self.base_url))?;
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("Base URL '{}' cannot have a path", self.base_url))?
            .pop_if_empty()
            .extend(["api", "meta"])
            .extend(segments);
        Ok(url)
    }

    fn headers(&self, overrides: &HeaderMap) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_role_key))
            .context("Service role key is not a valid header value")?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        for name in overrides.keys() {
            headers.remove(name);
        }
        for (name, value) in overrides {
            headers.append(name.clone(), value.clone());
        }
        Ok(headers)
    }

    /// Issues one request and normalizes the outcome. Never retries.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        options: RequestOptions,
    ) -> MetaResult<T> {
        let prepared = self.meta_url(segments).and_then(|url| {
            let headers = self.headers(&options.headers)?;
            Ok((url, headers))
        });
        let (url, headers) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => return MetaResult::failure(format!("Network error: {e:#}")),
        };
        debug!("🔗 {method} {url}");

        let mut request = self
            .client
            .request(method.clone(), url)
            .headers(headers)
            .query(&options.query);
        if let Some(body) = &options.body {
            request = request.body(body.to_string());
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                debug!("Request cancelled: {method} {segments:?}");
                return MetaResult::failure("Request cancelled");
            }
            outcome = exchange => match outcome {
                Ok(exchanged) => exchanged,
                Err(e) => {
                    warn!("Request failed: {method} {segments:?}: {e}");
                    return MetaResult::failure(format!("Network error: {e}"));
                }
            },
        };

        debug!("Response status: {status}");
        normalize(status, &body)
    }
}

/// Maps an HTTP status and raw body onto the uniform result shape.
pub(crate) fn normalize<T: DeserializeOwned>(status: StatusCode, body: &str) -> MetaResult<T> {
    if !status.is_success() {
        return MetaResult::failure(error_message(status, body));
    }

    if body.trim().is_empty() {
        return MetaResult {
            data: None,
            error: None,
            count: None,
        };
    }

    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            log::error!("Failed to decode response body: {e}");
            log::error!(
                "Response body (first 500 chars): {}",
                &body.chars().take(500).collect::<String>()
            );
            return MetaResult::failure(format!("Network error: {e}"));
        }
    };

    // Serde would fill the envelope from an array positionally
    if !value.is_object() {
        return MetaResult::failure("Invalid response: expected a JSON object envelope");
    }

    let envelope: Envelope = match serde_json::from_value(value) {
        Ok(envelope) => envelope,
        Err(e) => return MetaResult::failure(format!("Invalid response: {e}")),
    };

    if let Some(error) = envelope.error {
        return MetaResult {
            data: None,
            error: Some(error),
            count: envelope.count,
        };
    }

    let data = match envelope.data {
        None | Some(serde_json::Value::Null) => None,
        Some(payload) => match serde_json::from_value::<T>(payload) {
            Ok(data) => Some(data),
            Err(e) => {
                log::error!("Response payload did not match the expected shape: {e}");
                return MetaResult::failure(format!("Invalid response: {e}"));
            }
        },
    };

    MetaResult {
        data,
        error: None,
        count: envelope.count,
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = || format!("HTTP {}", status.as_u16());
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback();
    };
    match value.get("error") {
        Some(serde_json::Value::String(message)) if !message.is_empty() => message.clone(),
        None | Some(serde_json::Value::Null | serde_json::Value::String(_)) => fallback(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::OffsetDateTime;

    fn connection(url: &str) -> Connection {
        Connection {
            id: "c1".into(),
            name: "Demo".into(),
            url: url.into(),
            service_role_key: "bb_service_test".into(),
            project_id: "p1".into(),
            added_at: OffsetDateTime::now_utc(),
            last_connected_at: None,
        }
    }

    #[rstest]
    #[case("http://localhost:3001", "http://localhost:3001/api/meta/project")]
    #[case("http://localhost:3001/", "http://localhost:3001/api/meta/project")]
    #[case("http://localhost:3001///", "http://localhost:3001/api/meta/project")]
    #[case("https://example.com/sub/", "https://example.com/sub/api/meta/project")]
    fn meta_url_strips_trailing_slash(#[case] base: &str, #[case] expected: &str) {
        let client = BaseClient::new(&connection(base), &ClientSettings::default()).unwrap();
        assert_eq!(client.meta_url(&["project"]).unwrap().as_str(), expected);
        assert!(!client.base_url().ends_with('/'));
    }

    #[test]
    fn meta_url_encodes_segments() {
        let client =
            BaseClient::new(&connection("http://localhost:3001"), &ClientSettings::default()).unwrap();
        let url = client
            .meta_url(&["storage", "avatars", "files", "users/1 a.png"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3001/api/meta/storage/avatars/files/users%2F1%20a.png"
        );
    }

    #[test]
    fn caller_headers_override_defaults() {
        let client =
            BaseClient::new(&connection("http://localhost:3001"), &ClientSettings::default()).unwrap();
        let mut overrides = HeaderMap::new();
        overrides.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let headers = client.headers(&overrides).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer bb_service_test");
    }

    #[test]
    fn debug_redacts_key() {
        let client =
            BaseClient::new(&connection("http://localhost:3001"), &ClientSettings::default()).unwrap();
        assert!(!format!("{client:?}").contains("bb_service_test"));
    }

    #[rstest]
    #[case(r#"{"error":"boom"}"#, "boom")]
    #[case(r#"{"message":"nope"}"#, "HTTP 500")]
    #[case(r#"{"error":""}"#, "HTTP 500")]
    #[case("<html>oops</html>", "HTTP 500")]
    #[case("", "HTTP 500")]
    fn non_success_status_messages(#[case] body: &str, #[case] expected: &str) {
        let result: MetaResult<serde_json::Value> =
            normalize(StatusCode::INTERNAL_SERVER_ERROR, body);
        assert_eq!(result.data, None);
        assert_eq!(result.error.as_deref(), Some(expected));
    }

    #[test]
    fn success_passes_envelope_through() {
        let result: MetaResult<Vec<u32>> =
            normalize(StatusCode::OK, r#"{"data":[1,2,3],"error":null,"count":42}"#);
        assert_eq!(
            result,
            MetaResult {
                data: Some(vec![1, 2, 3]),
                error: None,
                count: Some(42)
            }
        );
    }

    #[test]
    fn success_with_application_error() {
        let result: MetaResult<Vec<u32>> =
            normalize(StatusCode::OK, r#"{"data":null,"error":"table not found"}"#);
        assert_eq!(result.data, None);
        assert_eq!(result.error.as_deref(), Some("table not found"));
    }

    #[test]
    fn malformed_json_is_a_network_error() {
        let result: MetaResult<Vec<u32>> = normalize(StatusCode::OK, "{not json");
        assert!(result.error.unwrap().starts_with("Network error: "));
    }

    #[rstest]
    #[case(r#"[{"id":"p1","name":"x"}]"#)]
    #[case(r#"[null,"boom"]"#)]
    #[case("true")]
    #[case(r#""data""#)]
    fn non_object_body_is_rejected(#[case] body: &str) {
        let result: MetaResult<serde_json::Value> = normalize(StatusCode::OK, body);
        assert_eq!(result.data, None);
        assert_eq!(
            result.error.as_deref(),
            Some("Invalid response: expected a JSON object envelope")
        );
    }

    #[test]
    fn mismatched_payload_is_rejected() {
        let result: MetaResult<Vec<u32>> = normalize(StatusCode::OK, r#"{"data":"nope"}"#);
        assert_eq!(result.data, None);
        assert!(result.error.unwrap().starts_with("Invalid response: "));
    }
}
