use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "super::timestamp")]
    pub created_at: Option<OffsetDateTime>,
}

/// Aggregate counters shown on the overview page. Counters the backend
/// doesn't report default to zero.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    #[serde(default)]
    pub tables: u64,
    #[serde(default)]
    pub users: u64,
    #[serde(default)]
    pub requests_today: u64,
    #[serde(default)]
    pub errors_today: u64,
    #[serde(default)]
    pub storage_bytes: u64,
    #[serde(default)]
    pub functions: u64,
    #[serde(default)]
    pub webhooks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    /// Only a prefix is ever returned, never the full secret.
    #[serde(default)]
    pub key_prefix: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, with = "super::timestamp")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "super::timestamp")]
    pub last_used_at: Option<OffsetDateTime>,
}

/// Database provider metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub provider: String,
    #[serde(default)]
    pub dialect: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub supports_rls: bool,
    #[serde(default)]
    pub supports_realtime: bool,
}
