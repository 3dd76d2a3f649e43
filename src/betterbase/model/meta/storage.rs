use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageBucket {
    pub name: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub file_count: Option<u64>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default, with = "super::timestamp")]
    pub created_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageFile {
    pub key: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default, with = "super::timestamp")]
    pub last_modified: Option<OffsetDateTime>,
}
