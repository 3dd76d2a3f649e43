use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, with = "super::timestamp")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "super::timestamp")]
    pub last_sign_in_at: Option<OffsetDateTime>,
}
