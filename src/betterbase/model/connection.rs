use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A saved profile pointing at one BetterBase instance.
#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct Connection {
    pub id: String,
    pub name: String,
    pub url: String,
    pub service_role_key: String,
    pub project_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_connected_at: Option<OffsetDateTime>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("url", &self.url)
            .field("service_role_key", &"***redacted***")
            .field("project_id", &self.project_id)
            .field("added_at", &self.added_at)
            .field("last_connected_at", &self.last_connected_at)
            .finish()
    }
}

/// Fields supplied by the caller when adding a connection. The store
/// synthesizes `id` and `added_at`.
#[derive(Clone, PartialEq, Default)]
pub struct ConnectionDraft {
    pub name: String,
    pub url: String,
    pub service_role_key: String,
    pub project_id: String,
}

impl std::fmt::Debug for ConnectionDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionDraft")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("service_role_key", &"***redacted***")
            .field("project_id", &self.project_id)
            .finish()
    }
}

impl ConnectionDraft {
    /// Materializes the draft as a transient connection, used to talk to a
    /// backend before the profile is persisted.
    pub fn to_transient(&self) -> Connection {
        Connection {
            id: String::new(),
            name: self.name.clone(),
            url: self.url.clone(),
            service_role_key: self.service_role_key.clone(),
            project_id: self.project_id.clone(),
            added_at: OffsetDateTime::now_utc(),
            last_connected_at: None,
        }
    }
}

/// Everything the store persists: the active pointer and the full collection.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct ConnectionSnapshot {
    pub active_id: Option<String>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}
