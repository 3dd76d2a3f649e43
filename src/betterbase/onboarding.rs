use anyhow::Result;
use log::{info, warn};

use crate::betterbase::client::MetaClient;
use crate::betterbase::config::ClientSettings;
use crate::betterbase::model::{Connection, ConnectionDraft};
use crate::betterbase::store::{ConnectionStorage, ConnectionStore};
use crate::betterbase::traits::ProjectOperations;

/// A candidate connection as entered by the operator.
#[derive(Clone)]
pub struct Candidate {
    /// Display name; the backend project name is used when empty
    pub name: Option<String>,
    pub url: String,
    pub service_role_key: String,
}

/// Validates a candidate against its backend and persists it on success.
///
/// The project-info fetch doubles as the connection test. The stored profile
/// takes its `project_id` from the backend. Nothing is stored when the
/// backend reports an error.
pub async fn connect<S: ConnectionStorage>(
    store: &mut ConnectionStore<S>,
    candidate: Candidate,
    settings: &ClientSettings,
) -> Result<Connection> {
    let mut draft = ConnectionDraft {
        name: candidate.name.clone().unwrap_or_default(),
        url: candidate.url.trim().to_string(),
        service_role_key: candidate.service_role_key.trim().to_string(),
        project_id: String::new(),
    };

    let client = MetaClient::new(&draft.to_transient(), settings)?;
    let result = client.get_project().await;
    if let Some(error) = result.error {
        warn!("Connection test against {} failed: {error}", draft.url);
        return Err(anyhow::anyhow!("Connection failed: {error}"));
    }
    let project = result
        .data
        .ok_or_else(|| anyhow::anyhow!("Connection failed: backend returned no project"))?;

    draft.project_id = project.id;
    if draft.name.trim().is_empty() {
        draft.name = project.name;
    }

    let connection = store.add_connection(draft)?;
    store.update_last_connected(&connection.id)?;
    info!(
        "Connected to project {} as {}",
        connection.project_id, connection.id
    );
    Ok(store.get(&connection.id).cloned().unwrap_or(connection))
}
