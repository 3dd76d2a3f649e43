pub mod storage;

pub use storage::{ConnectionStorage, FileStorage, STORAGE_NAMESPACE};
#[cfg(test)]
pub use storage::MemoryStorage;

use anyhow::Result;
use log::{debug, info};
use time::OffsetDateTime;

use crate::betterbase::model::{Connection, ConnectionDraft, ConnectionSnapshot};

/// Known backend connections and which one is active.
///
/// Reads are served from memory. Every mutation updates memory first and
/// then persists the whole snapshot through the storage backend, so a read
/// right after a write observes it even if persisting failed.
pub struct ConnectionStore<S: ConnectionStorage> {
    storage: S,
    snapshot: ConnectionSnapshot,
}

impl<S: ConnectionStorage> ConnectionStore<S> {
    pub fn load(storage: S) -> Result<Self> {
        let snapshot = storage.load()?;
        Ok(Self { storage, snapshot })
    }

    pub fn connections(&self) -> &[Connection] {
        &self.snapshot.connections
    }

    pub fn active_id(&self) -> Option<&str> {
        self.snapshot.active_id.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&Connection> {
        self.snapshot.connections.iter().find(|c| c.id == id)
    }

    pub fn location(&self) -> String {
        self.storage.location()
    }

    /// The connection the active id points at. `None` when nothing is active
    /// or the active id no longer matches a stored connection.
    pub fn get_active(&self) -> Option<&Connection> {
        self.active_id().and_then(|id| self.get(id))
    }

    /// Stores a new profile and makes it active. Duplicate URLs are allowed,
    /// each profile is independent.
    pub fn add_connection(&mut self, draft: ConnectionDraft) -> Result<Connection> {
        let connection = Connection {
            id: self.next_id(),
            name: draft.name,
            url: draft.url,
            service_role_key: draft.service_role_key,
            project_id: draft.project_id,
            added_at: OffsetDateTime::now_utc(),
            last_connected_at: None,
        };
        info!("Adding connection {} ({})", connection.id, connection.url);

        self.snapshot.active_id = Some(connection.id.clone());
        self.snapshot.connections.push(connection.clone());
        self.persist()?;
        Ok(connection)
    }

    /// Removes a profile. If it was active, the first remaining profile is
    /// promoted, or the active slot is cleared when none remain.
    pub fn remove_connection(&mut self, id: &str) -> Result<()> {
        let before = self.snapshot.connections.len();
        self.snapshot.connections.retain(|c| c.id != id);
        if self.snapshot.connections.len() == before {
            debug!("remove_connection: no connection with id {id}");
            return Ok(());
        }

        if self.active_id() == Some(id) {
            self.snapshot.active_id = self.snapshot.connections.first().map(|c| c.id.clone());
            info!(
                "Removed active connection {id}, now active: {:?}",
                self.snapshot.active_id
            );
        } else {
            info!("Removed connection {id}");
        }
        self.persist()
    }

    /// Sets the active id without checking that it exists; use
    /// [`Self::get_active`] to read it back safely.
    pub fn set_active(&mut self, id: &str) -> Result<()> {
        self.snapshot.active_id = Some(id.to_string());
        self.persist()
    }

    pub fn update_last_connected(&mut self, id: &str) -> Result<()> {
        let Some(connection) = self.snapshot.connections.iter_mut().find(|c| c.id == id) else {
            return Ok(());
        };
        connection.last_connected_at = Some(OffsetDateTime::now_utc());
        self.persist()
    }

    pub fn rename_connection(&mut self, id: &str, name: &str) -> Result<()> {
        let Some(connection) = self.snapshot.connections.iter_mut().find(|c| c.id == id) else {
            return Ok(());
        };
        connection.name = name.to_string();
        self.persist()
    }

    fn next_id(&self) -> String {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(&self.snapshot)
    }
}
