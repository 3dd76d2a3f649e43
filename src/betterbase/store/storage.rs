use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
#[cfg(test)]
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::betterbase::model::ConnectionSnapshot;

/// Namespace of the persisted connection blob.
pub const STORAGE_NAMESPACE: &str = "betterbase-connections";

/// Backing store for the connection collection.
pub trait ConnectionStorage: Send + Sync {
    /// Returns an empty snapshot if nothing has been persisted yet (first run)
    fn load(&self) -> Result<ConnectionSnapshot>;

    fn save(&self, snapshot: &ConnectionSnapshot) -> Result<()>;

    /// Human readable location of the data, for status output
    fn location(&self) -> String;
}

/// Keeps the snapshot in memory only. Clones share the same snapshot, so a
/// test can hand one clone to a store and inspect what was persisted through
/// the other.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    snapshot: Arc<Mutex<ConnectionSnapshot>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        self.snapshot
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl ConnectionStorage for MemoryStorage {
    fn load(&self) -> Result<ConnectionSnapshot> {
        Ok(self.snapshot())
    }

    fn save(&self, snapshot: &ConnectionSnapshot) -> Result<()> {
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|_| anyhow::anyhow!("In-memory connection storage is poisoned"))?;
        *guard = snapshot.clone();
        Ok(())
    }

    fn location(&self) -> String {
        format!("memory:{STORAGE_NAMESPACE}")
    }
}

/// TOML file on disk. The file holds plaintext service-role keys, so it is
/// created with owner-only permissions on Unix.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConnectionStorage for FileStorage {
    fn load(&self) -> Result<ConnectionSnapshot> {
        if !self.path.exists() {
            info!(
                "No connections file at {}, starting empty",
                self.path.display()
            );
            return Ok(ConnectionSnapshot::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let snapshot: ConnectionSnapshot = toml::from_str(&content)
            .with_context(|| format!("Invalid connections file {}", self.path.display()))?;
        info!(
            "Loaded connections: count={}, active={:?}",
            snapshot.connections.len(),
            snapshot.active_id
        );
        Ok(snapshot)
    }

    fn save(&self, snapshot: &ConnectionSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        // Set restrictive file permissions on Unix systems (0600 = rw-------)
        #[cfg(unix)]
        let mut file = {
            use std::os::unix::fs::OpenOptionsExt;
            OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .mode(0o600)
                .open(&self.path)?
        };

        #[cfg(not(unix))]
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&self.path)?;

        let content = toml::to_string(snapshot)?;
        file.write_all(content.as_bytes())?;
        debug!("Persisted connections to {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::betterbase::model::Connection;
    use time::macros::datetime;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("bbdash-test-{}", uuid::Uuid::new_v4()))
            .join(format!("{STORAGE_NAMESPACE}.toml"))
    }

    fn sample_snapshot() -> ConnectionSnapshot {
        ConnectionSnapshot {
            active_id: Some("c1".into()),
            connections: vec![Connection {
                id: "c1".into(),
                name: "Demo".into(),
                url: "http://localhost:3001".into(),
                service_role_key: "bb_service_test".into(),
                project_id: "p1".into(),
                added_at: datetime!(2024-05-01 10:00 UTC),
                last_connected_at: Some(datetime!(2024-05-02 08:30 UTC)),
            }],
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let storage = FileStorage::new(temp_path());
        assert_eq!(storage.load().unwrap(), ConnectionSnapshot::default());
    }

    #[test]
    fn file_storage_persists_snapshot() {
        let path = temp_path();
        let storage = FileStorage::new(&path);
        storage.save(&sample_snapshot()).unwrap();

        let reloaded = FileStorage::new(&path).load().unwrap();
        assert_eq!(reloaded, sample_snapshot());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn file_storage_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_path();
        FileStorage::new(&path).save(&sample_snapshot()).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn invalid_file_is_an_error() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "connections = 3").unwrap();

        assert!(FileStorage::new(&path).load().is_err());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn memory_storage_clones_share_state() {
        let storage = MemoryStorage::new();
        let observer = storage.clone();
        storage.save(&sample_snapshot()).unwrap();
        assert_eq!(observer.snapshot(), sample_snapshot());
    }
}
