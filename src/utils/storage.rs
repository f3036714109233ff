// tasktracker-service/src/utils/storage.rs
//
// Table storage shared by every service. Rows live in memory behind a single
// mutex; unique constraints are checked while the lock is held, so they are the
// authoritative guard against concurrent duplicate inserts. When a snapshot path
// is configured, the tables are reloaded from it at startup and rewritten after
// every successful mutation. A mutation only becomes visible once its snapshot
// is on disk.
use crate::models::{Activity, Invitation, Membership, Project, ServiceError, Task, User, Workspace};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Tables {
    pub users: HashMap<String, User>,
    pub workspaces: HashMap<String, Workspace>,
    pub memberships: HashMap<String, Membership>,
    pub projects: HashMap<String, Project>,
    pub tasks: HashMap<String, Task>,
    pub invitations: HashMap<String, Invitation>,
    pub activities: Vec<Activity>,
}

#[derive(Clone)]
pub struct Store {
    tables: Arc<Mutex<Tables>>,
    snapshot: Option<PathBuf>,
}

impl Store {
    pub fn in_memory() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            snapshot: None,
        }
    }

    // Open a snapshot-backed store, loading existing rows if the file exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ServiceError> {
        let path = path.as_ref().to_path_buf();

        let tables = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                error!("Failed to read storage snapshot {:?}: {:?}", path, e);
                ServiceError::InternalServerError
            })?;
            let tables: Tables = serde_json::from_str(&content).map_err(|e| {
                error!("Failed to parse storage snapshot {:?}: {:?}", path, e);
                ServiceError::InternalServerError
            })?;
            info!(
                "Loaded storage snapshot: {} users, {} workspaces, {} tasks",
                tables.users.len(),
                tables.workspaces.len(),
                tables.tasks.len()
            );
            tables
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    error!("Failed to create storage directory {:?}: {:?}", parent, e);
                    ServiceError::InternalServerError
                })?;
            }
            info!("Creating new storage snapshot at {:?}", path);
            Tables::default()
        };

        Ok(Self {
            tables: Arc::new(Mutex::new(tables)),
            snapshot: Some(path),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, ServiceError> {
        self.tables.lock().map_err(|e| {
            error!("Storage lock poisoned: {:?}", e);
            ServiceError::InternalServerError
        })
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> Result<R, ServiceError> {
        let tables = self.lock()?;
        Ok(f(&tables))
    }

    // Run a mutation against a staged copy. The copy replaces the live tables
    // only after both the closure and the snapshot write succeed.
    pub(crate) fn write<R>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<R, ServiceError>,
    ) -> Result<R, ServiceError> {
        let mut tables = self.lock()?;
        let mut staged = tables.clone();
        let result = f(&mut staged)?;
        self.persist(&staged)?;
        *tables = staged;
        Ok(result)
    }

    // Write to a sibling temp file, then rename over the snapshot
    fn persist(&self, tables: &Tables) -> Result<(), ServiceError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(tables).map_err(|e| {
            error!("Failed to serialize storage snapshot: {:?}", e);
            ServiceError::InternalServerError
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| {
            error!("Failed to write storage snapshot {:?}: {:?}", tmp, e);
            ServiceError::InternalServerError
        })?;

        if let Err(e) = fs::rename(&tmp, path) {
            error!("Failed to replace storage snapshot {:?}: {:?}", path, e);
            let _ = fs::remove_file(&tmp);
            return Err(ServiceError::InternalServerError);
        }

        debug!("Storage snapshot written to {:?}", path);
        Ok(())
    }
}

// Shared by the per-table modules when a unique index rejects a write
pub(crate) fn unique_violation(constraint: &str) -> ServiceError {
    ServiceError::Conflict(format!("Unique constraint violated: {}", constraint))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_snapshot() -> PathBuf {
        std::env::temp_dir()
            .join(format!("tasktracker-{}", uuid::Uuid::new_v4()))
            .join("db.json")
    }

    #[test]
    fn snapshot_round_trips_through_disk() {
        let path = temp_snapshot();
        let store = Store::open(&path).unwrap();
        let user = User::new("a@x.com".to_string(), None, None);
        store.insert_user(user.clone()).unwrap();
        assert!(path.exists());

        let reopened = Store::open(&path).unwrap();
        let loaded = reopened.find_user_by_id(&user.id).unwrap().unwrap();
        assert_eq!(loaded.email, "a@x.com");

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn failed_snapshot_write_discards_the_mutation() {
        let path = temp_snapshot();
        let store = Store::open(&path).unwrap();
        let ann = User::new("ann@x.com".to_string(), None, None);
        store.insert_user(ann.clone()).unwrap();

        // A directory where the snapshot file should be makes the rename fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let bob = User::new("bob@x.com".to_string(), None, None);
        assert!(matches!(
            store.insert_user(bob.clone()),
            Err(ServiceError::InternalServerError)
        ));
        assert!(store.find_user_by_email("bob@x.com").unwrap().is_none());
        assert!(store.find_user_by_id(&ann.id).unwrap().is_some());
        assert!(!path.with_extension("json.tmp").exists());

        // Once the disk recovers the same insert goes through
        fs::remove_dir(&path).unwrap();
        store.insert_user(bob).unwrap();
        let reopened = Store::open(&path).unwrap();
        assert!(reopened.find_user_by_email("bob@x.com").unwrap().is_some());
        assert!(reopened.find_user_by_email("ann@x.com").unwrap().is_some());

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn failed_writes_leave_tables_untouched() {
        let store = Store::in_memory();
        let result: Result<(), ServiceError> = store.write(|_| Err(ServiceError::BadRequest("nope".to_string())));
        assert!(result.is_err());
        assert_eq!(store.read(|t| t.users.len()).unwrap(), 0);
    }
}
