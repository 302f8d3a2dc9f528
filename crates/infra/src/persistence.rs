//! Where the store's tables live between restarts.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use uuid::Uuid;

use medprocure_core::{DomainError, DomainResult};

use crate::store::Tables;

/// Durable home of the store contents.
///
/// `save` receives the complete tables after every committed write; a failed
/// save aborts the write.
pub trait Persistence: Send + Sync {
    /// Previously saved tables, `None` for a fresh store.
    fn load(&self) -> DomainResult<Option<Tables>>;

    fn save(&self, tables: &Tables) -> DomainResult<()>;
}

/// Keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryPersistence;

impl Persistence for MemoryPersistence {
    fn load(&self) -> DomainResult<Option<Tables>> {
        Ok(None)
    }

    fn save(&self, _tables: &Tables) -> DomainResult<()> {
        Ok(())
    }
}

/// The whole store as one JSON document, rewritten atomically on each commit.
#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    path: PathBuf,
}

impl JsonSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for JsonSnapshot {
    fn load(&self) -> DomainResult<Option<Tables>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no snapshot yet; starting empty");
                return Ok(None);
            }
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "read {}: {e}",
                    self.path.display()
                )));
            }
        };

        let tables = serde_json::from_slice(&bytes).map_err(|e| {
            DomainError::storage(format!("corrupt snapshot {}: {e}", self.path.display()))
        })?;
        info!(path = %self.path.display(), bytes = bytes.len(), "snapshot loaded");
        Ok(Some(tables))
    }

    fn save(&self, tables: &Tables) -> DomainResult<()> {
        let bytes = serde_json::to_vec_pretty(tables)
            .map_err(|e| DomainError::storage(format!("encode snapshot: {e}")))?;
        write_atomic(&self.path, &bytes)
            .map_err(|e| DomainError::storage(format!("write {}: {e}", self.path.display())))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "snapshot saved");
        Ok(())
    }
}

/// Write `data` to a sibling temp file, sync it, then rename over `path`.
///
/// Readers see either the old or the new contents, never a partial file.
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(format!(".{}.tmp", Uuid::now_v7().simple()));
    let temp = path.with_file_name(temp_name);

    let written = (|| {
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&temp)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&temp, path)
    })();

    if written.is_err() {
        let _ = fs::remove_file(&temp);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use medprocure_catalog::Warehouse;
    use medprocure_process::{schema, Process};

    #[test]
    fn snapshot_survives_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("store.json");

        let process_id = {
            let store = Store::open(schema(), JsonSnapshot::new(&path)).unwrap();
            store.insert(&Warehouse::new("Lisbon")).unwrap();
            let process = store.insert(&Process::new(Some(12))).unwrap();
            store.delete("process", process.id).unwrap();
            store.insert(&Process::new(Some(13))).unwrap().id
        };

        let store = Store::open(schema(), JsonSnapshot::new(&path)).unwrap();
        assert_eq!(store.fetch::<Process>(process_id).unwrap().record.code, Some(13));
        assert_eq!(store.all::<Warehouse>().unwrap()[0].record.name, "Lisbon");
        // Deleted ids stay burnt across restarts.
        assert_eq!(store.insert(&Process::new(None)).unwrap().id.get(), 3);
    }

    #[test]
    fn missing_snapshot_means_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = JsonSnapshot::new(dir.path().join("absent.json"));
        assert_eq!(snapshot.load().unwrap(), None);
    }

    #[test]
    fn corrupt_snapshot_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, b"{not json").unwrap();

        let err = Store::open(schema(), JsonSnapshot::new(&path)).unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }

    #[test]
    fn atomic_write_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"two");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    struct FailingPersistence;

    impl Persistence for FailingPersistence {
        fn load(&self) -> DomainResult<Option<Tables>> {
            Ok(None)
        }

        fn save(&self, _tables: &Tables) -> DomainResult<()> {
            Err(DomainError::storage("disk full"))
        }
    }

    #[test]
    fn failed_saves_roll_the_write_back() {
        let store = Store::open(schema(), FailingPersistence).unwrap();
        let err = store.insert(&Process::new(None)).unwrap_err();

        assert_eq!(err, DomainError::storage("disk full"));
        assert_eq!(store.count("process").unwrap(), 0);
    }
}
