//! Service wiring: the store, the admin site and upload storage.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use medprocure_admin::{AdminResult, AdminSite};
use medprocure_infra::{FileStorage, InMemoryFileStorage, JsonSnapshot, LocalFileStorage, Store};
use medprocure_process::schema;

use crate::config::AppConfig;

/// Shared state handed to every handler.
pub struct AppServices {
    pub admin: AdminSite,
    pub files: Arc<dyn FileStorage>,
    pub max_upload_bytes: usize,
}

impl AppServices {
    pub fn new(store: Arc<Store>, files: Arc<dyn FileStorage>, max_upload_bytes: usize) -> AdminResult<Self> {
        Ok(Self {
            admin: AdminSite::with_defaults(store)?.with_files(files.clone()),
            files,
            max_upload_bytes,
        })
    }

    /// Services described by `config`: snapshot-backed when a data file is set.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store = match &config.data_file {
            Some(path) => Store::open(schema(), JsonSnapshot::new(path))
                .with_context(|| format!("open store snapshot {}", path.display()))?,
            None => Store::in_memory(schema())?,
        };
        let files = LocalFileStorage::new(&config.media_root);
        info!(media_root = %config.media_root.display(), "upload storage ready");

        Ok(Self::new(Arc::new(store), Arc::new(files), config.max_upload_bytes)?)
    }

    /// Volatile services for tests.
    pub fn in_memory(max_upload_bytes: usize) -> AdminResult<Self> {
        let store = Store::in_memory(schema()).map_err(medprocure_admin::AdminError::from)?;
        Self::new(Arc::new(store), Arc::new(InMemoryFileStorage::new()), max_upload_bytes)
    }
}
