//! Runtime configuration, read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

pub const BIND_ADDR: &str = "MEDPROCURE_BIND_ADDR";
pub const DATA_FILE: &str = "MEDPROCURE_DATA_FILE";
pub const MEDIA_ROOT: &str = "MEDPROCURE_MEDIA_ROOT";
pub const MAX_UPLOAD_BYTES: &str = "MEDPROCURE_MAX_UPLOAD_BYTES";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MEDIA_ROOT: &str = "./media";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not valid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// JSON snapshot backing the store; `None` keeps records in memory only.
    pub data_file: Option<PathBuf>,
    pub media_root: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Read the process environment. Call `dotenvy::dotenv()` first to honour a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; missing values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr = value(BIND_ADDR)
            .unwrap_or_else(|| {
                warn!("{BIND_ADDR} not set; listening on {DEFAULT_BIND_ADDR}");
                DEFAULT_BIND_ADDR.to_string()
            })
            .parse()
            .map_err(|e| ConfigError::Invalid {
                var: BIND_ADDR,
                reason: format!("{e}"),
            })?;

        let data_file = value(DATA_FILE).map(PathBuf::from);
        if data_file.is_none() {
            warn!("{DATA_FILE} not set; records are kept in memory and lost on exit");
        }

        let media_root = value(MEDIA_ROOT).map(PathBuf::from).unwrap_or_else(|| {
            warn!("{MEDIA_ROOT} not set; storing uploads under {DEFAULT_MEDIA_ROOT}");
            PathBuf::from(DEFAULT_MEDIA_ROOT)
        });

        let max_upload_bytes = match value(MAX_UPLOAD_BYTES) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: MAX_UPLOAD_BYTES,
                        reason: format!("expected a positive byte count, got `{raw}`"),
                    });
                }
            },
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            bind_addr,
            data_file,
            media_root,
            max_upload_bytes,
        })
    }
}
