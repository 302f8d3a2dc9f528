//! Logging initialization.
//!
//! Verbosity comes from `RUST_LOG` (default `info`); the output format from
//! `MEDPROCURE_LOG_FORMAT` (`json`, the default, or `text`).

use core::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the [`LogFormat`].
pub const FORMAT_ENV: &str = "MEDPROCURE_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Compact human-readable lines.
    Text,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log format `{0}` (expected `json` or `text`)")]
pub struct UnknownLogFormat(String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" | "pretty" | "compact" => Ok(LogFormat::Text),
            _ => Err(UnknownLogFormat(s.to_string())),
        }
    }
}

impl LogFormat {
    /// Format requested by the environment; unset or unknown values mean JSON.
    pub fn from_env() -> Self {
        std::env::var(FORMAT_ENV)
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

/// Install the global subscriber.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .with_target(false)
            .try_init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .with_target(false)
            .try_init(),
    };
}
