//! Configuration types.

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::conversation::Seed;
use crate::error::ConfigError;
use crate::session::{DEFAULT_PAGE_SIZE, SessionConfig, SessionMode};
use crate::storage::DEFAULT_HISTORY_FILE;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Application configuration, built from `CONVO_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON file holding the conversation.
    pub history_file: PathBuf,
    /// Directory that receives timestamped snapshots.
    pub snapshot_dir: PathBuf,
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup. Unset variables take
    /// their defaults; set but malformed ones are errors.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let history_file = var("CONVO_HISTORY_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE));

        let snapshot_dir = var("CONVO_SNAPSHOT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let bind_addr = var("CONVO_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| invalid("CONVO_BIND_ADDR", e))?;

        let mode = match var("CONVO_MODE") {
            Some(s) => s.trim().parse::<SessionMode>().map_err(|e| invalid("CONVO_MODE", e))?,
            None => SessionMode::default(),
        };

        let seed = match var("CONVO_SEED") {
            Some(s) => s.trim().parse::<Seed>().map_err(|e| invalid("CONVO_SEED", e))?,
            None => Seed::default(),
        };

        let page_size = match var("CONVO_PAGE_SIZE") {
            Some(s) => parse_page_size(s.trim())?,
            None => NonZeroUsize::new(DEFAULT_PAGE_SIZE),
        };

        Ok(Self {
            history_file,
            snapshot_dir,
            bind_addr,
            session: SessionConfig {
                mode,
                page_size,
                seed,
            },
        })
    }
}

/// `0` or `none` turns paging off.
fn parse_page_size(s: &str) -> Result<Option<NonZeroUsize>, ConfigError> {
    if s.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let n: usize = s.parse().map_err(|e| invalid("CONVO_PAGE_SIZE", e))?;
    Ok(NonZeroUsize::new(n))
}

fn invalid(key: &str, message: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}
