//! Start-up configuration, read once from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `PAIRS_SEED` | time-derived | board shuffle seed |
//! | `PAIRS_LOG_PATH` | unset | write logs to this file instead of stderr |
//! | `PAIRS_AI_*` | see [`ServerConfig::from_env`] | remote adapter |

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::adapter::ServerConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub seed: u64,
    pub log_path: Option<PathBuf>,
    /// `None` when the adapter is disabled.
    pub adapter: Option<ServerConfig>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup("PAIRS_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(time_seed);

        let log_path = lookup("PAIRS_LOG_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let adapter =
            (!ServerConfig::disabled_by(&lookup)).then(|| ServerConfig::from_lookup(&lookup));

        Self {
            seed,
            log_path,
            adapter,
        }
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
