use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use hostname_extraction::{ExtractionConfig, MissPolicy};

/// Default request body limit for uploads (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// `postgres://...`, `sqlite:...`, or `memory`
    pub database_url: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub netbios_miss_policy: MissPolicy,
    /// Parent directory for staged uploads; system temp dir when unset
    pub temp_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            max_upload_bytes: match env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v.parse().context("MAX_UPLOAD_BYTES must be a valid number")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            netbios_miss_policy: match env::var("NETBIOS_MISS_POLICY") {
                Ok(v) => v
                    .parse()
                    .map_err(anyhow::Error::msg)
                    .context("NETBIOS_MISS_POLICY must be 'placeholder' or 'skip'")?,
                Err(_) => MissPolicy::default(),
            },
            temp_dir: env::var("TEMP_DIR").ok().map(PathBuf::from),
        })
    }

    /// Configuration for tests and local runs against an in-memory store.
    pub fn in_memory() -> Self {
        Self {
            database_url: "memory".to_string(),
            port: 8080,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            netbios_miss_policy: MissPolicy::default(),
            temp_dir: None,
        }
    }

    /// Extraction settings derived from this configuration.
    pub fn extraction(&self) -> ExtractionConfig {
        ExtractionConfig::new().with_netbios_misses(self.netbios_miss_policy)
    }
}
