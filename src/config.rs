use std::collections::HashMap;
use std::time::Duration;

use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crl: CrlConfig,
}

/// Settings for the CRL cache and fetch subsystem.
#[derive(Debug, Clone, Deserialize)]
pub struct CrlConfig {
    /// Directory used by disk-backed caches
    pub cache_dir: String,
    /// Lifetime of the memory tier in the hybrid cache
    pub memory_ttl_millis: u64,
    /// Interval between background refresh cycles
    pub refresh_interval_secs: u64,
    /// Delay before the first background refresh cycle
    pub initial_delay_secs: u64,
    /// HTTP timeout for CRL downloads
    pub http_timeout_secs: u64,
}

impl CrlConfig {
    pub fn memory_ttl(&self) -> Duration {
        Duration::from_millis(self.memory_ttl_millis)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("crl.cache_dir", "crl-cache")?
            .set_default("crl.memory_ttl_millis", 60_000)?
            .set_default("crl.refresh_interval_secs", 900)?
            .set_default("crl.initial_delay_secs", 30)?
            .set_default("crl.http_timeout_secs", 30)?
            .add_source(File::with_name("config/settings").required(false));

        // If env_vars is provided, we use it instead of system environment
        // This is to avoid systems variables pollution across tests
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // Use system environment variables
            // Should be in the format APP_CRL__CACHE_DIR
            builder = builder.add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        builder.build()?.try_deserialize()
    }
}
