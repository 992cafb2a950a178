//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger engine configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Prefix for human-readable journal entry numbers.
    #[serde(default = "default_entry_number_prefix")]
    pub entry_number_prefix: String,
    /// Retry budget for entry-number allocation under write contention.
    #[serde(default = "default_post_retry_attempts")]
    pub post_retry_attempts: u32,
}

fn default_entry_number_prefix() -> String {
    "JE".to_string()
}

fn default_post_retry_attempts() -> u32 {
    3
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            entry_number_prefix: default_entry_number_prefix(),
            post_retry_attempts: default_post_retry_attempts(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("MERIDIAN").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_config_defaults() {
        let cfg = LedgerConfig::default();
        assert_eq!(cfg.entry_number_prefix, "JE");
        assert_eq!(cfg.post_retry_attempts, 3);
    }
}
