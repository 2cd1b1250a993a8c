//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "TESTLIST";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Default timeout in ms from TESTLIST_TIMEOUT
    pub timeout: Option<u64>,
    /// Output format from TESTLIST_FORMAT
    pub format: Option<String>,
    /// Print filter from TESTLIST_PRINT
    pub print: Option<String>,
    /// Log level from TESTLIST_LOG
    pub log_level: Option<String>,
    /// Config file from TESTLIST_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            timeout: get_env_parse("TIMEOUT"),
            format: get_env("FORMAT"),
            print: get_env("PRINT"),
            log_level: get_env("LOG"),
            config_file: get_env("CONFIG"),
        }
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}
