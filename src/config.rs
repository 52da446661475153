//! Configuration management for the contact directory.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file. Nothing here writes to stdout, which carries the MCP protocol.

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::path::PathBuf;

/// Configuration for the contact directory server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of a remote contact store. `None` selects the in-process store.
    pub contacts_api_url: Option<String>,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Rows per page for a new session (default: 5)
    pub default_page_size: usize,

    /// Directory export files are written into (default: ".")
    pub export_dir: PathBuf,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `CONTACTS_API_URL`: Base URL of a remote contact store
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `DEFAULT_PAGE_SIZE`: Rows per page (default: 5)
    /// - `EXPORT_DIR`: Export output directory (default: ".")
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // dotenvy does not print to stdout
        let _ = dotenvy::dotenv();

        let contacts_api_url = match env::var("CONTACTS_API_URL") {
            Ok(url) if !url.trim().is_empty() => {
                let url = url.trim().to_string();
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::InvalidValue {
                        var: "CONTACTS_API_URL".to_string(),
                        reason: "Must start with http:// or https://".to_string(),
                    });
                }
                Some(url)
            }
            _ => None,
        };

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        let default_page_size = Self::parse_env_usize("DEFAULT_PAGE_SIZE", 5)?;

        if default_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                var: "DEFAULT_PAGE_SIZE".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        let export_dir = env::var("EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            contacts_api_url,
            request_timeout,
            default_page_size,
            export_dir,
            log_level,
        })
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            contacts_api_url: None,
            request_timeout: 10,
            default_page_size: 5,
            export_dir: PathBuf::from("."),
            log_level: "error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: [&str; 5] = [
        "CONTACTS_API_URL",
        "REQUEST_TIMEOUT",
        "DEFAULT_PAGE_SIZE",
        "EXPORT_DIR",
        "LOG_LEVEL",
    ];

    // Sets vars for one test and clears every config var on drop
    struct EnvGuard;

    impl EnvGuard {
        fn new() -> Self {
            for var in VARS {
                env::remove_var(var);
            }
            EnvGuard
        }

        fn set(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for var in VARS {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.contacts_api_url, None);
        assert_eq!(config.request_timeout, 10);
        assert_eq!(config.default_page_size, 5);
        assert_eq!(config.export_dir, PathBuf::from("."));
    }

    #[test]
    #[serial]
    fn test_config_from_env_invalid_url() {
        let mut guard = EnvGuard::new();
        guard.set("CONTACTS_API_URL", "not-a-url");

        let result = Config::from_env();
        match result {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "CONTACTS_API_URL"),
            other => panic!("Expected InvalidValue, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_from_env_zero_page_size() {
        let mut guard = EnvGuard::new();
        guard.set("DEFAULT_PAGE_SIZE", "0");

        let result = Config::from_env();
        match result {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "DEFAULT_PAGE_SIZE"),
            other => panic!("Expected InvalidValue, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_from_env_invalid_timeout() {
        let mut guard = EnvGuard::new();
        guard.set("REQUEST_TIMEOUT", "soon");

        assert!(Config::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_config_from_env_valid() {
        let mut guard = EnvGuard::new();
        guard.set("CONTACTS_API_URL", "http://localhost:5000");
        guard.set("REQUEST_TIMEOUT", "3");
        guard.set("DEFAULT_PAGE_SIZE", "10");
        guard.set("EXPORT_DIR", "/tmp/exports");

        let config = Config::from_env().unwrap();
        assert_eq!(
            config.contacts_api_url.as_deref(),
            Some("http://localhost:5000")
        );
        assert_eq!(config.request_timeout, 3);
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
    }

    #[test]
    #[serial]
    fn test_config_blank_url_selects_local_store() {
        let mut guard = EnvGuard::new();
        guard.set("CONTACTS_API_URL", "   ");

        let config = Config::from_env().unwrap();
        assert_eq!(config.contacts_api_url, None);
    }
}
