use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Names the TOML file to load; unset means built-in defaults.
pub const CONFIG_ENV: &str = "REVIEWS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub site_addr: String,
    pub database_path: String,
    /// Replace the store contents with the bundled fixtures at boot
    pub seed_on_start: bool,
    /// flexi_logger spec string, e.g. `info` or `info,boardgame_reviews=debug`
    pub log_level: String,
    /// Write rotated log files here instead of stderr
    pub log_dir: Option<String>,
    pub max_log_file_size: u64,
    pub max_log_files: usize,
    pub workers: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_addr: "127.0.0.1:9090".to_string(),
            database_path: "reviews.db".to_string(),
            seed_on_start: false,
            log_level: "info".to_string(),
            log_dir: None,
            max_log_file_size: 10 * 1024 * 1024, // 10MB
            max_log_files: 5,
            workers: None,
        }
    }
}

impl Config {
    // Config file named by REVIEWS_CONFIG (if any), then env overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().display().to_string();
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path_str.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path_str,
            source,
        })
    }

    /// Applies `REVIEWS_SITE_ADDR`, `REVIEWS_DATABASE_PATH` and
    /// `REVIEWS_LOG_LEVEL` from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("REVIEWS_SITE_ADDR") {
            self.site_addr = addr;
        }
        if let Some(path) = lookup("REVIEWS_DATABASE_PATH") {
            self.database_path = path;
        }
        if let Some(level) = lookup("REVIEWS_LOG_LEVEL") {
            self.log_level = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            site_addr = "0.0.0.0:8080"
            seed_on_start = true
            "#,
        )
        .unwrap();
        assert_eq!(config.site_addr, "0.0.0.0:8080");
        assert!(config.seed_on_start);
        assert_eq!(config.database_path, "reviews.db");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("REVIEWS_DATABASE_PATH", ":memory:"),
            ("REVIEWS_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_path, ":memory:");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.site_addr, Config::default().site_addr);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let dir = env::temp_dir().join(format!("reviews-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        fs::write(&path, "site_addr = [").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        fs::remove_dir_all(&dir).unwrap();
    }
}
