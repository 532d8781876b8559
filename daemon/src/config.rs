//! Daemon configuration with TOML file support.

use std::path::{Path, PathBuf};

use ballot_utils::LogFormat;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Configuration for the daemon.
///
/// Loaded from a TOML file via [`DaemonConfig::from_toml_file`]; command
/// line flags and `BALLOT_*` environment variables override file values.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// LMDB map size in MiB; the hard ceiling on database size.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Send permissive CORS headers so a dashboard on another origin can
    /// call the API.
    #[serde(default)]
    pub cors_allow_any: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./ballot_data")
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_map_size_mb() -> usize {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_size_mb == 0 {
            return Err(ConfigError::Invalid("map_size_mb must be positive".into()));
        }
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_address must not be empty".into()));
        }
        Ok(())
    }

    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            bind_address: default_bind_address(),
            port: default_port(),
            map_size_mb: default_map_size_mb(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            cors_allow_any: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = DaemonConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config, DaemonConfig::default());
        assert_eq!(config.port, 3001);
        assert_eq!(config.map_size_bytes(), 256 * 1024 * 1024);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            port = 8080
            log_format = "json"
            cors_allow_any = true
        "#;
        let config = DaemonConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.cors_allow_any);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            DaemonConfig::from_toml_str("prot = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn zero_map_size_is_invalid() {
        let config = DaemonConfig {
            map_size_mb: 0,
            ..DaemonConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn reads_file_and_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ballot.toml");
        std::fs::write(&path, "data_dir = \"/srv/ballot\"\n").unwrap();
        let config = DaemonConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/ballot"));

        let err = DaemonConfig::from_toml_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
