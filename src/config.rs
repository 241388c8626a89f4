//! TOML configuration.
//!
//! Lookup order: an explicit path (`--config`), then the path in
//! `QUEUE_CONGESTION_CONFIG`, then the system location, then compiled-in
//! defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classify::Thresholds;
use crate::jobs::normalize::AttributeNames;

pub const CONFIG_ENV: &str = "QUEUE_CONGESTION_CONFIG";
pub const SYSTEM_CONFIG_PATH: &str = "/etc/queue-congestion/queue-congestion.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub classifier: Thresholds,
    #[serde(default)]
    pub attributes: AttributeNames,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// An explicitly requested file must load; otherwise fall back through
    /// the environment variable and the system path to defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => Ok(Self::load_or_default()),
        }
    }

    pub fn load_or_default() -> Self {
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let path = Path::new(&env_path);
            match Self::load(path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "{} set but file could not be loaded, trying fallback",
                        CONFIG_ENV
                    );
                }
            }
        }

        let system_path = Path::new(SYSTEM_CONFIG_PATH);
        if system_path.exists() {
            match Self::load(system_path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        path = %system_path.display(),
                        error = %e,
                        "system config file exists but could not be loaded, using defaults"
                    );
                }
            }
        }

        debug!("no config file found, using compiled-in defaults");
        Self::default()
    }

    /// Apply the `--key` command-line override.
    pub fn with_queue_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key {
            self.attributes.queue_key = key;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum tracing level; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let cfg = Config::default();

        assert_eq!(cfg.classifier.idle_stale_seconds, 360);
        assert_eq!(cfg.classifier.recent_start_seconds, 120);

        assert_eq!(cfg.attributes.queue_key, "MATCH_APF_QUEUE");
        assert_eq!(cfg.attributes.job_status, "JobStatus");
        assert_eq!(cfg.attributes.entered_current_status, "EnteredCurrentStatus");
        assert_eq!(cfg.attributes.as_of, "ServerTime");

        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_parse_example_toml() {
        let toml_str = r#"
[classifier]
idle_stale_seconds = 2000
recent_start_seconds = 360

[attributes]
queue_key = "GlideinEntryName"
as_of = "CurrentTime"

[logging]
level = "debug"
format = "json"
"#;

        let cfg: Config = toml::from_str(toml_str).unwrap();

        assert_eq!(cfg.classifier.idle_stale_seconds, 2000);
        assert_eq!(cfg.classifier.recent_start_seconds, 360);
        assert_eq!(cfg.attributes.queue_key, "GlideinEntryName");
        assert_eq!(cfg.attributes.as_of, "CurrentTime");
        assert_eq!(cfg.attributes.job_status, "JobStatus");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[classifier]
idle_stale_seconds = 600
"#;

        let cfg: Config = toml::from_str(toml_str).unwrap();

        assert_eq!(cfg.classifier.idle_stale_seconds, 600);
        assert_eq!(cfg.classifier.recent_start_seconds, 120);
        assert_eq!(cfg.attributes, AttributeNames::default());
        assert_eq!(cfg.logging, LoggingConfig::default());
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("queue-congestion.toml");
        std::fs::write(
            &path,
            r#"
[attributes]
queue_key = "MATCH_GLIDEIN_Site"
"#,
        )
        .unwrap();

        let cfg = Config::resolve(Some(&path)).unwrap();
        assert_eq!(cfg.attributes.queue_key, "MATCH_GLIDEIN_Site");
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        let result = Config::resolve(Some(Path::new("/nonexistent/path/queue-congestion.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_queue_key_override() {
        let cfg = Config::default().with_queue_key(Some("Owner".to_string()));
        assert_eq!(cfg.attributes.queue_key, "Owner");

        let cfg = Config::default().with_queue_key(None);
        assert_eq!(cfg.attributes.queue_key, "MATCH_APF_QUEUE");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let roundtripped: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(cfg, roundtripped);
    }
}
