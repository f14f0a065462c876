//! Session configuration loaded from YAML.
//!
//! Every section is optional; missing keys keep their defaults.
//!
//! ```yaml
//! seed: 7
//! policy:
//!   seer_co_days: { earliest: 1, latest: 2 }
//!   claim_saturation: 2
//! logging:
//!   level: debug
//!   json: true
//! ```

use std::path::Path;

use lupine_agents::PolicyConfig;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Overrides the game setting's random seed when present.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Decision policy tunables.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SessionConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if it is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Seed for a game whose setting carries `game_seed`.
    pub const fn effective_seed(&self, game_seed: u64) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => game_seed,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lupine_agents::CoDayWindow;

    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = SessionConfig::parse("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.policy.claim_saturation, 2);
        assert_eq!(config.effective_seed(9), 9);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = "
seed: 7
policy:
  seer_co_days:
    earliest: 2
    latest: 2
logging:
  json: true
";
        let config = SessionConfig::parse(yaml).unwrap();
        assert_eq!(config.effective_seed(9), 7);
        assert_eq!(config.policy.seer_co_days, CoDayWindow::new(2, 2));
        assert_eq!(config.policy.medium_co_days, CoDayWindow::new(1, 3));
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let result = SessionConfig::parse("policy: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = SessionConfig::from_file(Path::new("/nonexistent/lupine.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
