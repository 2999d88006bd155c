//! Defines the top level configuration for the light client.

use std::{fs, path::Path, str::FromStr};

use serde::Deserialize;
use tendermint_light_client_verification::VerifierOptions;
use thiserror::Error;
use tracing::Level;

/// The top level configuration, read from a TOML file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightClientConfig {
    /// The logging configuration.
    pub log: LogConfig,
    /// The verifier configuration.
    pub verifier: VerifierOptions,
}

impl LightClientConfig {
    /// Load a `LightClientConfig` from a TOML file on disk.
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .map_err(|e| ConfigError::Io(path_ref.display().to_string(), e))?;
        Ok(toml::from_str(&contents)?)
    }
}

/// The logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// The log level, e.g. `debug`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LogConfig {
    /// Returns the log level, falling back to `INFO` when unparsable.
    #[must_use]
    pub fn level(&self) -> Level {
        Level::from_str(&self.level).unwrap_or(Level::INFO)
    }
}

/// Errors that can occur loading the config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("I/O error reading `{0}`: {1}")]
    Io(String, #[source] std::io::Error),

    /// The file is not a valid config
    #[error("invalid TOML in config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: LightClientConfig = toml::from_str(
            r#"
            [log]
            level = "debug"

            [verifier]
            max_bisection_fetches = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.log.level(), Level::DEBUG);
        assert_eq!(config.verifier.max_bisection_fetches, 8);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: LightClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, LightClientConfig::default());
        assert_eq!(config.log.level(), Level::INFO);
        assert_eq!(config.verifier, VerifierOptions::default());
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let log = LogConfig {
            level: "chatty".to_string(),
        };
        assert_eq!(log.level(), Level::INFO);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = toml::from_str::<LightClientConfig>("[verifier]\nmax_fetches = 3\n").unwrap_err();
        assert!(err.to_string().contains("max_fetches"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LightClientConfig::from_file("/nonexistent/light-client.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(path, _) if path.ends_with("light-client.toml")));
    }
}
