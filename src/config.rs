//! User configuration loaded from `<config_dir>/calcpad/config.toml`.

use crate::calculator::{
    DEFAULT_DECIMAL_PLACES, DEFAULT_ERROR_MESSAGE, Evaluator, MAX_DECIMAL_PLACES, Session,
};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// REPL presentation settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    pub prompt: String,
    /// Print the diagnostic error kind next to the error message.
    pub show_kind: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            show_kind: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub decimal_places: u32,
    pub error_message: String,
    /// Log filter in `EnvFilter` syntax, used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
    pub repl: ReplConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decimal_places: DEFAULT_DECIMAL_PLACES,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            log_filter: None,
            repl: ReplConfig::default(),
        }
    }
}

impl Config {
    /// Default config file location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("calcpad").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and a missing file yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let Some(default_path) = Self::default_path() else {
            debug!("no config directory, using defaults");
            return Ok(Self::default());
        };

        match fs::read_to_string(&default_path) {
            Ok(contents) => Self::parse(&contents, &default_path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %default_path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: default_path,
                source,
            }),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.decimal_places > MAX_DECIMAL_PLACES {
            warn!(
                requested = config.decimal_places,
                max = MAX_DECIMAL_PLACES,
                "decimal_places too large, clamping"
            );
            config.decimal_places = MAX_DECIMAL_PLACES;
        }

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.decimal_places)
    }

    /// Start a fresh session using these settings.
    pub fn session(&self) -> Session {
        Session::with_evaluator(self.evaluator(), self.error_message.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> Result<Config, ConfigError> {
        Config::parse(contents, Path::new("test.toml"))
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        assert_eq!(parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = parse(
            r#"
            decimal_places = 4

            [repl]
            show_kind = true
            "#,
        )
        .unwrap();
        assert_eq!(config.decimal_places, 4);
        assert_eq!(config.error_message, "Calculation error");
        assert!(config.repl.show_kind);
        assert_eq!(config.repl.prompt, "> ");
    }

    #[test]
    fn test_decimal_places_clamped() {
        let config = parse("decimal_places = 40").unwrap();
        assert_eq!(config.decimal_places, MAX_DECIMAL_PLACES);
    }

    #[test]
    fn test_parse_error_reports_path() {
        let err = parse("decimal_places = \"eight\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("test.toml"));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/calcpad.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_session_uses_settings() {
        let config = parse("decimal_places = 2\nerror_message = \"Oops\"").unwrap();
        let mut session = config.session();
        session.submit_all("1/3".chars().filter_map(crate::calculator::Token::from_char));
        session.submit_token(crate::calculator::Token::Evaluate);
        assert_eq!(session.buffer(), "0.33");
    }
}
