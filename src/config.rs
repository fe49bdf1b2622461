//! Runtime configuration.
//!
//! Values come from a TOML file (`--config`, else `<config dir>/groobi/config.toml`
//! when present, else built-in defaults) and are then overridden by `GROOBI_*`
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::changes::{DetectOptions, DEFAULT_IGNORED_HEADERS, DEFAULT_NOISE_THRESHOLD};
use crate::excel::DEFAULT_HIGHLIGHT_COLOR;

pub const ENV_BIND: &str = "GROOBI_BIND";
pub const ENV_NOISE_THRESHOLD: &str = "GROOBI_NOISE_THRESHOLD";
pub const ENV_IGNORED_HEADERS: &str = "GROOBI_IGNORED_HEADERS";
pub const ENV_SKIP_ROWS: &str = "GROOBI_SKIP_ROWS";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("noise_threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("highlight_color must be 6 or 8 hex digits, got {0:?}")]
    InvalidColor(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Headers excluded from comparison
    pub ignored_headers: Vec<String>,
    /// Change ratio at or above which a column is ignored
    pub noise_threshold: f64,
    /// Physical rows above the header row
    pub skip_rows: usize,
    /// Highlight fill, `RRGGBB` or `AARRGGBB`
    pub highlight_color: String,
    /// Address for `groobi serve`
    pub bind_addr: String,
    /// Refuse to highlight when the file changed after it was read
    pub verify_checksum: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignored_headers: DEFAULT_IGNORED_HEADERS.iter().map(|h| h.to_string()).collect(),
            noise_threshold: DEFAULT_NOISE_THRESHOLD,
            skip_rows: 1,
            highlight_color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            verify_checksum: true,
        }
    }
}

impl Config {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// `<config dir>/groobi/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("groobi").join("config.toml"))
    }

    /// Load from `path` (or the default location if it exists), apply the process
    /// environment, and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path().filter(|p| p.exists()),
        };

        let mut config = match file {
            Some(file) => Self::from_file(&file)?,
            None => Self::default(),
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());

        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override fields from environment variables looked up through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(bind) = lookup(ENV_BIND) {
            self.bind_addr = bind;
        }

        if let Some(value) = lookup(ENV_NOISE_THRESHOLD) {
            self.noise_threshold = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_NOISE_THRESHOLD,
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup(ENV_IGNORED_HEADERS) {
            self.ignored_headers = value
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(value) = lookup(ENV_SKIP_ROWS) {
            self.skip_rows = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_SKIP_ROWS,
                value: value.clone(),
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.noise_threshold > 0.0 && self.noise_threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(self.noise_threshold));
        }

        let hex = self.highlight_color.trim().trim_start_matches('#');
        if !matches!(hex.len(), 6 | 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidColor(self.highlight_color.clone()));
        }

        Ok(())
    }

    pub fn detect_options(&self) -> DetectOptions {
        DetectOptions {
            ignored_headers: self.ignored_headers.clone(),
            noise_threshold: self.noise_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ignored_headers, vec!["LOT #"]);
        assert_eq!(config.noise_threshold, 0.5);
        assert_eq!(config.skip_rows, 1);
        assert_eq!(config.highlight_color, "FFFF00");
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert!(config.verify_checksum);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
noise_threshold = 0.75
ignored_headers = ["LOT #", "Updated"]
"#,
        )
        .unwrap();

        assert_eq!(config.noise_threshold, 0.75);
        assert_eq!(config.ignored_headers, vec!["LOT #", "Updated"]);
        assert_eq!(config.skip_rows, 1);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                (ENV_BIND, "0.0.0.0:9000"),
                (ENV_NOISE_THRESHOLD, " 0.25 "),
                (ENV_IGNORED_HEADERS, "LOT #, Batch ,,"),
                (ENV_SKIP_ROWS, "0"),
            ]))
            .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.noise_threshold, 0.25);
        assert_eq!(config.ignored_headers, vec!["LOT #", "Batch"]);
        assert_eq!(config.skip_rows, 0);
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[(ENV_SKIP_ROWS, "two")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: ENV_SKIP_ROWS, .. }));
    }

    #[test]
    fn test_threshold_bounds() {
        for bad in [0.0, -0.1, 1.5, f64::NAN] {
            let config = Config { noise_threshold: bad, ..Config::default() };
            assert!(matches!(config.validate(), Err(ConfigError::InvalidThreshold(_))));
        }

        let config = Config { noise_threshold: 1.0, ..Config::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_color_validation() {
        let config = Config { highlight_color: "#ffcc00".into(), ..Config::default() };
        assert!(config.validate().is_ok());

        let config = Config { highlight_color: "yellow".into(), ..Config::default() };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidColor(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "skip_rows = 2\nverify_checksum = false\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.skip_rows, 2);
        assert!(!config.verify_checksum);

        let missing = Config::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_detect_options() {
        let config = Config { noise_threshold: 0.8, ..Config::default() };
        let options = config.detect_options();
        assert_eq!(options.noise_threshold, 0.8);
        assert_eq!(options.ignored_headers, vec!["LOT #"]);
    }
}
