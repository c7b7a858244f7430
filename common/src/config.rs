//! # Runtime Configuration
//!
//! Values are resolved in layers: built-in defaults, then a TOML file
//! (`CONTACTBOOK_CONFIG`, falling back to `./contactbook.toml`), then environment
//! variables. Command-line flags are applied last by the CLI.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/";
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CONFIG_ENV: &str = "CONTACTBOOK_CONFIG";
const CONFIG_FILE: &str = "contactbook.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid API URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid value for {key}: {value}")]
    Value { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base of every REST endpoint. Always ends with a slash so relative joins
    /// land below it (`.../api/` + `contacts` = `.../api/contacts`).
    pub api_url: Url,
    /// Number of concurrent requests per import or bulk batch.
    pub batch_size: usize,
    pub timeout: Duration,
    /// Where the bearer token and sort preference are kept between runs.
    pub session_path: PathBuf,
    /// 0 prints everything, 1 drops decoration, 2 prints results only.
    pub quiet: u8,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_url: Option<String>,
    batch_size: Option<usize>,
    timeout_secs: Option<u64>,
    session_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is well formed"),
            batch_size: DEFAULT_BATCH_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_path: default_session_path(None),
            quiet: 0,
        }
    }
}

impl Config {
    /// Resolves defaults, the config file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with an injectable environment lookup.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self {
            session_path: default_session_path(env("HOME")),
            ..Self::default()
        };

        let path = env(CONFIG_ENV).unwrap_or_else(|| CONFIG_FILE.to_owned());
        let path = Path::new(&path);
        if path.exists() {
            config.apply_file(path)?;
        } else {
            debug!(path = %path.display(), "no config file found, using defaults");
        }

        config.apply_env(env)?;
        Ok(config)
    }

    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        if let Some(url) = file.api_url {
            self.set_api_url(&url)?;
        }
        if let Some(batch_size) = file.batch_size {
            self.set_batch_size(batch_size);
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(session_path) = file.session_path {
            self.session_path = session_path;
        }
        debug!(path = %path.display(), "loaded config file");
        Ok(())
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(url) = env("CONTACTBOOK_API_URL").filter(|v| !v.is_empty()) {
            self.set_api_url(&url)?;
        }
        if let Some(raw) = env("CONTACTBOOK_BATCH_SIZE").filter(|v| !v.is_empty()) {
            let batch_size = raw.parse::<usize>().map_err(|_| ConfigError::Value {
                key: "CONTACTBOOK_BATCH_SIZE",
                value: raw.clone(),
            })?;
            self.set_batch_size(batch_size);
        }
        if let Some(path) = env("CONTACTBOOK_SESSION").filter(|v| !v.is_empty()) {
            self.session_path = PathBuf::from(path);
        }
        Ok(())
    }

    pub fn set_api_url(&mut self, raw: &str) -> Result<(), ConfigError> {
        let mut normalized = raw.trim().to_owned();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        self.api_url = Url::parse(&normalized).map_err(|source| ConfigError::Url {
            url: raw.to_owned(),
            source,
        })?;
        Ok(())
    }

    /// A batch of zero would never make progress, so it is raised to one.
    pub fn set_batch_size(&mut self, batch_size: usize) {
        self.batch_size = batch_size.max(1);
    }
}

fn default_session_path(home: Option<String>) -> PathBuf {
    match home.filter(|h| !h.is_empty()) {
        Some(home) => PathBuf::from(home).join(".contactbook").join("session.json"),
        None => PathBuf::from(".contactbook-session.json"),
    }
}
