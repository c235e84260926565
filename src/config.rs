//! Process-wide configuration, read once at start-up and injected into the
//! API client. The API key is required; without it the app refuses to start
//! rather than issuing unauthenticated calls.

use std::env;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".movieverse";
/// Optional TOML file inside the data directory.
const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable holding the API key. Overrides the config file.
pub const API_KEY_ENV: &str = "OMDB_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shape of `~/.movieverse/config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Read and parse the file, treating a missing file as empty.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Build a config with the default endpoint and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load the config file from the data directory and apply environment
    /// overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = data_dir()?.join(CONFIG_FILE_NAME);
        let file = FileConfig::read(&path)?;
        Self::resolve(file, env::var(API_KEY_ENV).ok(), &path)
    }

    /// Combine file values with an optional key from the environment. `path`
    /// is only used to point the user at the right file in error messages.
    pub fn resolve(
        file: FileConfig,
        env_key: Option<String>,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        let api_key = env_key
            .or(file.api_key)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(path.to_path_buf()))?;

        let mut config = Self::new(api_key);
        if let Some(raw) = file.base_url {
            let base_url = Url::parse(raw.trim()).map_err(|_| ConfigError::BaseUrl(raw.clone()))?;
            config = config.with_base_url(base_url.as_str());
        }
        if let Some(secs) = file.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Resolve the application data directory inside the user's home.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDir)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
