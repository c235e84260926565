use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Start-up configuration problems. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no OMDb API key configured; set OMDB_API_KEY or add `api_key` to {0}")]
    MissingApiKey(PathBuf),
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid base url `{0}`")]
    BaseUrl(String),
    #[error("could not locate home directory")]
    HomeDir,
}

/// Failures talking to the movie database. These never reach the user
/// verbatim; the controllers turn them into generic messages and log them.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    #[error("malformed response body")]
    Decode(#[from] serde_json::Error),
}
