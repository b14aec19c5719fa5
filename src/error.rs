use reqwest::StatusCode;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// A call to the agent service that did not produce a usable result.
#[derive(Error, Debug)]
pub enum RequestError {
    /// The service answered with a non-2xx status. `payload` is `None` when the
    /// body was empty or could not be read.
    #[error("agent service returned {status}: {}", .payload.as_ref().map_or_else(|| "<empty body>".to_string(), Value::to_string))]
    Remote {
        status: StatusCode,
        payload: Option<Value>,
    },

    /// The exchange itself failed (connect, send, or body decode).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("response is missing the `{0}` field")]
    MissingField(&'static str),
}

impl RequestError {
    /// The remote error payload when there is one, otherwise the transport message.
    pub fn detail(&self) -> String {
        match self {
            Self::Remote {
                payload: Some(payload),
                ..
            } => payload.to_string(),
            Self::Remote {
                status,
                payload: None,
            } => status.to_string(),
            Self::Transport(err) => err.to_string(),
            Self::InvalidBaseUrl(err) => format!("invalid base URL: {err}"),
            Self::MissingField(field) => format!("missing `{field}` in response"),
        }
    }

    /// Body of a non-2xx response, if the service sent one.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Remote { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }
}

pub type RequestResult<T> = Result<T, RequestError>;

/// Errors that can occur while loading an agent profile.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read profile at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML profile at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
