//! Typed errors for the library layer.
//!
//! The fetch path keeps the failure categories apart so callers can decide
//! whether to surface them; [`crate::Client::fetch`] collapses all of them to
//! an empty series.

use crate::models::{WINDOW_END, WINDOW_START};
use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single country/indicator request produced no rows.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS, timeout or body read failure.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("request failed with HTTP {0}")]
    Status(StatusCode),

    /// The body is not valid JSON, or a section does not match its schema.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Valid JSON, but not the `[metadata, records]` layout.
    #[error("unexpected response shape: {0}")]
    Shape(&'static str),

    /// The API returned its own error object in position 0.
    #[error("world bank api error: {0}")]
    Api(String),

    /// A record carried a `date` that is not a plain year.
    #[error("record date {0:?} is not a year")]
    InvalidYear(String),
}

/// Lookup failure in the static registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown country: {0:?}")]
    UnknownCountry(String),

    #[error("unknown indicator: {0:?}")]
    UnknownIndicator(String),
}

/// A user selection that cannot be turned into requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("please select at least one country")]
    NoCountries,

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("start year {start} is later than end year {end}")]
    InvertedRange { start: i32, end: i32 },

    #[error(
        "years must lie between {min} and {max}, got {start}..{end}",
        min = WINDOW_START,
        max = WINDOW_END
    )]
    OutsideWindow { start: i32, end: i32 },
}

/// Configuration file could not be read or parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
