//! Error types for the layers around the schedule engine. The engine itself
//! never fails: bad meeting times and impossible selections degrade into
//! empty results.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or querying the course catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file exists but could not be read
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not valid course JSON
    #[error("Failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A requested course code is not in the catalog
    #[error("Unknown course code: {code}")]
    UnknownCourse { code: String },
}

/// Errors raised while loading the server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Errors raised while building section filters from user input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A blocked slot key is not of the form `day-hour`
    #[error("Malformed blocked slot '{key}', expected 'day-hour'")]
    MalformedSlot { key: String },

    /// A blocked slot key names a day or hour that does not exist
    #[error("Blocked slot '{key}' is out of range (day 0-6, hour 0-23)")]
    SlotOutOfRange { key: String },
}
