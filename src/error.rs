//! Error taxonomy.
//!
//! Every variant of [`Error`] is fatal for the current run. Config problems
//! are reported on stderr before a notifier exists; the rest are sent once
//! through the notifier before exiting. A missing snapshot is the bootstrap
//! case and a failed notification is only logged, so neither appears here.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("missing config value: {0}")]
    Missing(&'static str),

    #[error("invalid config value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("no config file found (looked for {0})")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not start a browser session at {endpoint}: {message}")]
    Session { endpoint: String, message: String },

    #[error("failed to load {url}: {message}")]
    Navigate { url: String, message: String },

    #[error("listing container {selector} did not appear on {url}")]
    Timeout { url: String, selector: String },

    #[error("failed to read page source from {url}: {message}")]
    Source { url: String, message: String },

    #[error("failed to read page file {path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("scraped result is empty (no rows matched {0})")]
    Empty(String),

    #[error("row {row}: {field} not found")]
    FieldNotFound { row: usize, field: &'static str },

    #[error("row {row}: invalid date {text:?}")]
    InvalidDate { row: usize, text: String },

    #[error("invalid selector {0}")]
    Selector(String),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Request(String),

    #[error("notification endpoint returned {status}")]
    Status { status: u16 },

    #[error("failed to write notification: {0}")]
    Write(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("failed to save snapshot {path}: {source}")]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
