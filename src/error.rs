//! Errors of the fallible outer boundary: configuration files and HID I/O.
//!
//! Controller dispatch never returns these. Connection requests have their own
//! [`ConnectError`](crate::connection::ConnectError).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[cfg(feature = "hid")]
    #[error("HID error: {0}")]
    Hid(#[from] hidapi::HidError),

    #[error("device disconnected")]
    Disconnected,

    #[error("malformed report: {0}")]
    Report(String),
}

pub type InputResult<T> = Result<T, InputError>;
