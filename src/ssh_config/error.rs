//! Error types for the SSH config engine

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SshConfigError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid value '{value}' for field {field}")]
    InvalidValue { field: String, value: String },

    #[error("unsupported field: {0}")]
    UnsupportedField(String),

    #[error("section {0} does not exist")]
    NotFound(String),

    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file creation canceled")]
    Aborted,

    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SshConfigError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SshConfigError>;
