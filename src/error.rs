//! Crate-level error type

use crate::config::ConfigError;
use crate::document::DocumentError;
use crate::edit::ReplayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvolvError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Document(#[from] DocumentError),

    #[error("{0}")]
    Replay(#[from] ReplayError),

    #[error("{0}")]
    Config(#[from] ConfigError),
}

pub type EvolvResult<T> = Result<T, EvolvError>;

impl EvolvError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        EvolvError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
