// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyledagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Configuration error: unknown task '{0}'")]
    UnknownTask(String),

    #[error("Cycle detected in task graph: {0}")]
    DagCycle(String),

    #[error("could not remove {path:?}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StyledagError {
    /// True for errors raised while resolving settings or the task graph,
    /// before any task action has run.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StyledagError::ConfigError(_)
                | StyledagError::UnknownTask(_)
                | StyledagError::DagCycle(_)
                | StyledagError::TomlError(_)
        )
    }
}

impl From<tokio::task::JoinError> for StyledagError {
    fn from(err: tokio::task::JoinError) -> Self {
        StyledagError::Other(anyhow::anyhow!("blocking task failed: {err}"))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, StyledagError>;
