//! Error types for the task runner.

use thiserror::Error;

/// Errors produced by [`KeyedTaskRunner`](crate::runner::KeyedTaskRunner).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RunnerError {
    /// A task is already registered under this key. Remove it first or use
    /// `start_or_replace`.
    #[error("a task is already running under key '{key}'")]
    DuplicateKey { key: String },
}

impl RunnerError {
    /// Key involved in the error.
    pub fn key(&self) -> &str {
        match self {
            Self::DuplicateKey { key } => key,
        }
    }
}
