//! Crate error type
//!
//! The guarded value and the timer are total; only the edges that touch the
//! operating system (spawning queue threads, reading configuration) can fail.

use crate::util::config::ConfigError;

/// Errors surfaced by `feige`.
#[derive(Debug, thiserror::Error)]
pub enum FeigeError {
    /// A queue worker thread could not be spawned.
    #[error("failed to spawn worker for queue `{label}`: {source}")]
    QueueSpawn {
        /// Label of the queue being created
        label: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },
    /// A concurrent queue's thread pool could not be built.
    #[error("failed to build thread pool for queue `{label}`: {message}")]
    PoolBuild {
        /// Label of the queue being created
        label: String,
        /// Pool builder message
        message: String,
    },
    /// Configuration could not be loaded or saved.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias used across the crate.
pub type Result<T, E = FeigeError> = std::result::Result<T, E>;
