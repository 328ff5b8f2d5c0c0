//! Error types for the runner binary.
//!
//! [`RunnerError`] wraps every failure mode of a run so `main` can
//! propagate with `?`.

use lottosim_types::SessionId;

/// Top-level error for the runner binary.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: lottosim_session::ConfigError,
    },

    /// A session operation failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: lottosim_session::SessionError,
    },

    /// A finished session failed its accounting check.
    #[error("accounting check failed for session {id}: {message}")]
    Accounting {
        /// The session that failed.
        id: SessionId,
        /// Description of the imbalance.
        message: String,
    },

    /// A session task panicked or was cancelled.
    #[error("session task failed: {message}")]
    Task {
        /// Description of the task failure.
        message: String,
    },

    /// The final report could not be serialized.
    #[error("report serialization error: {source}")]
    Report {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
