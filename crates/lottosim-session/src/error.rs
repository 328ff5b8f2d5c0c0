//! Error types for the session layer.

use lottosim_engine::{CodecError, SimulationError};
use lottosim_types::SessionId;

/// Errors returned by [`crate::SessionService`] and repositories.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session is stored under the requested id.
    #[error("session not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: SessionId,
    },

    /// The engine rejected the request.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying engine error.
        #[from]
        source: SimulationError,
    },

    /// Stored state could not be encoded or decoded.
    #[error("codec error: {source}")]
    Codec {
        /// The underlying codec error.
        #[from]
        source: CodecError,
    },

    /// The blocking task that played an advance failed to complete.
    #[error("advance worker failed: {message}")]
    Worker {
        /// Description of the join failure.
        message: String,
    },
}
