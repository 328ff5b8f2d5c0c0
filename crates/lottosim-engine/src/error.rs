//! Error types for simulation construction and advancement.
//!
//! Every failure is recoverable and leaves existing state untouched: a
//! rejected `create` produces no simulation, a rejected `advance` changes
//! no counter and consumes no randomness.

use crate::definition::DefinitionError;
use crate::guess::GuessError;

/// Errors returned by the simulation's public operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    /// The lottery definition failed validation.
    #[error("invalid lottery definition: {source}")]
    InvalidDefinition {
        /// The violated definition rule.
        #[from]
        source: DefinitionError,
    },

    /// A named lottery was requested that the catalog does not contain.
    #[error("unknown lottery name: {name}")]
    UnknownLotteryName {
        /// The requested name.
        name: String,
    },

    /// The player's guess failed validation.
    #[error("invalid guess: {source}")]
    InvalidGuess {
        /// The violated guess rule.
        #[from]
        source: GuessError,
    },

    /// An argument was out of range (negative years, zero rounds per week,
    /// or a span too large to count).
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the rejected argument.
        reason: String,
    },
}
