//! Versioned serialization of simulations.
//!
//! A stored simulation is a JSON envelope:
//!
//! ```text
//! { "format": "lottosim/simulation", "version": 1, "state": { ... } }
//! ```
//!
//! The state carries the definition, the guess, the rounds per week, the
//! seed, the full random-stream state, and the four counters. Decimals are
//! written as strings and match profiles as `"a+b"` keys, so nothing is
//! lost to floating point.
//!
//! [`decode`] reads the header before the body: a blob from another format
//! or schema version is refused as [`CodecError::IncompatibleState`]. A
//! body that parses but breaks an invariant (definition, guess shape,
//! accounting) is refused as [`CodecError::Corrupt`]; it is never resumed.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lottosim_types::MatchProfile;

use crate::accounting::{AccountingResult, verify_accounting};
use crate::definition::LotteryDefinition;
use crate::guess::{self, Guess, GuessInput};
use crate::simulation::{Simulation, check_rounds_per_week};
use crate::stream::RandomStream;

/// Format tag written into every envelope.
pub const FORMAT: &str = "lottosim/simulation";

/// Schema version written by [`encode`] and accepted by [`decode`].
///
/// Bump on any change to the state layout or to the sampling procedure.
pub const VERSION: u32 = 1;

/// Errors that can occur while encoding or decoding a simulation.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Encoding the state failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The blob was written by a different format or schema version.
    #[error("incompatible stored state: format {format:?} version {version}")]
    IncompatibleState {
        /// Format tag found in the blob.
        format: String,
        /// Schema version found in the blob.
        version: u32,
    },

    /// The blob is unreadable or violates an invariant.
    #[error("corrupt stored state: {reason}")]
    Corrupt {
        /// What was wrong with it.
        reason: String,
    },
}

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    format: &'static str,
    version: u32,
    state: StateOut<'a>,
}

#[derive(Serialize)]
struct StateOut<'a> {
    definition: &'a LotteryDefinition,
    guess: &'a Guess,
    rounds_per_week: u32,
    seed: u64,
    random_stream: &'a RandomStream,
    elapsed_rounds: u64,
    total_spent: Decimal,
    total_won: Decimal,
    tier_counts: &'a BTreeMap<MatchProfile, u64>,
}

#[derive(Deserialize)]
struct Header {
    format: String,
    version: u32,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    state: StateIn,
}

#[derive(Deserialize)]
struct StateIn {
    definition: LotteryDefinition,
    guess: Guess,
    rounds_per_week: u32,
    seed: u64,
    random_stream: RandomStream,
    elapsed_rounds: u64,
    total_spent: Decimal,
    total_won: Decimal,
    tier_counts: BTreeMap<MatchProfile, u64>,
}

/// Serialize a simulation into a versioned envelope.
///
/// # Errors
///
/// Returns [`CodecError::Serialization`] if JSON encoding fails.
pub fn encode(simulation: &Simulation) -> Result<Vec<u8>, CodecError> {
    let envelope = EnvelopeOut {
        format: FORMAT,
        version: VERSION,
        state: StateOut {
            definition: &simulation.definition,
            guess: &simulation.guess,
            rounds_per_week: simulation.rounds_per_week,
            seed: simulation.seed,
            random_stream: &simulation.stream,
            elapsed_rounds: simulation.elapsed_rounds,
            total_spent: simulation.total_spent,
            total_won: simulation.total_won,
            tier_counts: &simulation.tier_counts,
        },
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Restore a simulation from an envelope written by [`encode`].
///
/// # Errors
///
/// Returns [`CodecError::IncompatibleState`] for a foreign format or
/// version, and [`CodecError::Corrupt`] for an unreadable body or one that
/// breaks an invariant.
pub fn decode(bytes: &[u8]) -> Result<Simulation, CodecError> {
    let header: Header = serde_json::from_slice(bytes).map_err(|e| corrupt(&e))?;
    if header.format != FORMAT || header.version != VERSION {
        return Err(CodecError::IncompatibleState {
            format: header.format,
            version: header.version,
        });
    }

    let EnvelopeIn { state } = serde_json::from_slice(bytes).map_err(|e| corrupt(&e))?;

    check_rounds_per_week(state.rounds_per_week).map_err(|e| corrupt(&e))?;
    let guess = guess::validate(
        GuessInput::Nested(state.guess.into_selections()),
        &state.definition,
    )
    .map_err(|e| corrupt(&e))?;
    for profile in state.tier_counts.keys() {
        let fits = profile.arity() == state.definition.pools().len()
            && profile
                .counts()
                .iter()
                .zip(state.definition.pools())
                .all(|(count, pool)| *count <= pool.pick_count);
        if !fits {
            return Err(corrupt(&format!("tier {profile} cannot occur in this lottery")));
        }
    }

    let simulation = Simulation {
        definition: state.definition,
        guess,
        rounds_per_week: state.rounds_per_week,
        seed: state.seed,
        stream: state.random_stream,
        elapsed_rounds: state.elapsed_rounds,
        total_spent: state.total_spent,
        total_won: state.total_won,
        tier_counts: state.tier_counts,
    };

    match verify_accounting(&simulation) {
        AccountingResult::Balanced => Ok(simulation),
        AccountingResult::Imbalance(imbalance) => Err(corrupt(&imbalance)),
    }
}

fn corrupt(reason: &dyn core::fmt::Display) -> CodecError {
    CodecError::Corrupt {
        reason: reason.to_string(),
    }
}
