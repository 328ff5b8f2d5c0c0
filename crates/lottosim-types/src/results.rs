//! Result payloads handed to the layer that talks to clients.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::SessionId;
use crate::profile::MatchProfile;

/// Read-only projection of a simulation's cumulative state.
///
/// Produced by the engine's `snapshot` operation. Building one never
/// mutates the simulation, so two snapshots taken without an intervening
/// advance compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResultsSnapshot {
    /// Name of the lottery being played (`"custom"` for custom lotteries).
    pub lottery_name: String,
    /// The player's fixed guess, one ascending list per pool.
    pub guess: Vec<Vec<u32>>,
    /// Rounds played per simulated week.
    pub rounds_per_week: u32,
    /// Price charged per round.
    #[ts(as = "String")]
    pub guess_price: Decimal,
    /// Rounds played since the simulation was created.
    pub elapsed_rounds: u64,
    /// Whole simulated weeks elapsed.
    pub elapsed_weeks: u64,
    /// Whole simulated years elapsed.
    pub elapsed_years: u64,
    /// Total amount spent on guesses.
    #[ts(as = "String")]
    pub total_spent: Decimal,
    /// Total amount won.
    #[ts(as = "String")]
    pub total_won: Decimal,
    /// `total_won - total_spent`; negative when the player is behind.
    #[ts(as = "String")]
    pub net_profit: Decimal,
    /// Occurrences of every match profile seen so far.
    #[ts(type = "Record<string, number>")]
    pub tier_counts: BTreeMap<MatchProfile, u64>,
}

/// Acknowledgement returned when a session is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CreatedSession {
    /// Name of the lottery the session plays.
    pub lottery: String,
    /// The identifier the session is stored under.
    pub session_id: SessionId,
    /// The player's guess (generated or validated), one list per pool.
    pub guess: Vec<Vec<u32>>,
    /// Seed of the session's random stream.
    pub seed: u64,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}
