//! The simulation state machine.
//!
//! A [`Simulation`] owns its lottery, the player's fixed guess, a private
//! [`RandomStream`], and four cumulative counters. It has a single state for
//! its whole life: [`Simulation::advance`] plays rounds, and
//! [`Simulation::snapshot`] reads the counters. Deleting a simulation is the
//! storage layer's business.
//!
//! # Stream continuity
//!
//! Rounds are played strictly in order, one draw per round, from the same
//! stream. Advancing by `a` years and then `b` years consumes exactly the
//! values a single advance by `a + b` would, so the counters end up
//! identical either way.

use std::collections::BTreeMap;

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use lottosim_types::{MatchProfile, ResultsSnapshot};

use crate::accounting::{spent_for, won_for};
use crate::catalog;
use crate::definition::{CustomLottery, LotteryDefinition};
use crate::draw::draw;
use crate::error::SimulationError;
use crate::guess::{self, Guess, GuessInput};
use crate::scoring::score;
use crate::stream::RandomStream;

/// Rounds per simulated week when the caller does not say.
pub const DEFAULT_ROUNDS_PER_WEEK: u32 = 3;

/// Weeks in a simulated year.
pub const WEEKS_PER_YEAR: u64 = 52;

/// Most rounds a simulation may play per simulated week.
pub const MAX_ROUNDS_PER_WEEK: u32 = 100;

/// Which lottery a new simulation plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotterySource {
    /// A built-in lottery, by catalog name.
    Named(String),
    /// A caller-supplied lottery.
    Custom(CustomLottery),
}

/// Where the player's guess comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessSource {
    /// Generate a random guess from the seed's guess stream.
    #[default]
    Generate,
    /// Validate numbers supplied by the caller.
    Provided(GuessInput),
}

/// Everything needed to construct a simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationRequest {
    /// The lottery to play.
    pub lottery: LotterySource,
    /// The player's guess.
    pub guess: GuessSource,
    /// Rounds per week; [`DEFAULT_ROUNDS_PER_WEEK`] when `None`.
    pub rounds_per_week: Option<u32>,
    /// Seed for the random streams; drawn from the thread RNG when `None`.
    pub seed: Option<u64>,
}

/// What a single [`Simulation::advance`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvanceReport {
    /// Rounds played during the call.
    pub rounds_played: u64,
    /// Amount spent during the call.
    pub spent: Decimal,
    /// Amount won during the call.
    pub won: Decimal,
}

/// A resumable lottery simulation for one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    pub(crate) definition: LotteryDefinition,
    pub(crate) guess: Guess,
    pub(crate) rounds_per_week: u32,
    pub(crate) seed: u64,
    pub(crate) stream: RandomStream,
    pub(crate) elapsed_rounds: u64,
    pub(crate) total_spent: Decimal,
    pub(crate) total_won: Decimal,
    pub(crate) tier_counts: BTreeMap<MatchProfile, u64>,
}

/// Build a simulation from a request.
///
/// Nothing is constructed unless every part validates.
///
/// # Errors
///
/// Returns [`SimulationError::UnknownLotteryName`] for a name missing from
/// the catalog, [`SimulationError::InvalidDefinition`] for a malformed custom
/// lottery, [`SimulationError::InvalidGuess`] for a rejected guess, and
/// [`SimulationError::InvalidArgument`] for zero rounds per week.
pub fn create(request: SimulationRequest) -> Result<Simulation, SimulationError> {
    let definition = match request.lottery {
        LotterySource::Named(name) => match catalog::lookup(&name) {
            Some(found) => found?,
            None => return Err(SimulationError::UnknownLotteryName { name }),
        },
        LotterySource::Custom(custom) => custom.into_definition()?,
    };

    let seed = request.seed.unwrap_or_else(|| rand::rng().random());

    let guess = match request.guess {
        GuessSource::Generate => guess::generate(&definition, &mut RandomStream::for_guess(seed)),
        GuessSource::Provided(input) => guess::validate(input, &definition)?,
    };

    Simulation::new(
        definition,
        guess,
        request.rounds_per_week.unwrap_or(DEFAULT_ROUNDS_PER_WEEK),
        seed,
    )
}

impl Simulation {
    /// Start a simulation with zeroed counters and a fresh draw stream.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidArgument`] if `rounds_per_week` is
    /// outside `1..=MAX_ROUNDS_PER_WEEK`, or [`SimulationError::InvalidGuess`]
    /// if `guess` does not fit `definition`.
    pub fn new(
        definition: LotteryDefinition,
        guess: Guess,
        rounds_per_week: u32,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        check_rounds_per_week(rounds_per_week)?;
        let guess = guess::validate(GuessInput::Nested(guess.into_selections()), &definition)?;

        Ok(Self {
            definition,
            guess,
            rounds_per_week,
            seed,
            stream: RandomStream::for_draws(seed),
            elapsed_rounds: 0,
            total_spent: Decimal::ZERO,
            total_won: Decimal::ZERO,
            tier_counts: BTreeMap::new(),
        })
    }

    /// Play `years` simulated years of rounds.
    ///
    /// Plays `years * 52 * rounds_per_week` rounds in order. Counters and
    /// the stream are committed together once every round has been played,
    /// so on error the simulation is exactly as it was. `advance(0)` is a
    /// no-op that consumes no randomness.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidArgument`] if `years` is negative
    /// or the span would overflow the counters.
    pub fn advance(&mut self, years: i64) -> Result<AdvanceReport, SimulationError> {
        let whole_years = u64::try_from(years).map_err(|_err| SimulationError::InvalidArgument {
            reason: format!("years must not be negative, got {years}"),
        })?;
        let rounds = self.rounds_for_years(whole_years)?;
        if rounds == 0 {
            return Ok(AdvanceReport::default());
        }

        let overflow = || SimulationError::InvalidArgument {
            reason: format!("advancing {years} year(s) would overflow the simulation counters"),
        };

        let elapsed_rounds = self.elapsed_rounds.checked_add(rounds).ok_or_else(overflow)?;
        let total_spent = spent_for(&self.definition, elapsed_rounds).ok_or_else(overflow)?;

        let mut stream = self.stream.clone();
        let mut tier_counts = self.tier_counts.clone();
        for _ in 0..rounds {
            let drawn = draw(&self.definition, &mut stream);
            let count = tier_counts.entry(score(&self.guess, &drawn)).or_insert(0);
            *count = count.checked_add(1).ok_or_else(overflow)?;
        }

        // Totals are derived from the counters, never accumulated.
        let total_won = won_for(&self.definition, &tier_counts).ok_or_else(overflow)?;

        let report = AdvanceReport {
            rounds_played: rounds,
            spent: total_spent.saturating_sub(self.total_spent),
            won: total_won.saturating_sub(self.total_won),
        };

        self.stream = stream;
        self.tier_counts = tier_counts;
        self.elapsed_rounds = elapsed_rounds;
        self.total_spent = total_spent;
        self.total_won = total_won;

        debug!(
            lottery = self.definition.name(),
            years = whole_years,
            rounds = report.rounds_played,
            spent = %report.spent,
            won = %report.won,
            elapsed_rounds = self.elapsed_rounds,
            "Simulation advanced"
        );
        Ok(report)
    }

    /// Project the counters into a [`ResultsSnapshot`].
    pub fn snapshot(&self) -> ResultsSnapshot {
        let elapsed_weeks = self
            .elapsed_rounds
            .checked_div(u64::from(self.rounds_per_week))
            .unwrap_or(0);
        let elapsed_years = elapsed_weeks.checked_div(WEEKS_PER_YEAR).unwrap_or(0);

        ResultsSnapshot {
            lottery_name: self.definition.name().to_owned(),
            guess: self.guess.selections().to_vec(),
            rounds_per_week: self.rounds_per_week,
            guess_price: self.definition.guess_price(),
            elapsed_rounds: self.elapsed_rounds,
            elapsed_weeks,
            elapsed_years,
            total_spent: self.total_spent,
            total_won: self.total_won,
            net_profit: self.total_won.saturating_sub(self.total_spent),
            tier_counts: self.tier_counts.clone(),
        }
    }

    /// Rounds played by advancing `years` years.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidArgument`] on overflow.
    pub fn rounds_for_years(&self, years: u64) -> Result<u64, SimulationError> {
        years
            .checked_mul(WEEKS_PER_YEAR)
            .and_then(|weeks| weeks.checked_mul(u64::from(self.rounds_per_week)))
            .ok_or_else(|| SimulationError::InvalidArgument {
                reason: format!("{years} year(s) is too long a span to simulate"),
            })
    }

    /// The lottery being played.
    pub const fn definition(&self) -> &LotteryDefinition {
        &self.definition
    }

    /// The player's fixed guess.
    pub const fn guess(&self) -> &Guess {
        &self.guess
    }

    /// Rounds played per simulated week.
    pub const fn rounds_per_week(&self) -> u32 {
        self.rounds_per_week
    }

    /// Seed the random streams were derived from.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Words consumed from the draw stream so far.
    pub fn stream_position(&self) -> u128 {
        self.stream.word_pos()
    }

    /// Rounds played so far.
    pub const fn elapsed_rounds(&self) -> u64 {
        self.elapsed_rounds
    }

    /// Total spent so far.
    pub const fn total_spent(&self) -> Decimal {
        self.total_spent
    }

    /// Total won so far.
    pub const fn total_won(&self) -> Decimal {
        self.total_won
    }

    /// Occurrences per match profile so far.
    pub const fn tier_counts(&self) -> &BTreeMap<MatchProfile, u64> {
        &self.tier_counts
    }
}

/// Reject a rounds-per-week value outside `1..=MAX_ROUNDS_PER_WEEK`.
pub(crate) fn check_rounds_per_week(rounds_per_week: u32) -> Result<(), SimulationError> {
    if (1..=MAX_ROUNDS_PER_WEEK).contains(&rounds_per_week) {
        Ok(())
    } else {
        Err(SimulationError::InvalidArgument {
            reason: format!(
                "rounds_per_week must be between 1 and {MAX_ROUNDS_PER_WEEK}, got {rounds_per_week}"
            ),
        })
    }
}
