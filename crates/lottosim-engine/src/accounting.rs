//! Accounting verification for a simulation's counters.
//!
//! Two laws hold after every advance:
//!
//! ```text
//! total_spent == elapsed_rounds * guess_price
//! total_won   == sum(tier_counts[p] * payout(p))
//! ```
//!
//! and the tier counts add up to `elapsed_rounds`, since every round lands
//! in exactly one tier. `advance` maintains these by construction; the
//! check exists for state coming back from storage, where a tampered or
//! corrupted blob must be refused rather than resumed.

use std::collections::BTreeMap;

use lottosim_types::MatchProfile;
use rust_decimal::Decimal;

use crate::definition::LotteryDefinition;
use crate::simulation::Simulation;

/// The result of an accounting check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountingResult {
    /// Every law holds.
    Balanced,
    /// At least one law is violated.
    Imbalance(AccountingImbalance),
}

/// Details of a failed accounting check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountingImbalance {
    /// Rounds the simulation claims to have played.
    pub elapsed_rounds: u64,
    /// Sum of all tier counts.
    pub tier_total: u64,
    /// `elapsed_rounds * guess_price`, or `None` on overflow.
    pub expected_spent: Option<Decimal>,
    /// The recorded `total_spent`.
    pub recorded_spent: Decimal,
    /// Sum of tier payouts, or `None` on overflow.
    pub expected_won: Option<Decimal>,
    /// The recorded `total_won`.
    pub recorded_won: Decimal,
    /// Human-readable description.
    pub message: String,
}

impl core::fmt::Display for AccountingImbalance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Recompute the accounting laws for `simulation`.
pub fn verify_accounting(simulation: &Simulation) -> AccountingResult {
    let definition = simulation.definition();
    let elapsed_rounds = simulation.elapsed_rounds();

    let tier_total = simulation
        .tier_counts()
        .values()
        .try_fold(0_u64, |acc, count| acc.checked_add(*count));
    let expected_spent = spent_for(definition, elapsed_rounds);
    let expected_won = won_for(definition, simulation.tier_counts());

    let mut problems = Vec::new();
    if tier_total != Some(elapsed_rounds) {
        problems.push("tier counts do not sum to elapsed rounds");
    }
    if expected_spent != Some(simulation.total_spent()) {
        problems.push("total spent does not equal rounds times price");
    }
    if expected_won != Some(simulation.total_won()) {
        problems.push("total won does not equal the sum of tier payouts");
    }

    if problems.is_empty() {
        return AccountingResult::Balanced;
    }

    AccountingResult::Imbalance(AccountingImbalance {
        elapsed_rounds,
        tier_total: tier_total.unwrap_or(u64::MAX),
        expected_spent,
        recorded_spent: simulation.total_spent(),
        expected_won,
        recorded_won: simulation.total_won(),
        message: format!(
            "ACCOUNTING_IMBALANCE after {elapsed_rounds} round(s): {}",
            problems.join("; ")
        ),
    })
}

/// `rounds * guess_price`, or `None` on overflow.
pub(crate) fn spent_for(definition: &LotteryDefinition, rounds: u64) -> Option<Decimal> {
    definition.guess_price().checked_mul(Decimal::from(rounds))
}

/// Sum of `count * payout` over the tiers, or `None` on overflow.
pub(crate) fn won_for(
    definition: &LotteryDefinition,
    tier_counts: &BTreeMap<MatchProfile, u64>,
) -> Option<Decimal> {
    tier_counts
        .iter()
        .try_fold(Decimal::ZERO, |acc, (profile, count)| {
            definition
                .payout(profile)
                .checked_mul(Decimal::from(*count))
                .and_then(|tier_won| acc.checked_add(tier_won))
        })
}
