//! Lottery definitions: pools, price, and reward table.
//!
//! A [`LotteryDefinition`] is validated once, at construction, and is
//! immutable afterwards. Everything the engine later does with it (sampling
//! indices from a domain, scoring a draw, looking up a payout) relies on the
//! invariants checked here, so scoring never has to fail.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lottosim_types::{MatchProfile, ParseProfileError};

/// Name reported for caller-supplied lotteries.
pub const CUSTOM_LOTTERY_NAME: &str = "custom";

/// Largest number of eligible values one pool may hold.
pub const MAX_DOMAIN_SIZE: u64 = 10_000;

/// Largest number of values one pool may pick.
pub const MAX_PICK_COUNT: u32 = 100;

/// Most decimal places a price or payout may carry.
///
/// Totals are sums of these amounts; keeping the scale small keeps every
/// sum exact within the 28 significant digits of a [`Decimal`].
pub const MAX_MONEY_SCALE: u32 = 8;

/// Errors produced when a lottery definition fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    /// The definition has no pools to guess from.
    #[error("a lottery needs at least one pool")]
    NoPools,

    /// A pool's domain contains no numbers.
    #[error("pool {pool} has an empty domain")]
    EmptyDomain {
        /// Zero-based pool index.
        pool: usize,
    },

    /// An explicit domain lists the same number twice.
    #[error("pool {pool} lists {value} more than once in its domain")]
    DuplicateDomainValue {
        /// Zero-based pool index.
        pool: usize,
        /// The repeated number.
        value: u32,
    },

    /// A pool's domain holds more than [`MAX_DOMAIN_SIZE`] values.
    #[error("pool {pool} has {domain_size} eligible values, at most {max} allowed", max = MAX_DOMAIN_SIZE)]
    DomainTooLarge {
        /// Zero-based pool index.
        pool: usize,
        /// Number of eligible values in the domain.
        domain_size: u64,
    },

    /// A pool picks more than [`MAX_PICK_COUNT`] values.
    #[error("pool {pool} picks {pick_count} numbers, at most {max} allowed", max = MAX_PICK_COUNT)]
    PickCountTooLarge {
        /// Zero-based pool index.
        pool: usize,
        /// The requested pick count.
        pick_count: u32,
    },

    /// A pool's pick count is zero or exceeds its domain size.
    #[error("pool {pool} picks {pick_count} numbers but its domain holds {domain_size}")]
    InvalidPickCount {
        /// Zero-based pool index.
        pool: usize,
        /// The requested pick count.
        pick_count: u32,
        /// Number of eligible values in the domain.
        domain_size: u64,
    },

    /// The guess price is zero or negative.
    #[error("guess price must be positive, got {price}")]
    NonPositivePrice {
        /// The rejected price.
        price: Decimal,
    },

    /// A reward table key is not a valid profile string.
    #[error("reward table key {key:?} is not a match profile: {source}")]
    InvalidProfileKey {
        /// The rejected key.
        key: String,
        /// Why the key failed to parse.
        source: ParseProfileError,
    },

    /// A money amount carries more than [`MAX_MONEY_SCALE`] decimal places.
    #[error("{field} {amount} has more than {max} decimal places", max = MAX_MONEY_SCALE)]
    ExcessivePrecision {
        /// Which amount was rejected (`guess price` or `payout for <profile>`).
        field: String,
        /// The rejected amount.
        amount: Decimal,
    },

    /// Two reward table keys name the same profile.
    #[error("reward table keys {first:?} and {second:?} both name profile {profile}")]
    DuplicateProfileKey {
        /// The key seen first.
        first: String,
        /// The key that repeated it.
        second: String,
        /// The profile both keys parse to.
        profile: MatchProfile,
    },

    /// A reward table key can never be produced by a draw.
    #[error("reward table profile {profile} can never occur: {reason}")]
    UnrealizableProfile {
        /// The unreachable profile.
        profile: MatchProfile,
        /// Explanation of why it is unreachable.
        reason: String,
    },

    /// A reward table payout is negative.
    #[error("payout for profile {profile} must not be negative, got {payout}")]
    NegativePayout {
        /// The profile carrying the payout.
        profile: MatchProfile,
        /// The rejected payout.
        payout: Decimal,
    },
}

/// The set of numbers a pool draws from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Domain {
    /// Every integer from `min` to `max`, inclusive.
    Range {
        /// Smallest eligible number.
        min: u32,
        /// Largest eligible number.
        max: u32,
    },
    /// An explicit list of eligible numbers, kept in ascending order.
    Set {
        /// The eligible numbers.
        values: Vec<u32>,
    },
}

impl Domain {
    /// Number of eligible values. An inverted range has size zero.
    pub fn size(&self) -> u64 {
        match self {
            Self::Range { min, max } => {
                if min > max {
                    0
                } else {
                    u64::from(*max)
                        .saturating_sub(u64::from(*min))
                        .saturating_add(1)
                }
            }
            Self::Set { values } => u64::try_from(values.len()).unwrap_or(u64::MAX),
        }
    }

    /// Whether `value` is eligible.
    pub fn contains(&self, value: u32) -> bool {
        match self {
            Self::Range { min, max } => (*min..=*max).contains(&value),
            Self::Set { values } => values.binary_search(&value).is_ok(),
        }
    }

    /// The `index`-th smallest eligible value, if there is one.
    pub fn nth(&self, index: usize) -> Option<u32> {
        match self {
            Self::Range { min, max } => {
                let offset = u32::try_from(index).ok()?;
                min.checked_add(offset).filter(|value| value <= max)
            }
            Self::Set { values } => values.get(index).copied(),
        }
    }
}

/// One pool of a lottery: a domain and how many numbers are picked from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// The eligible numbers.
    pub domain: Domain,
    /// How many distinct numbers are guessed and drawn from the domain.
    pub pick_count: u32,
}

impl Pool {
    /// Pool over the inclusive range `min..=max`.
    pub const fn range(min: u32, max: u32, pick_count: u32) -> Self {
        Self {
            domain: Domain::Range { min, max },
            pick_count,
        }
    }

    /// Pool over an explicit set of numbers.
    pub const fn set(values: Vec<u32>, pick_count: u32) -> Self {
        Self {
            domain: Domain::Set { values },
            pick_count,
        }
    }

    /// Domain size as a `usize`, for index sampling.
    pub(crate) fn domain_len(&self) -> usize {
        usize::try_from(self.domain.size()).unwrap_or(usize::MAX)
    }

    /// Pick count as a `usize`.
    pub(crate) fn pick_len(&self) -> usize {
        usize::try_from(self.pick_count).unwrap_or(usize::MAX)
    }
}

/// An immutable, validated lottery description.
///
/// Deserialization goes through [`LotteryDefinition::build`], so a stored
/// definition that no longer satisfies the invariants is rejected instead
/// of being loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DefinitionParts")]
pub struct LotteryDefinition {
    name: String,
    pools: Vec<Pool>,
    guess_price: Decimal,
    reward_table: BTreeMap<MatchProfile, Decimal>,
}

/// Unvalidated field set used as the deserialization intermediate.
#[derive(Deserialize)]
struct DefinitionParts {
    name: String,
    pools: Vec<Pool>,
    guess_price: Decimal,
    reward_table: BTreeMap<MatchProfile, Decimal>,
}

impl TryFrom<DefinitionParts> for LotteryDefinition {
    type Error = DefinitionError;

    fn try_from(parts: DefinitionParts) -> Result<Self, Self::Error> {
        Self::build(parts.name, parts.pools, parts.guess_price, parts.reward_table)
    }
}

impl LotteryDefinition {
    /// Validate the parts of a lottery and assemble the definition.
    ///
    /// Explicit domains are sorted ascending; nothing else is altered.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] naming the first violated rule: no
    /// pools, an empty or duplicated domain, a pick count outside
    /// `1..=domain size`, a non-positive price, an unrealizable reward
    /// profile, a negative payout, an oversized pool, or a price or payout
    /// with more than [`MAX_MONEY_SCALE`] decimal places.
    pub fn build(
        name: impl Into<String>,
        pools: Vec<Pool>,
        guess_price: Decimal,
        reward_table: BTreeMap<MatchProfile, Decimal>,
    ) -> Result<Self, DefinitionError> {
        if pools.is_empty() {
            return Err(DefinitionError::NoPools);
        }

        let pools = pools
            .into_iter()
            .enumerate()
            .map(|(index, pool)| validate_pool(index, pool))
            .collect::<Result<Vec<_>, _>>()?;

        if guess_price <= Decimal::ZERO {
            return Err(DefinitionError::NonPositivePrice { price: guess_price });
        }
        if guess_price.scale() > MAX_MONEY_SCALE {
            return Err(DefinitionError::ExcessivePrecision {
                field: "guess price".to_owned(),
                amount: guess_price,
            });
        }

        for (profile, payout) in &reward_table {
            check_realizable(profile, &pools)?;
            if *payout < Decimal::ZERO {
                return Err(DefinitionError::NegativePayout {
                    profile: profile.clone(),
                    payout: *payout,
                });
            }
            if payout.scale() > MAX_MONEY_SCALE {
                return Err(DefinitionError::ExcessivePrecision {
                    field: format!("payout for {profile}"),
                    amount: *payout,
                });
            }
        }

        Ok(Self {
            name: name.into(),
            pools,
            guess_price,
            reward_table,
        })
    }

    /// Name of the lottery (catalog key or [`CUSTOM_LOTTERY_NAME`]).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pools, in order.
    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    /// Price charged per round.
    pub const fn guess_price(&self) -> Decimal {
        self.guess_price
    }

    /// Payout per match profile; absent profiles pay nothing.
    pub const fn reward_table(&self) -> &BTreeMap<MatchProfile, Decimal> {
        &self.reward_table
    }

    /// Total numbers in a guess across all pools.
    pub fn total_picks(&self) -> u64 {
        self.pools
            .iter()
            .map(|pool| u64::from(pool.pick_count))
            .fold(0_u64, u64::saturating_add)
    }

    /// Payout for a match profile, zero when the table has no entry.
    pub fn payout(&self, profile: &MatchProfile) -> Decimal {
        self.reward_table
            .get(profile)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// A caller-supplied lottery as it arrives from the outside.
///
/// The reward table is keyed by profile strings (`"3"`, `"5+2"`); they are
/// parsed and checked in [`CustomLottery::into_definition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomLottery {
    /// Pools to guess from.
    pub pools: Vec<Pool>,
    /// Payout per match-profile string.
    pub reward_table: BTreeMap<String, Decimal>,
    /// Price charged per round.
    pub guess_price: Decimal,
}

impl CustomLottery {
    /// Parse the reward keys and validate the whole definition.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidProfileKey`] for a key that is not
    /// a profile string, [`DefinitionError::DuplicateProfileKey`] when two
    /// spellings name the same profile, or any error
    /// [`LotteryDefinition::build`] reports.
    pub fn into_definition(self) -> Result<LotteryDefinition, DefinitionError> {
        let mut reward_table = BTreeMap::new();
        let mut keys: BTreeMap<MatchProfile, String> = BTreeMap::new();
        for (key, payout) in self.reward_table {
            let profile = match key.parse::<MatchProfile>() {
                Ok(profile) => profile,
                Err(source) => return Err(DefinitionError::InvalidProfileKey { key, source }),
            };
            if let Some(first) = keys.get(&profile) {
                return Err(DefinitionError::DuplicateProfileKey {
                    first: first.clone(),
                    second: key,
                    profile,
                });
            }
            keys.insert(profile.clone(), key);
            reward_table.insert(profile, payout);
        }

        LotteryDefinition::build(
            CUSTOM_LOTTERY_NAME,
            self.pools,
            self.guess_price,
            reward_table,
        )
    }
}

/// Check one pool's domain and pick count, sorting explicit domains.
fn validate_pool(index: usize, mut pool: Pool) -> Result<Pool, DefinitionError> {
    if let Domain::Set { values } = &mut pool.domain {
        values.sort_unstable();
        let mut seen = BTreeSet::new();
        for value in values.iter() {
            if !seen.insert(*value) {
                return Err(DefinitionError::DuplicateDomainValue {
                    pool: index,
                    value: *value,
                });
            }
        }
    }

    let domain_size = pool.domain.size();
    if domain_size == 0 {
        return Err(DefinitionError::EmptyDomain { pool: index });
    }
    if domain_size > MAX_DOMAIN_SIZE {
        return Err(DefinitionError::DomainTooLarge {
            pool: index,
            domain_size,
        });
    }
    if pool.pick_count == 0 || u64::from(pool.pick_count) > domain_size {
        return Err(DefinitionError::InvalidPickCount {
            pool: index,
            pick_count: pool.pick_count,
            domain_size,
        });
    }
    if pool.pick_count > MAX_PICK_COUNT {
        return Err(DefinitionError::PickCountTooLarge {
            pool: index,
            pick_count: pool.pick_count,
        });
    }
    Ok(pool)
}

/// A profile is realizable when it has one count per pool and no count
/// exceeds that pool's pick count.
fn check_realizable(profile: &MatchProfile, pools: &[Pool]) -> Result<(), DefinitionError> {
    if profile.arity() != pools.len() {
        return Err(DefinitionError::UnrealizableProfile {
            profile: profile.clone(),
            reason: format!(
                "it has {} count(s) but the lottery has {} pool(s)",
                profile.arity(),
                pools.len()
            ),
        });
    }
    for (index, (count, pool)) in profile.counts().iter().zip(pools).enumerate() {
        if *count > pool.pick_count {
            return Err(DefinitionError::UnrealizableProfile {
                profile: profile.clone(),
                reason: format!(
                    "pool {index} picks only {} number(s), cannot match {count}",
                    pool.pick_count
                ),
            });
        }
    }
    Ok(())
}
