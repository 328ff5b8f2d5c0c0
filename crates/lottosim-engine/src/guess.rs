//! The player's guess: generation and validation.
//!
//! A generated guess is sampled exactly like a draw. A supplied guess is
//! checked against the definition's shape and rejected, never repaired,
//! when it does not fit. Rejection is an ordinary outcome here: callers
//! relay it to the client as a declined request.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::definition::LotteryDefinition;
use crate::draw::sample_selection;

/// Reasons a supplied guess is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuessError {
    /// A nested guess has the wrong number of pool selections.
    #[error("guess has {actual} pool selection(s), lottery has {expected} pool(s)")]
    WrongPoolCount {
        /// Pools in the lottery.
        expected: usize,
        /// Selections supplied.
        actual: usize,
    },

    /// A flat guess has the wrong number of values overall.
    #[error("guess has {actual} number(s), lottery expects {expected}")]
    WrongTotalCount {
        /// Sum of all pick counts.
        expected: u64,
        /// Values supplied.
        actual: usize,
    },

    /// One pool's selection has the wrong number of values.
    #[error("pool {pool} needs {expected} number(s), got {actual}")]
    WrongPickCount {
        /// Zero-based pool index.
        pool: usize,
        /// The pool's pick count.
        expected: u32,
        /// Values supplied for the pool.
        actual: usize,
    },

    /// A value is not in the pool's domain.
    #[error("{value} is not an eligible number for pool {pool}")]
    OutOfDomain {
        /// Zero-based pool index.
        pool: usize,
        /// The ineligible value.
        value: u32,
    },

    /// A value appears twice within one pool.
    #[error("{value} is chosen more than once in pool {pool}")]
    Duplicate {
        /// Zero-based pool index.
        pool: usize,
        /// The repeated value.
        value: u32,
    },
}

/// A guess as supplied from outside, before validation.
///
/// Accepts either one list per pool or a single flat list that is split
/// across pools in order by pick count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GuessInput {
    /// One list per pool.
    Nested(Vec<Vec<u32>>),
    /// All numbers in pool order.
    Flat(Vec<u32>),
}

/// A validated guess: one ascending selection per pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guess(Vec<Vec<u32>>);

impl Guess {
    /// Selections in pool order, each ascending.
    pub fn selections(&self) -> &[Vec<u32>] {
        &self.0
    }

    /// Consume the guess, returning its selections.
    pub fn into_selections(self) -> Vec<Vec<u32>> {
        self.0
    }
}

/// Generate a uniformly random guess for `definition`.
pub fn generate<R: Rng + ?Sized>(definition: &LotteryDefinition, rng: &mut R) -> Guess {
    Guess(sample_selection(definition, rng))
}

/// Validate caller input against `definition`.
///
/// # Errors
///
/// Returns the first [`GuessError`] found: wrong shape, a value outside a
/// pool's domain, or a repeated value within a pool.
pub fn validate(candidate: GuessInput, definition: &LotteryDefinition) -> Result<Guess, GuessError> {
    let selections = match candidate {
        GuessInput::Nested(selections) => {
            if selections.len() != definition.pools().len() {
                return Err(GuessError::WrongPoolCount {
                    expected: definition.pools().len(),
                    actual: selections.len(),
                });
            }
            selections
        }
        GuessInput::Flat(values) => split_flat(&values, definition)?,
    };

    selections
        .into_iter()
        .zip(definition.pools())
        .enumerate()
        .map(|(index, (mut selection, pool))| {
            if selection.len() != pool.pick_len() {
                return Err(GuessError::WrongPickCount {
                    pool: index,
                    expected: pool.pick_count,
                    actual: selection.len(),
                });
            }
            let mut seen = BTreeSet::new();
            for value in &selection {
                if !pool.domain.contains(*value) {
                    return Err(GuessError::OutOfDomain {
                        pool: index,
                        value: *value,
                    });
                }
                if !seen.insert(*value) {
                    return Err(GuessError::Duplicate {
                        pool: index,
                        value: *value,
                    });
                }
            }
            selection.sort_unstable();
            Ok(selection)
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Guess)
}

/// Boolean form of [`validate`].
pub fn is_valid(candidate: &GuessInput, definition: &LotteryDefinition) -> bool {
    validate(candidate.clone(), definition).is_ok()
}

/// Split a flat list into per-pool selections by pick count.
fn split_flat(values: &[u32], definition: &LotteryDefinition) -> Result<Vec<Vec<u32>>, GuessError> {
    let expected = definition.total_picks();
    let wrong_total = || GuessError::WrongTotalCount {
        expected,
        actual: values.len(),
    };
    if u64::try_from(values.len()).map_err(|_err| wrong_total())? != expected {
        return Err(wrong_total());
    }

    let mut rest = values;
    let mut selections = Vec::with_capacity(definition.pools().len());
    for pool in definition.pools() {
        let (head, tail) = rest.split_at_checked(pool.pick_len()).ok_or_else(wrong_total)?;
        selections.push(head.to_vec());
        rest = tail;
    }
    Ok(selections)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal::Decimal;

    use super::*;
    use crate::definition::Pool;
    use crate::stream::RandomStream;

    fn single_pool() -> LotteryDefinition {
        LotteryDefinition::build("tiny", vec![Pool::range(1, 10, 3)], Decimal::ONE, BTreeMap::new())
            .unwrap()
    }

    fn two_pool() -> LotteryDefinition {
        LotteryDefinition::build(
            "two",
            vec![Pool::range(1, 50, 5), Pool::range(1, 12, 2)],
            Decimal::ONE,
            BTreeMap::new(),
        )
        .unwrap()
    }

    #[test]
    fn generated_guesses_always_validate() {
        for def in [single_pool(), two_pool()] {
            let mut rng = RandomStream::for_guess(17);
            for _ in 0..200 {
                let guess = generate(&def, &mut rng);
                let input = GuessInput::Nested(guess.clone().into_selections());
                assert_eq!(validate(input, &def), Ok(guess));
            }
        }
    }

    #[test]
    fn validation_sorts_each_pool() {
        let guess = validate(GuessInput::Nested(vec![vec![9, 2, 5]]), &single_pool()).unwrap();
        assert_eq!(guess.selections(), &[vec![2, 5, 9]]);
    }

    #[test]
    fn flat_guess_is_split_by_pick_count() {
        let guess =
            validate(GuessInput::Flat(vec![1, 2, 3, 4, 5, 11, 12]), &two_pool()).unwrap();
        assert_eq!(guess.selections(), &[vec![1, 2, 3, 4, 5], vec![11, 12]]);
    }

    #[test]
    fn rejects_duplicate_in_pool() {
        let result = validate(GuessInput::Flat(vec![2, 2, 9]), &single_pool());
        assert_eq!(result, Err(GuessError::Duplicate { pool: 0, value: 2 }));
    }

    #[test]
    fn same_number_in_different_pools_is_fine() {
        let result = validate(
            GuessInput::Nested(vec![vec![1, 2, 3, 4, 5], vec![1, 2]]),
            &two_pool(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_out_of_domain() {
        let result = validate(GuessInput::Flat(vec![0, 5, 9]), &single_pool());
        assert_eq!(result, Err(GuessError::OutOfDomain { pool: 0, value: 0 }));

        let result = validate(
            GuessInput::Nested(vec![vec![1, 2, 3, 4, 5], vec![1, 13]]),
            &two_pool(),
        );
        assert_eq!(result, Err(GuessError::OutOfDomain { pool: 1, value: 13 }));
    }

    #[test]
    fn rejects_wrong_counts() {
        assert_eq!(
            validate(GuessInput::Flat(vec![1, 2]), &single_pool()),
            Err(GuessError::WrongTotalCount { expected: 3, actual: 2 })
        );
        assert_eq!(
            validate(GuessInput::Nested(vec![vec![1, 2, 3, 4]]), &single_pool()),
            Err(GuessError::WrongPickCount { pool: 0, expected: 3, actual: 4 })
        );
        assert_eq!(
            validate(GuessInput::Nested(vec![vec![1, 2, 3]]), &two_pool()),
            Err(GuessError::WrongPoolCount { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn is_valid_mirrors_validate() {
        let def = single_pool();
        assert!(is_valid(&GuessInput::Flat(vec![2, 5, 9]), &def));
        assert!(!is_valid(&GuessInput::Flat(vec![2, 5, 11]), &def));
    }

    #[test]
    fn input_accepts_flat_and_nested_json() {
        let flat: GuessInput = serde_json::from_str("[2, 5, 9]").unwrap();
        assert_eq!(flat, GuessInput::Flat(vec![2, 5, 9]));
        let nested: GuessInput = serde_json::from_str("[[2, 5, 9]]").unwrap();
        assert_eq!(nested, GuessInput::Nested(vec![vec![2, 5, 9]]));
    }
}
