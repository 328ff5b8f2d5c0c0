//! Built-in catalog of named lotteries.
//!
//! Entries are plain data tables validated through
//! [`LotteryDefinition::build`] on lookup, the same path custom lotteries
//! take. Prize amounts are fixed figures for the abstract pool/tier model,
//! not the pari-mutuel payouts of any real draw.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use lottosim_types::MatchProfile;

use crate::definition::{DefinitionError, LotteryDefinition, Pool};

/// One catalog row: pools as `(min, max, pick_count)`, the price in cents,
/// and rewards as `(profile counts, payout in whole units)`.
struct CatalogEntry {
    name: &'static str,
    pools: &'static [(u32, u32, u32)],
    price_cents: i64,
    rewards: &'static [(&'static [u32], i64)],
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "lotto",
        pools: &[(1, 49, 6)],
        price_cents: 300,
        rewards: &[(&[6], 2_000_000), (&[5], 5_000), (&[4], 170), (&[3], 24)],
    },
    CatalogEntry {
        name: "mini_lotto",
        pools: &[(1, 42, 5)],
        price_cents: 150,
        rewards: &[(&[5], 200_000), (&[4], 250), (&[3], 20)],
    },
    CatalogEntry {
        name: "eurojackpot",
        pools: &[(1, 50, 5), (1, 12, 2)],
        price_cents: 1_250,
        rewards: &[
            (&[5, 2], 50_000_000),
            (&[5, 1], 500_000),
            (&[5, 0], 100_000),
            (&[4, 2], 4_000),
            (&[4, 1], 250),
            (&[4, 0], 100),
            (&[3, 2], 70),
            (&[2, 2], 25),
            (&[3, 1], 20),
            (&[3, 0], 15),
            (&[1, 2], 12),
            (&[2, 1], 10),
        ],
    },
    CatalogEntry {
        name: "keno_10",
        pools: &[(1, 70, 10)],
        price_cents: 250,
        rewards: &[
            (&[10], 250_000),
            (&[9], 10_000),
            (&[8], 1_000),
            (&[7], 100),
            (&[6], 20),
            (&[5], 4),
            (&[0], 4),
        ],
    },
];

impl CatalogEntry {
    fn build(&self) -> Result<LotteryDefinition, DefinitionError> {
        let pools = self
            .pools
            .iter()
            .map(|&(min, max, pick_count)| Pool::range(min, max, pick_count))
            .collect();
        let rewards: BTreeMap<MatchProfile, Decimal> = self
            .rewards
            .iter()
            .map(|&(counts, payout)| (MatchProfile::new(counts.to_vec()), Decimal::from(payout)))
            .collect();
        LotteryDefinition::build(self.name, pools, Decimal::new(self.price_cents, 2), rewards)
    }
}

/// Look up a built-in lottery by name.
///
/// Returns `None` when the name is not in the catalog.
///
/// # Errors
///
/// Returns a [`DefinitionError`] only if a catalog row itself is malformed.
pub fn lookup(name: &str) -> Option<Result<LotteryDefinition, DefinitionError>> {
    CATALOG
        .iter()
        .find(|entry| entry.name == name)
        .map(CatalogEntry::build)
}

/// Names of every built-in lottery, in catalog order.
pub fn names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|entry| entry.name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_entry_validates() {
        for name in names() {
            let def = lookup(name).unwrap().unwrap();
            assert_eq!(def.name(), name);
        }
    }

    #[test]
    fn unknown_name_is_absent() {
        assert!(lookup("powerball").is_none());
    }

    #[test]
    fn eurojackpot_shape() {
        let def = lookup("eurojackpot").unwrap().unwrap();
        assert_eq!(def.pools().len(), 2);
        assert_eq!(def.total_picks(), 7);
        assert_eq!(def.guess_price(), Decimal::new(1_250, 2));
        assert_eq!(def.payout(&MatchProfile::new(vec![5, 2])), Decimal::from(50_000_000));
    }

    #[test]
    fn catalog_names_are_unique() {
        let mut all: Vec<_> = names().collect();
        let count = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), count);
    }
}
