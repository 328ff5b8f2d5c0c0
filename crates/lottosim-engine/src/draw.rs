//! Per-round draws and the sampling procedure shared with guess generation.
//!
//! Each pool is sampled independently: `pick_count` distinct indices into
//! the domain are chosen uniformly with [`rand::seq::index::sample`], and
//! each index maps to the domain value of that rank. The procedure is part
//! of the reproducibility contract; a change here changes every seeded
//! result and needs a codec version bump.

use rand::Rng;
use rand::seq::index;

use crate::definition::{LotteryDefinition, Pool};

/// One round's winning numbers: one ascending list per pool.
///
/// Draws are ephemeral; only their effect on the counters is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw(Vec<Vec<u32>>);

impl Draw {
    /// The drawn numbers, one ascending list per pool.
    pub fn numbers(&self) -> &[Vec<u32>] {
        &self.0
    }
}

/// Draw one round's winning numbers from `rng`.
pub fn draw<R: Rng + ?Sized>(definition: &LotteryDefinition, rng: &mut R) -> Draw {
    Draw(sample_selection(definition, rng))
}

/// Sample one ascending selection per pool, in pool order.
pub(crate) fn sample_selection<R: Rng + ?Sized>(
    definition: &LotteryDefinition,
    rng: &mut R,
) -> Vec<Vec<u32>> {
    definition
        .pools()
        .iter()
        .map(|pool| sample_pool(pool, rng))
        .collect()
}

/// Sample `pick_count` distinct values from one pool, sorted ascending.
fn sample_pool<R: Rng + ?Sized>(pool: &Pool, rng: &mut R) -> Vec<u32> {
    // Validated definitions guarantee pick_count <= domain size and that
    // every sampled index has a domain value.
    let mut picked: Vec<u32> = index::sample(rng, pool.domain_len(), pool.pick_len())
        .into_iter()
        .filter_map(|rank| pool.domain.nth(rank))
        .collect();
    picked.sort_unstable();
    picked
}
