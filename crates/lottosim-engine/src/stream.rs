//! The serializable random stream owned by each simulation.
//!
//! A [`RandomStream`] wraps a `ChaCha8` generator. Its whole state (key,
//! stream number, word position) serializes, so a simulation reloaded from
//! storage continues exactly where it stopped: no reseeding, no skipped or
//! repeated values.
//!
//! Two independent streams are derived from one seed. Draws consume
//! [`DRAW_STREAM`]; a generated guess consumes [`GUESS_STREAM`], so whether
//! the player's numbers were generated or supplied never shifts the draw
//! sequence.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Stream number used for per-round draws.
pub const DRAW_STREAM: u64 = 0;

/// Stream number used for guess generation.
pub const GUESS_STREAM: u64 = 1;

/// A seedable, resumable source of randomness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RandomStream(ChaCha8Rng);

impl RandomStream {
    /// The draw stream for `seed`.
    pub fn for_draws(seed: u64) -> Self {
        Self::on_stream(seed, DRAW_STREAM)
    }

    /// The guess-generation stream for `seed`.
    pub fn for_guess(seed: u64) -> Self {
        Self::on_stream(seed, GUESS_STREAM)
    }

    fn on_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self(rng)
    }

    /// Number of 32-bit words consumed so far.
    ///
    /// Only ever grows; equal positions on streams with the same seed mean
    /// the same values were consumed.
    pub fn word_pos(&self) -> u128 {
        self.0.get_word_pos()
    }
}

impl RngCore for RandomStream {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.0.fill_bytes(dst);
    }
}
