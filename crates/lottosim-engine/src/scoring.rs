//! Match-profile scoring.

use rust_decimal::Decimal;

use lottosim_types::MatchProfile;

use crate::definition::LotteryDefinition;
use crate::draw::Draw;
use crate::guess::Guess;

/// Count, per pool, how many guessed numbers were drawn.
///
/// Both sides hold ascending, duplicate-free selections of the same shape,
/// so each pool costs `pick_count` binary searches.
pub fn score(guess: &Guess, draw: &Draw) -> MatchProfile {
    let counts = guess
        .selections()
        .iter()
        .zip(draw.numbers())
        .map(|(chosen, drawn)| {
            let hits = chosen
                .iter()
                .filter(|value| drawn.binary_search(value).is_ok())
                .count();
            u32::try_from(hits).unwrap_or(u32::MAX)
        })
        .collect();
    MatchProfile::new(counts)
}

/// Payout for a profile under `definition`; unlisted profiles pay zero.
pub fn payout(profile: &MatchProfile, definition: &LotteryDefinition) -> Decimal {
    definition.payout(profile)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::definition::Pool;
    use crate::draw::draw;
    use crate::guess::{GuessInput, validate};
    use crate::stream::RandomStream;

    fn two_pool() -> LotteryDefinition {
        let rewards = [(MatchProfile::new(vec![5, 2]), Decimal::from(1_000))]
            .into_iter()
            .collect::<BTreeMap<_, _>>();
        LotteryDefinition::build(
            "two",
            vec![Pool::range(1, 50, 5), Pool::range(1, 12, 2)],
            Decimal::ONE,
            rewards,
        )
        .unwrap()
    }

    #[test]
    fn perfect_guess_matches_everything() {
        let def = two_pool();
        let mut rng = RandomStream::for_draws(8);
        let drawn = draw(&def, &mut rng);
        let guess = validate(GuessInput::Nested(drawn.numbers().to_vec()), &def).unwrap();

        let profile = score(&guess, &drawn);
        assert_eq!(profile, MatchProfile::new(vec![5, 2]));
        assert_eq!(payout(&profile, &def), Decimal::from(1_000));
    }

    #[test]
    fn profile_has_one_count_per_pool() {
        let def = two_pool();
        let guess = validate(GuessInput::Flat(vec![1, 2, 3, 4, 5, 1, 2]), &def).unwrap();
        let mut rng = RandomStream::for_draws(21);
        for _ in 0..100 {
            let drawn = draw(&def, &mut rng);
            let profile = score(&guess, &drawn);
            assert_eq!(profile.arity(), 2);
            let expected: Vec<u32> = guess
                .selections()
                .iter()
                .zip(drawn.numbers())
                .map(|(g, d)| u32::try_from(g.iter().filter(|v| d.contains(v)).count()).unwrap())
                .collect();
            assert_eq!(profile.counts(), expected.as_slice());
        }
    }

    #[test]
    fn unlisted_profile_pays_zero() {
        let def = two_pool();
        assert_eq!(payout(&MatchProfile::new(vec![0, 0]), &def), Decimal::ZERO);
    }
}
