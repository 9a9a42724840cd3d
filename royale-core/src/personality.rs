//! Trait Generator: personality scalars derived from the oracle.
//!
//! Three independent day-0 draws per actor, keyed by id and district:
//!
//! | Trait      | Salt                          | Mapping         |
//! |------------|-------------------------------|-----------------|
//! | aggression | `trait_aggr\|id\|district`    | 0.25 + 0.75·a   |
//! | greed      | `trait_greed\|id\|district`   | 0.15 + 0.85·g   |
//! | caution    | `trait_caut\|id\|district`    | 0.20 + 0.80·c   |
//!
//! The result is cached on the actor's memory and never recomputed, so
//! traits stay fixed for the rest of the game.

use crate::memory::ActorMemory;
use crate::oracle::{Oracle, salts};
use crate::types::{ActorId, District, Traits};

/// Traits draw on day 0 regardless of the current day.
const TRAIT_DAY: u32 = 0;

/// Derive the traits for an actor from scratch.
#[must_use]
pub fn generate(oracle: &Oracle, id: &ActorId, district: District) -> Traits {
    let a = oracle.draw(TRAIT_DAY, &salts::trait_aggression(id, district));
    let g = oracle.draw(TRAIT_DAY, &salts::trait_greed(id, district));
    let c = oracle.draw(TRAIT_DAY, &salts::trait_caution(id, district));

    Traits {
        aggression: 0.25 + 0.75 * a,
        greed: 0.15 + 0.85 * g,
        caution: 0.20 + 0.80 * c,
    }
}

/// Cached traits for the actor, generating them on first use.
pub fn ensure(
    memory: &mut ActorMemory,
    oracle: &Oracle,
    id: &ActorId,
    district: District,
) -> Traits {
    *memory
        .traits
        .get_or_insert_with(|| generate(oracle, id, district))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traits_fall_in_their_ranges() {
        let oracle = Oracle::new(99);
        for n in 0..200 {
            let id = ActorId::new(format!("npc_{n}"));
            let t = generate(&oracle, &id, District((n % 12) as u8));
            assert!((0.25..1.0).contains(&t.aggression), "aggression {}", t.aggression);
            assert!((0.15..1.0).contains(&t.greed), "greed {}", t.greed);
            assert!((0.20..1.0).contains(&t.caution), "caution {}", t.caution);
        }
    }

    #[test]
    fn cached_traits_survive_a_new_seed() {
        let id = ActorId::from("npc_1");
        let mut memory = ActorMemory::new();
        let first = ensure(&mut memory, &Oracle::new(1), &id, District(3));
        let again = ensure(&mut memory, &Oracle::new(2), &id, District(3));
        assert_eq!(first, again);
    }

    #[test]
    fn district_changes_the_draw() {
        let oracle = Oracle::new(7);
        let id = ActorId::from("npc_1");
        assert_ne!(generate(&oracle, &id, District(1)), generate(&oracle, &id, District(2)));
    }
}
