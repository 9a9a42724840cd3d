//! Hash Oracle: the engine's only source of randomness.
//!
//! Every random decision is a pure function of `(seed, day, salt)`:
//!
//! ```text
//! bytes  = utf8("{seed}|{day}|{salt}")
//! h      = FNV-1a-32(bytes)                 (basis 2166136261, prime 16777619)
//! h     ^= h << 13;  h ^= h >> 17;  h ^= h << 5     (u32 wraparound)
//! value  = h / 2^32                          ∈ [0, 1)
//! ```
//!
//! Integer-only mixing keeps the output bit-identical across platforms, so a
//! whole day can be replayed from the seed alone. Each call site uses its own
//! salt (see [`salts`]) so draws never alias.

use std::fmt::Write as _;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Draw a pseudorandom value in `[0, 1)` for `(seed, day, salt)`.
#[must_use]
pub fn hash(seed: u64, day: u32, salt: &str) -> f64 {
    let mut key = String::with_capacity(salt.len() + 24);
    // Writing into a String cannot fail.
    let _ = write!(key, "{seed}|{day}|{salt}");

    let mut h = FNV_OFFSET_BASIS;
    for &byte in key.as_bytes() {
        h ^= u32::from(byte);
        h = h.wrapping_mul(FNV_PRIME);
    }

    h ^= h << 13;
    h ^= h >> 17;
    h ^= h << 5;

    f64::from(h) / TWO_POW_32
}

/// A seeded oracle bound to one game; a thin convenience over [`hash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Oracle {
    seed: u64,
}

impl Oracle {
    /// Bind the oracle to a game seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// The game seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw for `day` with the given salt.
    #[must_use]
    pub fn draw(&self, day: u32, salt: &str) -> f64 {
        hash(self.seed, day, salt)
    }
}

/// Salt strings used by the engine. Changing any of them changes every
/// replay, so they are part of the determinism contract.
pub mod salts {
    use crate::types::{ActorId, AreaId, District};

    /// Aggression trait draw (day 0).
    #[must_use]
    pub fn trait_aggression(id: &ActorId, district: District) -> String {
        format!("trait_aggr|{id}|{district}")
    }

    /// Greed trait draw (day 0).
    #[must_use]
    pub fn trait_greed(id: &ActorId, district: District) -> String {
        format!("trait_greed|{id}|{district}")
    }

    /// Caution trait draw (day 0).
    #[must_use]
    pub fn trait_caution(id: &ActorId, district: District) -> String {
        format!("trait_caut|{id}|{district}")
    }

    /// Whether the staging-area rush forces a collection.
    #[must_use]
    pub fn rush_roll(id: &ActorId) -> String {
        format!("rush_roll|{id}")
    }

    /// Which of the top-ranked staging items the rush grabs.
    #[must_use]
    pub fn rush_pick(id: &ActorId) -> String {
        format!("rush_pick|{id}")
    }

    /// Opportunistic greed collection.
    #[must_use]
    pub fn greed_roll(id: &ActorId) -> String {
        format!("greed_roll|{id}")
    }

    /// Leaving the staging area empty-handed.
    #[must_use]
    pub fn staging_leave(id: &ActorId) -> String {
        format!("staging_leave|{id}")
    }

    /// Softmax route pick.
    #[must_use]
    pub fn move_pick(id: &ActorId) -> String {
        format!("move_pick|{id}")
    }

    /// Per-area score jitter.
    #[must_use]
    pub fn area_jitter(id: &ActorId, area: AreaId) -> String {
        format!("area_jitter|{id}|{area}")
    }
}
