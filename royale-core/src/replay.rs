//! Replay fingerprints for the determinism contract.
//!
//! A pass is fully determined by `(seed, day, day-start snapshot)`. Each
//! [`DayRecord`] carries two FNV-1a 64 digests:
//!
//! - **fingerprint**: the ordered intent list
//! - **memory digest**: every actor memory after the pass
//!
//! [`verify`] re-runs a recorded day on a copy of the day-start snapshot and
//! compares both digests, so two runs can be checked without diffing logs.

use serde::{Deserialize, Serialize};
use tracing::{info_span, warn};

use crate::catalog::ItemCatalog;
use crate::engine::DecisionEngine;
use crate::error::{Result, RoyaleError};
use crate::intent::{Action, Intent};
use crate::memory::ActorMemory;
use crate::metrics::spans;
use crate::world::WorldSnapshot;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

fn fold_bytes(mut h: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        h ^= u64::from(b);
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

fn fold_u64(h: u64, value: u64) -> u64 {
    fold_bytes(h, &value.to_le_bytes())
}

/// Strings end with a separator so adjacent fields cannot run together.
fn fold_str(h: u64, s: &str) -> u64 {
    fold_bytes(fold_bytes(h, s.as_bytes()), &[0xff])
}

/// Digest of an ordered intent list.
#[must_use]
pub fn fingerprint(intents: &[Intent]) -> u64 {
    intents.iter().fold(FNV_OFFSET_BASIS, |mut h, intent| {
        h = fold_str(h, intent.source.as_str());
        h = fold_str(h, intent.action.kind().as_str());
        match &intent.action {
            Action::Attack { target_id } => fold_str(h, target_id.as_str()),
            Action::Collect { item_index } => fold_u64(h, *item_index as u64),
            Action::Move { route } => {
                h = fold_u64(h, route.len() as u64);
                route.iter().fold(h, |h, area| fold_u64(h, u64::from(area.0)))
            }
            Action::Nothing { reason } | Action::Stay { reason } => {
                fold_str(h, reason.as_deref().unwrap_or(""))
            }
            Action::Defend | Action::Drink | Action::SetTrap => h,
        }
    })
}

fn fold_memory(mut h: u64, memory: &ActorMemory) -> u64 {
    if let Some(traits) = memory.traits {
        h = fold_u64(h, traits.aggression.to_bits());
        h = fold_u64(h, traits.greed.to_bits());
        h = fold_u64(h, traits.caution.to_bits());
    }
    h = fold_u64(h, memory.visited.len() as u64);
    h = memory.visited.iter().fold(h, |h, a| fold_u64(h, u64::from(a.0)));
    h = fold_u64(h, memory.recent_areas.iter().count() as u64);
    h = memory.recent_areas.iter().fold(h, |h, a| fold_u64(h, u64::from(a.0)));
    h = fold_u64(h, u64::from(memory.today.committed_to_collect));
    h = fold_u64(h, u64::from(memory.today.wants_to_flee));
    fold_u64(h, u64::from(memory.empty_handed_attempts))
}

/// Digest of every actor memory in `world`, player first, then NPCs by id.
#[must_use]
pub fn memory_digest(world: &WorldSnapshot) -> u64 {
    world
        .entities
        .player
        .iter()
        .chain(world.entities.npcs.values())
        .fold(FNV_OFFSET_BASIS, |h, actor| {
            fold_memory(fold_str(h, actor.id.as_str()), &actor.memory)
        })
}

/// The reproducible trace of one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    /// Game seed.
    pub seed: u64,
    /// Day decided.
    pub day: u32,
    /// Emitted intents, in emission order.
    pub intents: Vec<Intent>,
    /// [`fingerprint`] of `intents`.
    pub fingerprint: u64,
    /// [`memory_digest`] of the snapshot after the pass.
    pub memory_digest: u64,
}

impl DayRecord {
    /// Seal a pass's output; `world` is the snapshot after the pass.
    #[must_use]
    pub fn new(seed: u64, day: u32, intents: Vec<Intent>, world: &WorldSnapshot) -> Self {
        let fingerprint = fingerprint(&intents);
        Self {
            seed,
            day,
            intents,
            fingerprint,
            memory_digest: memory_digest(world),
        }
    }
}

/// Outcome of a replay check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayCheck {
    /// Recorded intent fingerprint.
    pub expected: u64,
    /// Fingerprint of the re-run.
    pub actual: u64,
    /// Whether the memory digests agree too.
    pub memory_matches: bool,
}

impl ReplayCheck {
    /// Both digests reproduced.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.expected == self.actual && self.memory_matches
    }
}

/// Re-run `record`'s day from `world_before` and compare digests.
///
/// `world_before` is not modified.
///
/// # Errors
/// Returns `RoyaleError::Validation` if the record was made with another seed.
pub fn verify<C: ItemCatalog>(
    engine: &DecisionEngine<C>,
    world_before: &WorldSnapshot,
    record: &DayRecord,
) -> Result<ReplayCheck> {
    let _span = info_span!(spans::REPLAY, day = record.day).entered();
    if record.seed != engine.seed() {
        return Err(RoyaleError::Validation {
            reason: format!(
                "record seed {} does not match engine seed {}",
                record.seed,
                engine.seed()
            ),
        });
    }

    let mut world = world_before.clone();
    let rerun = engine.run_day(&mut world, record.day).record;
    let check = ReplayCheck {
        expected: record.fingerprint,
        actual: rerun.fingerprint,
        memory_matches: rerun.memory_digest == record.memory_digest,
    };
    if !check.is_match() {
        warn!(expected = check.expected, actual = check.actual, "replay diverged");
    }
    Ok(check)
}
