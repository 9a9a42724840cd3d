//! Movement Decision: where the actor ends the day.
//!
//! 1. Trapped actors stay.
//! 2. A bounded BFS ([`reach`]) lists every enterable area within the step budget.
//! 3. Every candidate and "stay" are scored ([`area_score`]); staying gets a
//!    staging-area dispersal bias on top.
//! 4. The staging scramble may block movement outright.
//! 5. Movement is either forced or has to beat staying by a threshold.
//! 6. A temperature-scaled softmax over the best few candidates picks the route.

pub mod area_score;
pub mod reach;

use std::fmt;

use tracing::trace;

use crate::engine::DayContext;
use crate::intent::Action;
use crate::memory::ActorMemory;
use crate::oracle::salts;
use crate::types::{Score, Traits};
use crate::world::Actor;

use self::area_score::{AreaScorer, REJECTED};
use self::reach::{Reachable, reachable, step_budget};

/// Chance per day that an empty-handed actor gives up on the staging loot.
const STAGING_LEAVE_CHANCE: f64 = 0.20;

/// Empty-handed days at the staging area before leaving is even considered.
const SCRAMBLE_ATTEMPTS: u32 = 2;

/// Why movement skipped the threshold test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForcedMove {
    /// The posture stage raised the flee flag.
    Flee,
    /// Nothing left on the ground here.
    NoLoot,
    /// Done looting the staging area.
    StagingExit,
}

impl fmt::Display for ForcedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Flee => "flee",
            Self::NoLoot => "no_loot",
            Self::StagingExit => "staging_exit",
        })
    }
}

/// Result of the movement phase for one actor.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementDecision {
    /// MOVE or STAY.
    pub action: Action,
    /// Set when the threshold test was bypassed.
    pub forced: Option<ForcedMove>,
    /// Set when the staging scramble held the actor in place.
    pub scramble_blocked: bool,
}

impl MovementDecision {
    fn stay(reason: &str) -> Self {
        Self {
            action: Action::stay(reason),
            forced: None,
            scramble_blocked: false,
        }
    }
}

/// A reachable area with its score.
#[derive(Debug, Clone)]
struct Candidate {
    reach: Reachable,
    score: Score,
}

/// Softmax temperature: cautious actors pick more greedily.
#[must_use]
pub fn temperature(caution: f64) -> f64 {
    (0.55 - caution * 0.30).clamp(0.25, 0.55)
}

/// Pick an index by cumulative softmax weight, `r` in `[0, 1)`.
///
/// Weights are `exp((score − max) / temperature)`. Returns `None` for an
/// empty slice.
#[must_use]
pub fn softmax_pick(scores: &[f64], temperature: f64, r: f64) -> Option<usize> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if scores.is_empty() || !max.is_finite() {
        return None;
    }
    let weights: Vec<f64> = scores.iter().map(|s| ((s - max) / temperature).exp()).collect();
    let total: f64 = weights.iter().sum();
    let target = r * total;

    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if target < cumulative {
            return Some(i);
        }
    }
    Some(weights.len() - 1)
}

/// Dispersal bias added to the stay score.
#[must_use]
pub fn dispersal_bias(at_staging: bool, held: usize, committed: bool) -> f64 {
    match (at_staging, held) {
        (true, 0) if committed => -0.75,
        (true, 0) => 0.10,
        (true, 1) => -0.85,
        (true, _) => -1.05,
        (false, n) if n >= 2 => -0.12,
        (false, _) => 0.0,
    }
}

/// Run the movement decision for one actor.
///
/// Reads the day flags set by the posture stage and updates the staging
/// scramble counter on `memory`.
pub fn decide(
    ctx: &DayContext<'_>,
    actor: &Actor,
    memory: &mut ActorMemory,
    traits: Traits,
) -> MovementDecision {
    if actor.is_trapped() {
        return MovementDecision::stay("trapped");
    }

    let budget = step_budget(actor);
    if budget == 0 {
        return MovementDecision::stay("no_budget");
    }

    let Some(current) = ctx.world.area(actor.area_id) else {
        return MovementDecision::stay("unknown_area");
    };

    let at_staging = actor.area_id == ctx.config.staging_area;
    let held = actor.inventory.len();
    let committed = memory.today.committed_to_collect;
    let ground_left = current.ground_items.len();

    // Staging scramble.
    let scrambling = at_staging && ground_left > 0 && held == 0 && !committed;
    if scrambling {
        memory.empty_handed_attempts = memory.empty_handed_attempts.saturating_add(1);
    } else if held > 0 || committed {
        memory.empty_handed_attempts = 0;
    }
    let fleeing = memory.today.wants_to_flee;
    let stays_for_loot = || {
        let roll = ctx.oracle.draw(ctx.day, &salts::staging_leave(&actor.id));
        roll >= STAGING_LEAVE_CHANCE && !fleeing
    };
    let blocked = scrambling
        && (memory.empty_handed_attempts < SCRAMBLE_ATTEMPTS || stays_for_loot());
    if blocked {
        return MovementDecision {
            scramble_blocked: true,
            ..MovementDecision::stay("staging_scramble")
        };
    }

    let forced = if fleeing {
        Some(ForcedMove::Flee)
    } else if ground_left == 0 {
        Some(ForcedMove::NoLoot)
    } else if at_staging && (committed || held >= 1) {
        Some(ForcedMove::StagingExit)
    } else {
        None
    };

    let scorer = AreaScorer::new(ctx, actor, memory, traits);
    let stay_score = scorer.score(current, 0) + dispersal_bias(at_staging, held, committed);

    let mut candidates: Vec<Candidate> = reachable(ctx.world, actor.area_id, budget, ctx.day)
        .into_iter()
        .filter_map(|reach| {
            let area = ctx.world.area(reach.area)?;
            let score = scorer.score(area, reach.steps);
            (score > REJECTED).then(|| Candidate { reach, score: Score::new(score) })
        })
        .collect();

    if ctx.trace_scores {
        trace!(actor = %actor.id, area = %actor.area_id, score = stay_score, "stay scored");
        for c in &candidates {
            trace!(
                actor = %actor.id,
                area = %c.reach.area,
                steps = c.reach.steps,
                score = c.score.value(),
                "area scored"
            );
        }
    }

    if forced == Some(ForcedMove::StagingExit) && candidates.iter().any(|c| c.reach.steps == 1) {
        candidates.retain(|c| c.reach.steps == 1);
    }
    // Stable: equal scores keep BFS order.
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(ctx.config.max_route_candidates);

    let Some(best) = candidates.first().map(|c| c.score.value()) else {
        return MovementDecision {
            forced,
            ..MovementDecision::stay("no_route")
        };
    };

    if forced.is_none() {
        let fresh = at_staging && memory.visited.len() <= 1;
        let mut threshold = 0.14 + traits.caution * 0.10;
        if held == 0 && fresh {
            threshold += 0.06;
        }
        if held >= 2 {
            threshold -= 0.06;
        }
        if best - stay_score < threshold {
            return MovementDecision::stay("below_threshold");
        }
    }

    let scores: Vec<f64> = candidates.iter().map(|c| c.score.value()).collect();
    let r = ctx.oracle.draw(ctx.day, &salts::move_pick(&actor.id));
    let pick = softmax_pick(&scores, temperature(traits.caution), r).unwrap_or(0);

    match candidates.into_iter().nth(pick) {
        Some(choice) => MovementDecision {
            action: Action::Move { route: choice.reach.route },
            forced,
            scramble_blocked: false,
        },
        None => MovementDecision {
            forced,
            ..MovementDecision::stay("no_route")
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::config::DecisionConfig;
    use crate::oracle::Oracle;
    use crate::types::{ActorId, AreaId, District};
    use crate::world::{Area, ItemStack, WorldSnapshot};

    const CAREFUL: Traits = Traits { aggression: 0.5, greed: 0.5, caution: 0.5 };

    /// Staging area 0 (two items) linked to 1 and 2; 2 links on to 3.
    fn world() -> WorldSnapshot {
        let mut world = WorldSnapshot::default();
        for id in 0..4 {
            world.map.areas_by_id.insert(AreaId(id), Area::new(AreaId(id)));
        }
        if let Some(staging) = world.map.areas_by_id.get_mut(&AreaId(0)) {
            staging.ground_items = vec![ItemStack::new("rope", 1), ItemStack::new("rope", 1)];
        }
        for (a, b) in [(0, 1), (0, 2), (2, 3)] {
            world.map.adj_by_id.entry(AreaId(a)).or_default().push(AreaId(b));
            world.map.adj_by_id.entry(AreaId(b)).or_default().push(AreaId(a));
        }
        world
    }

    fn run(
        world: &WorldSnapshot,
        actor: &Actor,
        memory: &mut ActorMemory,
        day: u32,
    ) -> MovementDecision {
        let config = DecisionConfig::default();
        let catalog = StaticCatalog::new();
        let ctx = DayContext::new(world, &config, &catalog, Oracle::new(42), day);
        memory.remember_area(actor.area_id, config.recent_areas_capacity);
        decide(&ctx, actor, memory, CAREFUL)
    }

    #[test]
    fn softmax_prefers_higher_scores_and_respects_r() {
        let scores = [1.0, 0.9, 0.8];
        assert_eq!(softmax_pick(&scores, 0.25, 0.0), Some(0));
        assert_eq!(softmax_pick(&scores, 0.25, 0.6), Some(1));
        assert_eq!(softmax_pick(&scores, 0.25, 0.99), Some(2));
        assert_eq!(softmax_pick(&[], 0.25, 0.5), None);
        assert_eq!(softmax_pick(&[0.3], 0.55, 0.7), Some(0));
    }

    #[test]
    fn temperature_is_clamped() {
        assert!((temperature(0.0) - 0.55).abs() < 1e-12);
        assert!((temperature(1.0) - 0.25).abs() < 1e-12);
        assert!((temperature(0.5) - 0.40).abs() < 1e-12);
    }

    #[test]
    fn dispersal_bias_table() {
        assert!((dispersal_bias(true, 0, false) - 0.10).abs() < 1e-12);
        assert!((dispersal_bias(true, 0, true) + 0.75).abs() < 1e-12);
        assert!((dispersal_bias(true, 1, false) + 0.85).abs() < 1e-12);
        assert!((dispersal_bias(true, 3, true) + 1.05).abs() < 1e-12);
        assert!((dispersal_bias(false, 2, false) + 0.12).abs() < 1e-12);
        assert!(dispersal_bias(false, 1, false).abs() < 1e-12);
    }

    #[test]
    fn trapped_actor_stays() {
        let mut actor = Actor::new("npc_1", District(1), AreaId(1));
        actor.trapped_days = 1;
        let decision = run(&world(), &actor, &mut ActorMemory::new(), 2);
        assert_eq!(decision.action, Action::stay("trapped"));
    }

    #[test]
    fn scramble_blocks_until_two_attempts() {
        let world = world();
        let actor = Actor::new("npc_1", District(1), AreaId(0));
        let mut memory = ActorMemory::new();

        let first = run(&world, &actor, &mut memory, 1);
        assert!(first.scramble_blocked);
        assert_eq!(first.action, Action::stay("staging_scramble"));
        assert_eq!(memory.empty_handed_attempts, 1);

        // npc_1's day-2 leave roll misses, so the second attempt is held too.
        memory.begin_day();
        let second = run(&world, &actor, &mut memory, 2);
        assert_eq!(memory.empty_handed_attempts, 2);
        assert!(second.scramble_blocked);

        memory.begin_day();
        assert!(run(&world, &actor, &mut memory, 3).scramble_blocked);

        // Day 4's roll lands under the 20% leave chance.
        memory.begin_day();
        let fourth = run(&world, &actor, &mut memory, 4);
        assert!(!fourth.scramble_blocked);
        assert_eq!(memory.empty_handed_attempts, 4);
    }

    #[test]
    fn committing_resets_the_scramble_counter() {
        let world = world();
        let actor = Actor::new("npc_1", District(1), AreaId(0));
        let mut memory = ActorMemory::new();
        memory.empty_handed_attempts = 5;
        memory.today.committed_to_collect = true;

        let decision = run(&world, &actor, &mut memory, 1);
        assert_eq!(memory.empty_handed_attempts, 0);
        assert_eq!(decision.forced, Some(ForcedMove::StagingExit));
        // Only one-step routes survive the exit filter.
        match decision.action {
            Action::Move { route } => assert_eq!(route.len(), 1),
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn fleeing_actor_always_moves() {
        let world = world();
        let mut actor = Actor::new("npc_1", District(1), AreaId(1));
        actor.hp = 20.0;
        let mut memory = ActorMemory::new();
        memory.today.wants_to_flee = true;

        let decision = run(&world, &actor, &mut memory, 3);
        assert_eq!(decision.forced, Some(ForcedMove::Flee));
        match decision.action {
            Action::Move { route } => {
                // Wounded: a single step.
                assert_eq!(route, vec![AreaId(0)]);
            }
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn dead_end_stays_with_no_route() {
        let mut world = world();
        if let Some(area) = world.map.areas_by_id.get_mut(&AreaId(0)) {
            area.active = false;
        }
        let actor = Actor::new("npc_1", District(1), AreaId(1));
        let decision = run(&world, &actor, &mut ActorMemory::new(), 3);
        assert_eq!(decision.action, Action::stay("no_route"));
        assert_eq!(decision.forced, Some(ForcedMove::NoLoot));
    }

    #[test]
    fn routes_are_adjacent_chains_within_budget() {
        let world = world();
        for n in 0..20 {
            let actor = Actor::new(ActorId::new(format!("npc_{n}")), District(1), AreaId(1));
            let decision = run(&world, &actor, &mut ActorMemory::new(), 4);
            if let Action::Move { route } = decision.action {
                assert!(!route.is_empty() && route.len() <= 3);
                let mut here = actor.area_id;
                for step in route {
                    assert!(world.neighbors(here).contains(&step));
                    here = step;
                }
            }
        }
    }
}
