//! Posture Decision: the day's single non-movement action.
//!
//! An ordered cascade; the first rule that fires wins:
//!
//! | # | Rule         | Fires when                             | Action                    |
//! |---|--------------|----------------------------------------|---------------------------|
//! | 1 | Trapped      | `trapped_days > 0`                     | NOTHING                   |
//! | 2 | Staging rush | staging area, loot, room, roll         | COLLECT                   |
//! | 3 | Thirst       | stamina ≤ 15 and water here            | DRINK                     |
//! | 4 | Exhausted    | stamina < 10                           | DRINK / DEFEND            |
//! | 5 | Forage       | stamina ≤ 20, restorative here, room   | COLLECT                   |
//! | 6 | Greed        | roll under `0.10 + greed·0.35`, room   | COLLECT                   |
//! | 7 | Flee         | hp% < 30                               | DEFEND + flee             |
//! | 8 | Combat       | otherwise                              | ATTACK / DEFEND / NOTHING |
//!
//! Rules 2, 5 and 6 mark the actor as committed to a collection today;
//! rule 7 raises the flee flag. Both flags are read by the movement phase.

pub mod combat;

use std::fmt;

use tracing::trace;

use crate::engine::DayContext;
use crate::intent::Action;
use crate::memory::ActorMemory;
use crate::oracle::salts;
use crate::perception::ObservedWorld;
use crate::scoring::{Condition, best_weapon_damage, first_argmax, item_value, stamina_restore};
use crate::types::{Score, Traits};
use crate::world::Actor;

use self::combat::{Attacker, CombatChoice, HumanInfo};

/// Bonus for weapons when ranking loot with empty hands.
const EMPTY_HANDED_WEAPON_BONUS: f64 = 25.0;

/// Which cascade rule produced a posture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostureRule {
    /// Rule 1.
    Trapped,
    /// Rule 2.
    StagingRush,
    /// Rule 3.
    Thirst,
    /// Rule 4.
    Exhausted,
    /// Rule 5.
    Forage,
    /// Rule 6.
    Greed,
    /// Rule 7.
    Flee,
    /// Rule 8.
    Combat,
}

impl fmt::Display for PostureRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Trapped => "trapped",
            Self::StagingRush => "staging_rush",
            Self::Thirst => "thirst",
            Self::Exhausted => "exhausted",
            Self::Forage => "forage",
            Self::Greed => "greed",
            Self::Flee => "flee",
            Self::Combat => "combat",
        };
        f.write_str(name)
    }
}

/// The chosen posture and the rule behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct PostureDecision {
    /// What to do.
    pub action: Action,
    /// Why.
    pub rule: PostureRule,
}

impl PostureDecision {
    fn new(action: Action, rule: PostureRule) -> Self {
        Self { action, rule }
    }
}

/// Run the posture cascade for one actor.
///
/// Writes the committed/flee day flags and may reset the empty-handed
/// counter on `memory`; reads nothing but the frozen snapshot otherwise.
pub fn decide(
    ctx: &DayContext<'_>,
    actor: &Actor,
    memory: &mut ActorMemory,
    traits: Traits,
    view: &ObservedWorld<'_>,
) -> PostureDecision {
    // 1. Trapped actors cannot act.
    if actor.is_trapped() {
        return PostureDecision::new(Action::nothing("trapped"), PostureRule::Trapped);
    }

    let ground = view.ground_items();
    let has_room = !actor.inventory.is_full(ctx.config.inventory_limit);
    let at_staging = actor.area_id == ctx.config.staging_area;

    // 2. Staging-area rush.
    if at_staging && !ground.is_empty() && has_room {
        if let Some(index) = staging_rush(ctx, actor) {
            memory.today.committed_to_collect = true;
            memory.empty_handed_attempts = 0;
            let action = Action::Collect { item_index: index };
            return PostureDecision::new(action, PostureRule::StagingRush);
        }
    }

    let stamina = actor.stamina;

    // 3. Thirst.
    if stamina <= 15.0 && view.has_water() {
        return PostureDecision::new(Action::Drink, PostureRule::Thirst);
    }

    // 4. Exhausted actors never fight.
    if stamina < 10.0 {
        let action = if view.has_water() && stamina <= 25.0 {
            Action::Drink
        } else {
            Action::Defend
        };
        return PostureDecision::new(action, PostureRule::Exhausted);
    }

    // 5. Forage for stamina.
    if stamina <= 20.0 && has_room {
        let restores: Vec<f64> = ground.iter().map(|s| stamina_restore(s, ctx.catalog)).collect();
        if let Some(index) = first_argmax(restores.iter().copied()).filter(|&i| restores[i] > 0.0) {
            memory.today.committed_to_collect = true;
            return PostureDecision::new(Action::Collect { item_index: index }, PostureRule::Forage);
        }
    }

    // 6. Greed.
    if !ground.is_empty() && has_room {
        let chance = 0.10 + traits.greed * 0.35;
        if ctx.oracle.draw(ctx.day, &salts::greed_roll(&actor.id)) < chance {
            if let Some(index) = first_argmax(ground.iter().map(|s| item_value(s, ctx.catalog))) {
                memory.today.committed_to_collect = true;
                let action = Action::Collect { item_index: index };
                return PostureDecision::new(action, PostureRule::Greed);
            }
        }
    }

    let condition = Condition::of(actor, ctx.catalog);

    // 7. Badly wounded: brace and plan to run.
    if condition.is_wounded() {
        memory.today.wants_to_flee = true;
        return PostureDecision::new(Action::Defend, PostureRule::Flee);
    }

    // 8. Combat.
    let action = match evaluate_combat(ctx, actor, condition, traits, view) {
        CombatChoice::Attack(target) => Action::Attack { target_id: target.target },
        CombatChoice::Defend => Action::Defend,
        CombatChoice::Nothing => Action::nothing("no_better_option"),
    };
    PostureDecision::new(action, PostureRule::Combat)
}

/// Roll the staging rush. Returns the ground index to grab, if it fires.
fn staging_rush(ctx: &DayContext<'_>, actor: &Actor) -> Option<usize> {
    let ground = ctx.world.area(actor.area_id)?.ground_items.as_slice();
    let held = actor.inventory.len();

    let base = if ctx.day <= 3 { 0.92 } else { 0.55 };
    let boost = match held {
        0 => 0.55,
        1 => 0.25,
        _ => 0.0,
    };
    let probability = f64::min(0.98, base + boost);
    if ctx.oracle.draw(ctx.day, &salts::rush_roll(&actor.id)) >= probability {
        return None;
    }

    let empty_handed = held == 0;
    let mut ranked: Vec<(usize, Score)> = ground
        .iter()
        .enumerate()
        .map(|(i, stack)| {
            let mut score = item_value(stack, ctx.catalog);
            let is_weapon = ctx.catalog.item_def(&stack.id).is_some_and(|d| d.deals_damage());
            if empty_handed && is_weapon {
                score += EMPTY_HANDED_WEAPON_BONUS;
            }
            (i, Score::new(score))
        })
        .collect();
    // Stable: equal scores keep ground order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let pool = ranked.len().min(ctx.config.rush_pool_size);
    let r = ctx.oracle.draw(ctx.day, &salts::rush_pick(&actor.id));
    let pick = ((r * pool as f64).floor() as usize).min(pool.saturating_sub(1));
    ranked.get(pick).map(|(i, _)| *i)
}

/// Score every visible target and compare against defending and idling.
fn evaluate_combat(
    ctx: &DayContext<'_>,
    actor: &Actor,
    condition: Condition,
    traits: Traits,
    view: &ObservedWorld<'_>,
) -> CombatChoice {
    let attacker = Attacker {
        actor,
        condition,
        traits,
        colocated: view.colocated.len(),
    };
    let human = ctx.world.entities.player.as_ref().map(|p| HumanInfo {
        id: &p.id,
        district: p.district,
        best_damage: best_weapon_damage(&p.inventory, ctx.catalog),
    });

    let mut best: Option<combat::TargetScore> = None;
    for target in view.colocated.iter().filter(|t| t.is_alive()) {
        let scored = combat::score_target(&attacker, target, human);
        if ctx.trace_scores {
            trace!(
                actor = %actor.id,
                target = %scored.target,
                kill_chance = scored.kill_chance,
                risk = scored.risk,
                score = scored.score,
                "combat target scored"
            );
        }
        if best.as_ref().is_none_or(|b| scored.score > b.score) {
            best = Some(scored);
        }
    }

    let defend = combat::defend_score(&condition, traits.caution, best.is_some());
    combat::choose(best, defend)
}
