//! Combat evaluation: the last rule of the posture cascade.
//!
//! For every visible co-located target:
//!
//!   killChance = clamp01(((dmg/105)·0.65 + hpFactor·0.35)
//!                        · (0.75+0.25·strEdge) · (0.85+0.15·dexEdge))
//!   risk       = clamp01(crowd·0.55 + hpRisk·0.35 + fpRisk·0.25)
//!   score      = killChance·(0.9+aggression) − risk·(0.6+caution) + situational terms
//!
//! The best target is attacked only if its score strictly beats both the
//! defend score and the constant idle score.

use crate::scoring::{Condition, clamp01};
use crate::types::{ActorId, District, MAX_HP, Traits};
use crate::world::Actor;

/// Score of doing nothing; constant.
pub const NOTHING_SCORE: f64 = 0.15;

/// Damage assumed for an unarmed attacker.
const UNARMED_DAMAGE: f64 = 5.0;

/// Damage normalizer in the kill-chance formula.
const DAMAGE_SCALE: f64 = 105.0;

/// Bystanders at which the crowd term saturates.
const CROWD_SATURATION: f64 = 5.0;

/// What the attacker knows about the human-controlled actor.
#[derive(Debug, Clone, Copy)]
pub struct HumanInfo<'a> {
    /// The human's id.
    pub id: &'a ActorId,
    /// The human's district.
    pub district: District,
    /// The human's strongest weapon damage.
    pub best_damage: f64,
}

/// Everything about the attacker that target scoring needs.
#[derive(Debug, Clone, Copy)]
pub struct Attacker<'a> {
    /// The attacking actor.
    pub actor: &'a Actor,
    /// Its condition summary.
    pub condition: Condition,
    /// Its personality.
    pub traits: Traits,
    /// Visible co-located actors besides the attacker.
    pub colocated: usize,
}

/// Score breakdown for one candidate target.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetScore {
    /// The candidate.
    pub target: ActorId,
    /// Estimated chance to kill.
    pub kill_chance: f64,
    /// Estimated risk to the attacker.
    pub risk: f64,
    /// Final score.
    pub score: f64,
}

/// Chance that `attacker` kills `target` today.
#[must_use]
pub fn kill_chance(attacker: &Actor, best_damage: f64, target: &Actor) -> f64 {
    let mut dmg = if best_damage > 0.0 { best_damage } else { UNARMED_DAMAGE };
    if target.shield_active {
        dmg *= 0.5;
    }
    let hp_factor = clamp01((MAX_HP - target.hp) / MAX_HP);
    let str_edge = edge(attacker.attributes.force, target.attributes.force);
    let dex_edge = edge(attacker.attributes.dexterity, target.attributes.dexterity);

    clamp01(
        ((dmg / DAMAGE_SCALE) * 0.65 + hp_factor * 0.35)
            * (0.75 + 0.25 * str_edge)
            * (0.85 + 0.15 * dex_edge),
    )
}

/// Attribute advantage mapped into `[0, 1]`; 0.5 when equal.
fn edge(mine: i32, theirs: i32) -> f64 {
    clamp01((f64::from(mine) - f64::from(theirs) + 7.0) / 14.0)
}

/// Risk the attacker takes by fighting at all.
#[must_use]
pub fn risk(condition: &Condition, bystanders: usize) -> f64 {
    let crowd = clamp01(bystanders as f64 / CROWD_SATURATION);
    let hp_risk = clamp01((40.0 - condition.hp) / 40.0);
    let fp_risk = clamp01((20.0 - condition.stamina) / 20.0);
    clamp01(crowd * 0.55 + hp_risk * 0.35 + fp_risk * 0.25)
}

/// Full attack score of `target` for `attacker`.
#[must_use]
pub fn score_target(
    attacker: &Attacker<'_>,
    target: &Actor,
    human: Option<HumanInfo<'_>>,
) -> TargetScore {
    let cond = &attacker.condition;
    let traits = &attacker.traits;

    let kill = kill_chance(attacker.actor, cond.best_damage, target);
    let risk = risk(cond, attacker.colocated.saturating_sub(1));

    let mut score = kill * (0.9 + traits.aggression) - risk * (0.6 + traits.caution);

    // Presence pressure.
    score += if cond.is_healthy() { 0.28 } else { 0.16 };
    if cond.armed {
        score += 0.10;
    }
    if cond.is_healthy() {
        score += 0.20;
    } else if cond.is_wounded() {
        score -= 0.65;
    }
    if cond.has_heavy_weapon() {
        score += 0.55;
    }
    if target.district == attacker.actor.district {
        score -= 0.55;
    }
    if let Some(human) = human {
        if target.district == human.district {
            score -= 0.20;
        }
        if &target.id == human.id {
            if cond.is_healthy() {
                score += 0.15;
            }
            if cond.is_wounded() && human.best_damage >= crate::scoring::HEAVY_WEAPON_DAMAGE {
                score -= 0.55;
            }
        }
    }
    let weaker = clamp01((MAX_HP - target.hp) / MAX_HP);
    score += weaker * if cond.is_healthy() { 0.55 } else { 0.35 };

    TargetScore {
        target: target.id.clone(),
        kill_chance: kill,
        risk,
        score,
    }
}

/// Score of bracing instead of fighting.
#[must_use]
pub fn defend_score(condition: &Condition, caution: f64, has_candidates: bool) -> f64 {
    let low_hp = clamp01((35.0 - condition.hp) / 35.0);
    let low_fp = clamp01((15.0 - condition.stamina) / 15.0);
    let fear = clamp01(low_hp * 0.9 + low_fp * 0.6);
    let base = 0.35 + caution * 0.45 + fear * 0.6;
    if has_candidates && condition.is_healthy() {
        base - 0.14
    } else {
        base - 0.06
    }
}

/// Outcome of combat evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatChoice {
    /// Attack this target.
    Attack(TargetScore),
    /// Brace.
    Defend,
    /// Idle.
    Nothing,
}

/// Pick between attacking the best target, defending and idling.
#[must_use]
pub fn choose(best: Option<TargetScore>, defend: f64) -> CombatChoice {
    let fallback = if defend >= NOTHING_SCORE {
        CombatChoice::Defend
    } else {
        CombatChoice::Nothing
    };
    match best {
        Some(target) if target.score > defend && target.score > NOTHING_SCORE => {
            CombatChoice::Attack(target)
        }
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AreaId;

    fn condition(hp: f64, stamina: f64, best_damage: f64) -> Condition {
        Condition {
            hp,
            hp_pct: hp,
            stamina,
            armed: best_damage > 0.0,
            best_damage,
        }
    }

    fn traits() -> Traits {
        Traits { aggression: 0.6, greed: 0.4, caution: 0.5 }
    }

    #[test]
    fn same_district_costs_exactly_055() {
        let me = Actor::new("npc_1", District(3), AreaId(0));
        let attacker = Attacker {
            actor: &me,
            condition: condition(100.0, 70.0, 12.0),
            traits: traits(),
            colocated: 1,
        };

        let mut stranger = Actor::new("npc_2", District(5), AreaId(0));
        stranger.hp = 60.0;
        let mut neighbor = stranger.clone();
        neighbor.district = District(3);

        let human_id = ActorId::from("player");
        let human = Some(HumanInfo { id: &human_id, district: District(12), best_damage: 0.0 });

        let far = score_target(&attacker, &stranger, human);
        let near = score_target(&attacker, &neighbor, human);
        assert!((far.score - near.score - 0.55).abs() < 1e-9);
        assert!((far.kill_chance - near.kill_chance).abs() < f64::EPSILON);
    }

    #[test]
    fn shield_halves_weapon_damage() {
        let me = Actor::new("npc_1", District(1), AreaId(0));
        let mut target = Actor::new("npc_2", District(2), AreaId(0));
        let open = kill_chance(&me, 40.0, &target);
        target.shield_active = true;
        let shielded = kill_chance(&me, 40.0, &target);
        let plain = Actor::new("x", District(2), AreaId(0));
        assert!((shielded - kill_chance(&me, 20.0, &plain)).abs() < 1e-12);
        assert!(shielded < open);
    }

    #[test]
    fn unarmed_attackers_swing_for_five() {
        let me = Actor::new("npc_1", District(1), AreaId(0));
        let target = Actor::new("npc_2", District(2), AreaId(0));
        let expected = (5.0 / 105.0) * 0.65 * (0.75 + 0.25 * 0.5) * (0.85 + 0.15 * 0.5);
        assert!((kill_chance(&me, 0.0, &target) - expected).abs() < 1e-12);
    }

    #[test]
    fn risk_grows_with_crowd_and_exhaustion() {
        let fresh = condition(100.0, 100.0, 0.0);
        let tired = condition(20.0, 5.0, 0.0);
        assert!(risk(&fresh, 0).abs() < f64::EPSILON);
        assert!(risk(&fresh, 5) > risk(&fresh, 1));
        assert!(risk(&tired, 0) > risk(&fresh, 0));
        assert!(risk(&tired, 50) <= 1.0);
    }

    #[test]
    fn defend_score_drops_when_healthy_with_targets() {
        let healthy = condition(100.0, 100.0, 0.0);
        let with = defend_score(&healthy, 0.5, true);
        let without = defend_score(&healthy, 0.5, false);
        assert!((without - with - 0.08).abs() < 1e-12);
    }

    #[test]
    fn attack_needs_to_beat_both_alternatives() {
        let target =
            TargetScore { target: ActorId::from("b"), kill_chance: 0.5, risk: 0.1, score: 0.5 };
        assert!(matches!(choose(Some(target.clone()), 0.4), CombatChoice::Attack(_)));
        assert_eq!(choose(Some(target.clone()), 0.5), CombatChoice::Defend);
        let weak = TargetScore { score: 0.1, ..target };
        assert_eq!(choose(Some(weak), 0.12), CombatChoice::Nothing);
        assert_eq!(choose(None, 0.2), CombatChoice::Defend);
        assert_eq!(choose(None, 0.15), CombatChoice::Defend);
        assert_eq!(choose(None, 0.1), CombatChoice::Nothing);
    }

    #[test]
    fn healthy_attackers_favor_the_human_by_015() {
        let me = Actor::new("npc_1", District(3), AreaId(0));
        let attacker = Attacker {
            actor: &me,
            condition: condition(100.0, 70.0, 12.0),
            traits: traits(),
            colocated: 2,
        };

        let human_id = ActorId::from("player");
        let human = Some(HumanInfo { id: &human_id, district: District(12), best_damage: 0.0 });
        let player = Actor::new("player", District(5), AreaId(0));
        let stranger = Actor::new("npc_2", District(5), AreaId(0));

        let on_human = score_target(&attacker, &player, human);
        let on_stranger = score_target(&attacker, &stranger, human);
        assert!((on_human.score - on_stranger.score - 0.15).abs() < 1e-9);

        let hurt = Attacker { condition: condition(50.0, 70.0, 12.0), ..attacker };
        let on_human = score_target(&hurt, &player, human);
        let on_stranger = score_target(&hurt, &stranger, human);
        assert!((on_human.score - on_stranger.score).abs() < 1e-9);
    }

    #[test]
    fn wounded_attackers_avoid_a_heavily_armed_human_by_055() {
        let me = Actor::new("npc_1", District(3), AreaId(0));
        let attacker = Attacker {
            actor: &me,
            condition: condition(20.0, 70.0, 12.0),
            traits: traits(),
            colocated: 1,
        };
        let player = Actor::new("player", District(12), AreaId(0));
        let human_id = ActorId::from("player");

        let armed = HumanInfo { id: &human_id, district: District(12), best_damage: 34.0 };
        let light = HumanInfo { best_damage: 29.0, ..armed };
        let against_armed = score_target(&attacker, &player, Some(armed));
        let against_light = score_target(&attacker, &player, Some(light));
        assert!((against_light.score - against_armed.score - 0.55).abs() < 1e-9);
    }

    #[test]
    fn targets_from_the_human_district_cost_020() {
        let me = Actor::new("npc_1", District(3), AreaId(0));
        let attacker = Attacker {
            actor: &me,
            condition: condition(100.0, 70.0, 12.0),
            traits: traits(),
            colocated: 1,
        };
        let human_id = ActorId::from("player");
        let human = Some(HumanInfo { id: &human_id, district: District(12), best_damage: 0.0 });

        let outsider = Actor::new("npc_2", District(5), AreaId(0));
        let mut ally = outsider.clone();
        ally.district = District(12);

        let outsider_score = score_target(&attacker, &outsider, human).score;
        let delta = outsider_score - score_target(&attacker, &ally, human).score;
        assert!((delta - 0.20).abs() < 1e-9);
        let outsider_score = score_target(&attacker, &outsider, None).score;
        let no_human = outsider_score - score_target(&attacker, &ally, None).score;
        assert!(no_human.abs() < 1e-9);
    }

    #[test]
    fn heavy_weapons_add_055_beyond_kill_chance() {
        let me = Actor::new("npc_1", District(3), AreaId(0));
        let heavy = Attacker {
            actor: &me,
            condition: condition(100.0, 70.0, 30.0),
            traits: traits(),
            colocated: 1,
        };
        let light = Attacker { condition: condition(100.0, 70.0, 29.0), ..heavy };
        let target = Actor::new("npc_2", District(5), AreaId(0));

        let a = score_target(&heavy, &target, None);
        let b = score_target(&light, &target, None);
        let kill_gain = (a.kill_chance - b.kill_chance) * (0.9 + traits().aggression);
        assert!((a.score - b.score - kill_gain - 0.55).abs() < 1e-9);
    }
}
