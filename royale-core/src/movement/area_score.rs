//! Area Scoring: how attractive it is to end the day in a given area.
//!
//! ```text
//! score = loot·(0.4+greed) + food·(0.35+needFood)
//!       + safety·(0.25+caution) − threat·(0.25+caution)
//!       − distance − revisit − crowd + explore − recent
//!       + noise + hunt + jitter
//! ```
//!
//! Loot, food, water, threat class and creatures are read through
//! [`perception::summarize`], so they only count for areas the actor knows
//! (visited before, or standing in). Closure, activity, the lake biome and
//! noise are public.

use crate::engine::DayContext;
use crate::memory::ActorMemory;
use crate::oracle::salts;
use crate::perception;
use crate::scoring::{Condition, clamp01};
use crate::types::{NoiseLevel, ThreatClass, Traits};
use crate::world::{Actor, Area};

/// Score of an area nobody can stand in.
pub const REJECTED: f64 = -1.0e9;

/// Per-term breakdown, kept for score traces and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AreaScore {
    /// Known ground stacks, or a flat guess.
    pub loot: f64,
    /// Food and drinkable water.
    pub food: f64,
    /// Stamina-driven weight on `food`.
    pub need_food: f64,
    /// Threat-class comfort.
    pub safety: f64,
    /// Threat class plus creatures.
    pub threat: f64,
    /// Walking cost.
    pub distance: f64,
    /// Cost of leaving for somewhere else.
    pub revisit: f64,
    /// Penalty for areas in the recent ring.
    pub recent: f64,
    /// Pull of unknown areas.
    pub explore: f64,
    /// Head-count and staging-area crowding.
    pub crowd: f64,
    /// Noise, read through the actor's condition.
    pub noise: f64,
    /// Pull of populated areas for fit, armed actors.
    pub hunt: f64,
    /// Deterministic tie-breaker.
    pub jitter: f64,
    /// Weighted total.
    pub total: f64,
}

/// Scores areas from one actor's point of view.
#[derive(Debug, Clone, Copy)]
pub struct AreaScorer<'a> {
    ctx: &'a DayContext<'a>,
    actor: &'a Actor,
    memory: &'a ActorMemory,
    traits: Traits,
    condition: Condition,
}

impl<'a> AreaScorer<'a> {
    /// Bind a scorer to an actor-day.
    #[must_use]
    pub fn new(
        ctx: &'a DayContext<'a>,
        actor: &'a Actor,
        memory: &'a ActorMemory,
        traits: Traits,
    ) -> Self {
        Self {
            ctx,
            actor,
            memory,
            traits,
            condition: Condition::of(actor, ctx.catalog),
        }
    }

    /// Total score of ending the day in `area`, `steps` away.
    #[must_use]
    pub fn score(&self, area: &Area, steps: usize) -> f64 {
        self.breakdown(area, steps).map_or(REJECTED, |s| s.total)
    }

    /// Full breakdown, or `None` if the area is rejected outright.
    #[must_use]
    pub fn breakdown(&self, area: &Area, steps: usize) -> Option<AreaScore> {
        let day = self.ctx.day;
        if !area.is_enterable(day + 1) {
            return None;
        }

        let Traits { greed, caution, .. } = self.traits;
        let cond = &self.condition;
        let seen = perception::summarize(self.actor, self.memory, area);
        let is_current = area.id == self.actor.area_id;
        let known = seen.is_known();
        let occupants = self.ctx.occupancy.count(area.id);

        let mut s = AreaScore {
            loot: seen.ground_item_count.map_or(0.10, |n| n as f64 * 0.35),
            ..AreaScore::default()
        };

        let has_food = seen.has_food.unwrap_or(false);
        let has_water = seen.has_water.unwrap_or(false);
        s.food = 0.45 * f64::from(u8::from(has_food)) + 0.18 * f64::from(u8::from(has_water));
        s.need_food = clamp01((40.0 - cond.stamina) / 40.0);
        if cond.stamina <= 20.0 {
            s.need_food = (s.need_food + 0.35).min(1.0);
        }

        s.safety = match seen.threat_class {
            Some(ThreatClass::Safe) => 0.45,
            Some(ThreatClass::Neutral) => 0.2,
            _ => -0.25,
        };
        s.threat = if seen.threat_class == Some(ThreatClass::Threatening) {
            0.35
        } else {
            0.05
        };
        s.threat += 0.25 * seen.creature_count.unwrap_or(0) as f64;

        s.distance = steps as f64 * 0.12;
        s.revisit = match (is_current, known) {
            (true, _) => 0.0,
            (false, true) => 0.02,
            (false, false) => 0.06,
        };
        if self.memory.recent_areas.contains(area.id) {
            s.recent = 0.12;
        }
        if !known {
            s.explore = 0.18 + greed * 0.18 - caution * 0.12;
        }

        s.crowd = occupants.saturating_sub(1) as f64 * (0.04 + caution * 0.03);
        if area.id == self.ctx.config.staging_area {
            if day <= 1 {
                s.crowd *= 0.2;
            } else {
                s.crowd += 0.10;
            }
        }

        s.noise = self.noise_bonus(area.noise);
        if cond.armed && cond.is_healthy() {
            s.hunt = f64::min(0.45, occupants as f64 * 0.14);
        }
        s.jitter = self.ctx.oracle.draw(day, &salts::area_jitter(&self.actor.id, area.id)) * 0.01;

        s.total = s.loot * (0.4 + greed)
            + s.food * (0.35 + s.need_food)
            + s.safety * (0.25 + caution)
            - s.threat * (0.25 + caution)
            - s.distance
            - s.revisit
            - s.crowd
            + s.explore
            - s.recent
            + s.noise
            + s.hunt
            + s.jitter;
        Some(s)
    }

    fn noise_bonus(&self, noise: NoiseLevel) -> f64 {
        let cond = &self.condition;
        let (quiet, noisy, loud) = if cond.is_wounded() {
            (0.05, -0.18, -0.35)
        } else if !cond.armed {
            (0.0, -0.06, -0.14)
        } else if cond.is_healthy() {
            (0.0, 0.18, 0.32)
        } else {
            (0.0, 0.10, 0.20)
        };
        match noise {
            NoiseLevel::Quiet => quiet,
            NoiseLevel::Noisy => noisy,
            NoiseLevel::HighlyNoisy => loud,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ItemDef, ItemKind, StaticCatalog};
    use crate::config::DecisionConfig;
    use crate::oracle::Oracle;
    use crate::types::{AreaId, District};
    use crate::world::{AreaElement, ElementKind, ItemStack, WorldSnapshot};

    const TRAITS: Traits = Traits { aggression: 0.5, greed: 0.5, caution: 0.5 };

    fn catalog() -> StaticCatalog {
        StaticCatalog::new().with_item(
            "axe",
            ItemDef { kind: ItemKind::Weapon, damage: 20.0, ..ItemDef::default() },
        )
    }

    fn world() -> WorldSnapshot {
        let mut world = WorldSnapshot::default();
        for id in 0..4 {
            world.map.areas_by_id.insert(AreaId(id), Area::new(AreaId(id)));
        }
        world
    }

    fn breakdown(
        world: &WorldSnapshot,
        actor: &Actor,
        memory: &ActorMemory,
        area: u32,
        day: u32,
    ) -> Option<AreaScore> {
        let config = DecisionConfig::default();
        let catalog = catalog();
        let ctx = DayContext::new(world, &config, &catalog, Oracle::new(7), day);
        let scorer = AreaScorer::new(&ctx, actor, memory, TRAITS);
        let area = world.area(AreaId(area)).expect("area exists");
        scorer.breakdown(area, 1)
    }

    #[test]
    fn unknown_areas_hide_their_contents() {
        let mut world = world();
        if let Some(area) = world.map.areas_by_id.get_mut(&AreaId(2)) {
            area.ground_items = vec![ItemStack::new("axe", 1); 4];
            area.has_food = true;
            area.threat_class = ThreatClass::Safe;
            area.elements.push(AreaElement { kind: ElementKind::Creature, name: "wolf".into() });
        }
        let actor = Actor::new("npc_1", District(1), AreaId(1));

        let unknown = breakdown(&world, &actor, &ActorMemory::new(), 2, 3).expect("enterable");
        assert!((unknown.loot - 0.10).abs() < 1e-12);
        assert!(unknown.food.abs() < 1e-12);
        assert!((unknown.safety + 0.25).abs() < 1e-12);
        assert!((unknown.threat - 0.05).abs() < 1e-12);
        assert!((unknown.revisit - 0.06).abs() < 1e-12);
        assert!((unknown.explore - (0.18 + 0.09 - 0.06)).abs() < 1e-12);

        let mut memory = ActorMemory::new();
        memory.visited.insert(AreaId(2));
        let known = breakdown(&world, &actor, &memory, 2, 3).expect("enterable");
        assert!((known.loot - 1.4).abs() < 1e-12);
        assert!((known.food - 0.45).abs() < 1e-12);
        assert!((known.safety - 0.45).abs() < 1e-12);
        assert!((known.threat - 0.30).abs() < 1e-12);
        assert!(known.explore.abs() < 1e-12);
    }

    #[test]
    fn closing_areas_are_rejected() {
        let mut world = world();
        if let Some(area) = world.map.areas_by_id.get_mut(&AreaId(3)) {
            area.closes_on_day = Some(5);
        }
        let actor = Actor::new("npc_1", District(1), AreaId(0));
        assert!(breakdown(&world, &actor, &ActorMemory::new(), 3, 4).is_none());
        assert!(breakdown(&world, &actor, &ActorMemory::new(), 3, 3).is_some());
    }

    #[test]
    fn staging_crowding_is_softened_on_day_one() {
        let mut world = world();
        for n in 0..5 {
            let npc = Actor::new(format!("npc_{n}"), District(1), AreaId(0));
            world.entities.npcs.insert(npc.id.clone(), npc);
        }
        let actor = Actor::new("npc_0", District(1), AreaId(0));
        let base = 4.0 * (0.04 + 0.5 * 0.03);

        let day_one = breakdown(&world, &actor, &ActorMemory::new(), 0, 1).expect("open");
        assert!((day_one.crowd - base * 0.2).abs() < 1e-12);
        let day_two = breakdown(&world, &actor, &ActorMemory::new(), 0, 2).expect("open");
        assert!((day_two.crowd - (base + 0.10)).abs() < 1e-12);
    }

    #[test]
    fn noise_reads_through_condition() {
        let mut world = world();
        if let Some(area) = world.map.areas_by_id.get_mut(&AreaId(1)) {
            area.noise = NoiseLevel::HighlyNoisy;
        }
        let mut actor = Actor::new("npc_1", District(1), AreaId(0));
        let memory = ActorMemory::new();

        let unarmed = breakdown(&world, &actor, &memory, 1, 2).expect("open");
        assert!((unarmed.noise + 0.14).abs() < 1e-12);

        actor.inventory.items.push(ItemStack::new("axe", 1));
        let hunter = breakdown(&world, &actor, &memory, 1, 2).expect("open");
        assert!((hunter.noise - 0.32).abs() < 1e-12);

        actor.hp = 20.0;
        let hurt = breakdown(&world, &actor, &memory, 1, 2).expect("open");
        assert!((hurt.noise + 0.35).abs() < 1e-12);
    }

    #[test]
    fn jitter_stays_below_one_hundredth() {
        let world = world();
        let actor = Actor::new("npc_1", District(1), AreaId(0));
        for area in 0..4 {
            let s = breakdown(&world, &actor, &ActorMemory::new(), area, 2).expect("open");
            assert!((0.0..0.01).contains(&s.jitter));
        }
    }

    #[test]
    fn armed_mid_health_actors_like_some_noise() {
        let mut world = world();
        for (id, noise) in [(1, NoiseLevel::Noisy), (2, NoiseLevel::HighlyNoisy)] {
            if let Some(area) = world.map.areas_by_id.get_mut(&AreaId(id)) {
                area.noise = noise;
            }
        }
        let mut actor = Actor::new("npc_1", District(1), AreaId(0));
        actor.inventory.items.push(ItemStack::new("axe", 1));
        actor.hp = 50.0;
        let memory = ActorMemory::new();

        let noisy = breakdown(&world, &actor, &memory, 1, 2).expect("open");
        assert!((noisy.noise - 0.10).abs() < 1e-12);
        let loud = breakdown(&world, &actor, &memory, 2, 2).expect("open");
        assert!((loud.noise - 0.20).abs() < 1e-12);
        let quiet = breakdown(&world, &actor, &memory, 3, 2).expect("open");
        assert!(quiet.noise.abs() < 1e-12);
    }

    #[test]
    fn hunting_bonus_grows_with_occupants_and_caps_at_045() {
        let mut world = world();
        for n in 0..2 {
            let npc = Actor::new(format!("npc_a{n}"), District(2), AreaId(1));
            world.entities.npcs.insert(npc.id.clone(), npc);
        }
        for n in 0..5 {
            let npc = Actor::new(format!("npc_b{n}"), District(2), AreaId(2));
            world.entities.npcs.insert(npc.id.clone(), npc);
        }
        let mut hunter = Actor::new("npc_1", District(1), AreaId(0));
        hunter.inventory.items.push(ItemStack::new("axe", 1));
        let memory = ActorMemory::new();

        let pair = breakdown(&world, &hunter, &memory, 1, 2).expect("open");
        assert!((pair.hunt - 0.28).abs() < 1e-12);
        let crowd = breakdown(&world, &hunter, &memory, 2, 2).expect("open");
        assert!((crowd.hunt - 0.45).abs() < 1e-12);
        let empty = breakdown(&world, &hunter, &memory, 3, 2).expect("open");
        assert!(empty.hunt.abs() < 1e-12);

        let unarmed = Actor::new("npc_9", District(1), AreaId(0));
        assert!(breakdown(&world, &unarmed, &memory, 2, 2).expect("open").hunt.abs() < 1e-12);
        hunter.hp = 60.0;
        assert!(breakdown(&world, &hunter, &memory, 2, 2).expect("open").hunt.abs() < 1e-12);
    }

    #[test]
    fn recently_entered_areas_cost_012_including_the_current_one() {
        let world = world();
        let actor = Actor::new("npc_1", District(1), AreaId(1));
        let mut memory = ActorMemory::new();
        memory.remember_area(AreaId(2), 4);
        memory.remember_area(AreaId(1), 4);

        let left = breakdown(&world, &actor, &memory, 2, 2).expect("open");
        assert!((left.recent - 0.12).abs() < 1e-12);
        let fresh = breakdown(&world, &actor, &memory, 3, 2).expect("open");
        assert!(fresh.recent.abs() < 1e-12);

        // The day's own area was just recorded, so staying pays it too.
        let stay = breakdown(&world, &actor, &memory, 1, 2).expect("open");
        assert!((stay.recent - 0.12).abs() < 1e-12);
        assert!(stay.revisit.abs() < 1e-12);
    }
}
