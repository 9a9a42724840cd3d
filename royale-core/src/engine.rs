//! Intent Emitter: drives one decision pass over every living actor.
//!
//! A pass runs in three steps:
//!
//! 1. **Begin day**: every actor's transient day flags are cleared.
//! 2. **Check out memories**: the memory of each actor in registry order is
//!    moved out of the snapshot, which is then frozen for reads. Every actor
//!    sees the same day-start positions, ground items, hp and stamina.
//! 3. **Decide**: per actor: record the current area, ensure traits,
//!    perceive, choose a posture, choose a movement. Both intents are
//!    appended in that order. Memories go back into the snapshot at the end.
//!
//! Registry order is NPCs by ascending id, then the human-controlled actor
//! when [`DecisionConfig::drive_player`] is set.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, debug_span, info, info_span, warn};

use crate::catalog::{ItemCatalog, StaticCatalog};
use crate::config::{DecisionConfig, RoyaleConfig};
use crate::error::{Result, RoyaleError};
use crate::intent::{Action, Intent};
use crate::memory::ActorMemory;
use crate::metrics::{DayMetrics, spans};
use crate::movement::{self, MovementDecision};
use crate::oracle::Oracle;
use crate::perception;
use crate::personality;
use crate::posture::{self, PostureDecision, PostureRule};
use crate::replay::DayRecord;
use crate::types::ActorId;
use crate::world::{Actor, Occupancy, WorldSnapshot};

/// Everything shared by all actors during one pass.
pub struct DayContext<'a> {
    /// The frozen day-start world.
    pub world: &'a WorldSnapshot,
    /// Decision tuning.
    pub config: &'a DecisionConfig,
    /// Item definitions.
    pub catalog: &'a dyn ItemCatalog,
    /// Seeded randomness.
    pub oracle: Oracle,
    /// Current day.
    pub day: u32,
    /// Visible head-count per area at day start.
    pub occupancy: Occupancy,
    /// Emit per-candidate scores at TRACE level.
    pub trace_scores: bool,
}

impl<'a> DayContext<'a> {
    /// Freeze `world` for a pass on `day`.
    #[must_use]
    pub fn new(
        world: &'a WorldSnapshot,
        config: &'a DecisionConfig,
        catalog: &'a dyn ItemCatalog,
        oracle: Oracle,
        day: u32,
    ) -> Self {
        Self {
            world,
            config,
            catalog,
            oracle,
            day,
            occupancy: world.occupancy(),
            trace_scores: false,
        }
    }

    /// Toggle score traces.
    #[must_use]
    pub fn with_trace_scores(mut self, enabled: bool) -> Self {
        self.trace_scores = enabled;
        self
    }
}

impl fmt::Debug for DayContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DayContext")
            .field("day", &self.day)
            .field("seed", &self.oracle.seed())
            .field("config", self.config)
            .field("occupancy", &self.occupancy)
            .field("trace_scores", &self.trace_scores)
            .finish_non_exhaustive()
    }
}

/// Both decisions for one actor-day.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorTurn {
    /// The non-movement decision.
    pub posture: PostureDecision,
    /// The movement decision.
    pub movement: MovementDecision,
}

/// Run one actor's turn against its checked-out memory.
pub fn decide_actor(ctx: &DayContext<'_>, actor: &Actor, memory: &mut ActorMemory) -> ActorTurn {
    memory.remember_area(actor.area_id, ctx.config.recent_areas_capacity);
    let traits = personality::ensure(memory, &ctx.oracle, &actor.id, actor.district);

    let view = perception::observe(ctx.world, actor, memory);
    debug!(
        visible = view.colocated.len(),
        known_neighbors = view.neighbors.iter().filter(|n| n.is_known()).count(),
        neighbors = view.neighbors.len(),
        "perceived"
    );
    let posture = posture::decide(ctx, actor, memory, traits, &view);
    let movement = movement::decide(ctx, actor, memory, traits);

    ActorTurn { posture, movement }
}

/// What one pass produced.
#[derive(Debug, Clone)]
pub struct DayOutcome {
    /// Seed, day, intents and fingerprints.
    pub record: DayRecord,
    /// Counters for the pass.
    pub metrics: DayMetrics,
}

impl DayOutcome {
    /// The ordered intent list.
    #[must_use]
    pub fn intents(&self) -> &[Intent] {
        &self.record.intents
    }
}

/// The NPC decision engine: a seed, a configuration and an item catalog.
#[derive(Debug, Clone)]
pub struct DecisionEngine<C: ItemCatalog = StaticCatalog> {
    oracle: Oracle,
    config: RoyaleConfig,
    catalog: C,
}

impl<C: ItemCatalog> DecisionEngine<C> {
    /// Create an engine for the game seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64, config: RoyaleConfig, catalog: C) -> Self {
        Self {
            oracle: Oracle::new(seed),
            config,
            catalog,
        }
    }

    /// The game seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.oracle.seed()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RoyaleConfig {
        &self.config
    }

    /// Item catalog in use.
    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Check that `world` satisfies the contract a pass relies on.
    ///
    /// # Errors
    /// Returns `RoyaleError::Validation` or `RoyaleError::UnknownArea` for a
    /// malformed snapshot.
    pub fn validate(&self, world: &WorldSnapshot) -> Result<()> {
        world.validate(&self.config.decision)
    }

    /// Decide for a single living actor without touching `world`.
    ///
    /// The actor's memory is cloned, so previews never affect a later pass.
    ///
    /// # Errors
    /// Returns `RoyaleError::UnknownActor` if `id` is absent or dead.
    pub fn preview(&self, world: &WorldSnapshot, id: &ActorId, day: u32) -> Result<ActorTurn> {
        let actor = world
            .actor(id)
            .filter(|a| a.is_alive())
            .ok_or_else(|| RoyaleError::UnknownActor(id.clone()))?;
        let mut memory = actor.memory.clone();
        memory.begin_day();
        let ctx = DayContext::new(world, &self.config.decision, &self.catalog, self.oracle, day)
            .with_trace_scores(self.config.telemetry.trace_scores);
        Ok(decide_actor(&ctx, actor, &mut memory))
    }

    /// Run the decision pass for `day`.
    ///
    /// Only actor memories are written; everything else in `world` is left
    /// untouched for the executor to apply the returned intents to.
    pub fn run_day(&self, world: &mut WorldSnapshot, day: u32) -> DayOutcome {
        let decision = &self.config.decision;
        let span = info_span!(spans::DAY, seed = self.seed(), day, actors = tracing::field::Empty);
        let _enter = span.enter();

        for actor in world.entities.player.iter_mut().chain(world.entities.npcs.values_mut()) {
            actor.memory.begin_day();
        }

        let order = world.registry_order(decision.drive_player);
        span.record("actors", order.len());
        let mut memories: BTreeMap<ActorId, ActorMemory> = order
            .iter()
            .filter_map(|id| {
                let actor = world.actor_mut(id)?;
                Some((id.clone(), std::mem::take(&mut actor.memory)))
            })
            .collect();

        let frozen: &WorldSnapshot = world;
        let ctx = DayContext::new(frozen, decision, &self.catalog, self.oracle, day)
            .with_trace_scores(self.config.telemetry.trace_scores);

        let mut intents = Vec::with_capacity(order.len() * 2);
        let mut metrics = DayMetrics { days: 1, ..DayMetrics::default() };

        for id in &order {
            let (Some(actor), Some(memory)) = (frozen.actor(id), memories.get_mut(id)) else {
                continue;
            };
            let _turn_span =
                debug_span!(spans::ACTOR, actor = %id, area = %actor.area_id).entered();

            let turn = decide_actor(&ctx, actor, memory);
            debug!(
                rule = %turn.posture.rule,
                posture = %turn.posture.action.kind(),
                movement = %turn.movement.action.kind(),
                forced = ?turn.movement.forced,
                "actor decided"
            );

            metrics.actors += 1;
            metrics.flee_flags += u64::from(memory.today.wants_to_flee);
            metrics.rush_collects += u64::from(turn.posture.rule == PostureRule::StagingRush);
            metrics.scramble_blocked += u64::from(turn.movement.scramble_blocked);
            metrics.forced_moves += u64::from(turn.movement.forced.is_some());

            let posture = emit(id, turn.posture.action, || Action::nothing("invalid_posture"));
            let movement = emit(id, turn.movement.action, || Action::stay("invalid_route"));
            metrics.record_intent(&posture);
            metrics.record_intent(&movement);
            intents.push(posture);
            intents.push(movement);
        }
        drop(ctx);

        for (id, memory) in memories {
            if let Some(actor) = world.actor_mut(&id) {
                actor.memory = memory;
            }
        }

        let record = DayRecord::new(self.seed(), day, intents, world);
        info!(
            intents = record.intents.len(),
            fingerprint = format_args!("{:016x}", record.fingerprint),
            flee = metrics.flee_flags,
            forced = metrics.forced_moves,
            "day decided"
        );
        DayOutcome { record, metrics }
    }
}

/// Build an intent through its validating constructor, falling back to a
/// harmless action if the payload is rejected.
fn emit(source: &ActorId, action: Action, fallback: impl FnOnce() -> Action) -> Intent {
    let built = match action {
        Action::Attack { target_id } => Intent::attack(source.clone(), target_id),
        Action::Move { route } => Intent::move_along(source.clone(), route),
        Action::Collect { item_index } => Ok(Intent::collect(source.clone(), item_index)),
        other => Ok(Intent::new(source.clone(), other)),
    };
    built.unwrap_or_else(|err| {
        warn!(actor = %source, %err, "rejected intent payload");
        Intent::new(source.clone(), fallback())
    })
}
