//! The frozen day-start world snapshot consumed by the decision pass.
//!
//! The JSON layout follows the executor's snapshot format:
//!
//! ```text
//! {
//!   "entities": { "player": Actor?, "npcs": { id: Actor } },
//!   "map":      { "areasById": { id: Area }, "adjById": { id: [id] } }
//! }
//! ```
//!
//! Missing numeric fields take full/zero defaults and
//! missing areas or adjacency entries degrade to empty results. Structural
//! problems are caught by [`WorldSnapshot::validate`], which the surrounding
//! system runs before handing a snapshot to the engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::DecisionConfig;
use crate::error::{Result, RoyaleError};
use crate::memory::ActorMemory;
use crate::types::{
    ActorId, AreaId, Attributes, District, MAX_HP, MAX_STAMINA, NoiseLevel, ThreatClass,
};

// ---------------------------------------------------------------------------
// Items & Inventory
// ---------------------------------------------------------------------------

/// A stack of identical items, on the ground or in an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Catalog id of the item.
    pub id: String,
    /// Units in the stack.
    #[serde(default = "default_qty")]
    pub qty: u32,
}

impl ItemStack {
    /// A stack of `qty` units of `id`.
    #[must_use]
    pub fn new(id: impl Into<String>, qty: u32) -> Self {
        Self { id: id.into(), qty }
    }
}

/// Carried items. Occupancy is counted in stacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    /// Carried stacks.
    pub items: Vec<ItemStack>,
    /// Indices into `items` of the equipped stacks.
    pub equipped: Vec<usize>,
}

impl Inventory {
    /// Whether nothing is carried.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether another stack would exceed `limit`.
    #[must_use]
    pub fn is_full(&self, limit: usize) -> bool {
        self.items.len() >= limit
    }
}

// ---------------------------------------------------------------------------
// Actors
// ---------------------------------------------------------------------------

/// One combatant as seen at the start of the day.
///
/// The engine reads every field but only ever writes `memory`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    /// Registry id.
    pub id: ActorId,
    /// Health, 0–100.
    #[serde(default = "default_hp")]
    pub hp: f64,
    /// Stamina, 0–100.
    #[serde(default = "default_stamina")]
    pub stamina: f64,
    /// Home district.
    #[serde(default)]
    pub district: District,
    /// Where the actor currently stands.
    pub area_id: AreaId,
    /// Carried items.
    #[serde(default)]
    pub inventory: Inventory,
    /// Physical attributes.
    #[serde(default)]
    pub attributes: Attributes,
    /// Persistent memory.
    #[serde(default)]
    pub memory: ActorMemory,
    /// Days left stuck in a trap.
    #[serde(default)]
    pub trapped_days: u32,
    /// Hidden from everyone today.
    #[serde(default)]
    pub stealthed: bool,
    /// Raised a shield today; halves incoming weapon damage.
    #[serde(default)]
    pub shield_active: bool,
    /// Explicit death marker set by the executor.
    #[serde(default = "default_true")]
    pub alive: bool,
}

impl Actor {
    /// A healthy, unarmed actor with empty memory.
    #[must_use]
    pub fn new(id: impl Into<ActorId>, district: District, area_id: AreaId) -> Self {
        Self {
            id: id.into(),
            hp: MAX_HP,
            stamina: MAX_STAMINA,
            district,
            area_id,
            inventory: Inventory::default(),
            attributes: Attributes::default(),
            memory: ActorMemory::default(),
            trapped_days: 0,
            stealthed: false,
            shield_active: false,
            alive: true,
        }
    }

    /// Whether the actor takes part in today's pass.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive && self.hp > 0.0
    }

    /// Health as a percentage of full health.
    #[must_use]
    pub fn hp_pct(&self) -> f64 {
        self.hp / MAX_HP * 100.0
    }

    /// Whether a trap still holds the actor.
    #[must_use]
    pub fn is_trapped(&self) -> bool {
        self.trapped_days > 0
    }
}

// ---------------------------------------------------------------------------
// Areas
// ---------------------------------------------------------------------------

/// Biome name of lake tiles that need a bridge to cross.
pub const WATER_BIOME: &str = "water";

/// What an active element in an area is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// A hostile or wild animal.
    Creature,
    /// Something harvestable.
    Resource,
    /// A building or fixture.
    Structure,
}

/// An active element present in an area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaElement {
    /// Element category.
    pub kind: ElementKind,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// One map area.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    /// Map id.
    pub id: AreaId,
    /// Biome name, e.g. `"forest"`.
    #[serde(default)]
    pub biome: String,
    /// Danger classification.
    #[serde(default)]
    pub threat_class: ThreatClass,
    /// Drinkable water is present.
    #[serde(default)]
    pub has_water: bool,
    /// A bridge makes a water-biome area crossable.
    #[serde(default)]
    pub has_bridge: bool,
    /// Forageable food is present.
    #[serde(default)]
    pub has_food: bool,
    /// Items lying on the ground.
    #[serde(default)]
    pub ground_items: Vec<ItemStack>,
    /// Creatures, resources and structures.
    #[serde(default)]
    pub elements: Vec<AreaElement>,
    /// Ambient noise.
    #[serde(default)]
    pub noise: NoiseLevel,
    /// Day on which the area closes for good, if scheduled.
    #[serde(default)]
    pub closes_on_day: Option<u32>,
    /// Closed areas are inactive.
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Area {
    /// A plain, open, empty area.
    #[must_use]
    pub fn new(id: AreaId) -> Self {
        Self {
            id,
            biome: String::new(),
            threat_class: ThreatClass::Neutral,
            has_water: false,
            has_bridge: false,
            has_food: false,
            ground_items: Vec::new(),
            elements: Vec::new(),
            noise: NoiseLevel::Quiet,
            closes_on_day: None,
            active: true,
        }
    }

    /// Number of creatures roaming the area.
    #[must_use]
    pub fn creature_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| e.kind == ElementKind::Creature)
            .count()
    }

    /// Whether the area closes on exactly `day`.
    #[must_use]
    pub fn closes_on(&self, day: u32) -> bool {
        self.closes_on_day == Some(day)
    }

    /// Whether this is a lake-type area with no bridge across it.
    #[must_use]
    pub fn is_open_water(&self) -> bool {
        self.biome.eq_ignore_ascii_case(WATER_BIOME) && !self.has_bridge
    }

    /// Whether a walker can stand here on `day`: active, not open water,
    /// and not closing on that day.
    #[must_use]
    pub fn is_enterable(&self, day: u32) -> bool {
        self.active && !self.is_open_water() && !self.closes_on(day)
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// All combatants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Entities {
    /// The human-controlled actor, if any.
    pub player: Option<Actor>,
    /// Non-player combatants keyed by id.
    pub npcs: BTreeMap<ActorId, Actor>,
}

/// Areas and their adjacency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameMap {
    /// Areas keyed by id.
    pub areas_by_id: BTreeMap<AreaId, Area>,
    /// Neighbor lists keyed by area id.
    pub adj_by_id: BTreeMap<AreaId, Vec<AreaId>>,
}

/// The world as it stood at the start of the day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSnapshot {
    /// Combatants.
    pub entities: Entities,
    /// Map.
    pub map: GameMap,
}

impl WorldSnapshot {
    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    /// Returns `RoyaleError::Serialization` if the JSON does not match the layout.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the snapshot (memory included) back to JSON.
    ///
    /// # Errors
    /// Returns `RoyaleError::Serialization` on encoder failure.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Area by id.
    #[must_use]
    pub fn area(&self, id: AreaId) -> Option<&Area> {
        self.map.areas_by_id.get(&id)
    }

    /// Neighbor ids of `id`; empty for unknown areas.
    #[must_use]
    pub fn neighbors(&self, id: AreaId) -> &[AreaId] {
        self.map.adj_by_id.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Id of the human-controlled actor.
    #[must_use]
    pub fn player_id(&self) -> Option<&ActorId> {
        self.entities.player.as_ref().map(|p| &p.id)
    }

    /// Actor by id, player included.
    #[must_use]
    pub fn actor(&self, id: &ActorId) -> Option<&Actor> {
        match &self.entities.player {
            Some(player) if &player.id == id => Some(player),
            _ => self.entities.npcs.get(id),
        }
    }

    /// Mutable actor by id, player included.
    pub fn actor_mut(&mut self, id: &ActorId) -> Option<&mut Actor> {
        match &mut self.entities.player {
            Some(player) if &player.id == id => Some(player),
            _ => self.entities.npcs.get_mut(id),
        }
    }

    /// Every living actor, player first, then NPCs in id order.
    pub fn living_actors(&self) -> impl Iterator<Item = &Actor> {
        self.entities
            .player
            .iter()
            .chain(self.entities.npcs.values())
            .filter(|a| a.is_alive())
    }

    /// The fixed processing order of a day's pass.
    ///
    /// Living NPCs in ascending id order, followed by the human-controlled
    /// actor when `drive_player` is set.
    #[must_use]
    pub fn registry_order(&self, drive_player: bool) -> Vec<ActorId> {
        let mut order: Vec<ActorId> = self
            .entities
            .npcs
            .values()
            .filter(|a| a.is_alive())
            .map(|a| a.id.clone())
            .collect();
        if drive_player {
            if let Some(player) = self.entities.player.as_ref().filter(|p| p.is_alive()) {
                order.push(player.id.clone());
            }
        }
        order
    }

    /// Count visible (living, non-stealthed) actors per area.
    #[must_use]
    pub fn occupancy(&self) -> Occupancy {
        let mut counts = BTreeMap::new();
        for actor in self.living_actors().filter(|a| !a.stealthed) {
            *counts.entry(actor.area_id).or_insert(0) += 1;
        }
        Occupancy { counts }
    }

    /// Check the structural contract the engine relies on.
    ///
    /// # Errors
    /// Returns `RoyaleError::Validation` describing the first broken rule.
    pub fn validate(&self, config: &DecisionConfig) -> Result<()> {
        if self.area(config.staging_area).is_none() {
            return Err(invalid(format!("staging area {} is not on the map", config.staging_area)));
        }
        for (key, area) in &self.map.areas_by_id {
            if *key != area.id {
                return Err(invalid(format!("area keyed {key} carries id {}", area.id)));
            }
        }
        for (from, neighbors) in &self.map.adj_by_id {
            if self.area(*from).is_none() {
                return Err(invalid(format!("adjacency listed for unknown area {from}")));
            }
            if let Some(to) = neighbors.iter().find(|n| self.area(**n).is_none()) {
                return Err(invalid(format!("area {from} lists unknown neighbor {to}")));
            }
        }
        for (key, npc) in &self.entities.npcs {
            if *key != npc.id {
                return Err(invalid(format!("npc keyed {key} carries id {}", npc.id)));
            }
        }
        for actor in self.entities.player.iter().chain(self.entities.npcs.values()) {
            if self.area(actor.area_id).is_none() {
                return Err(RoyaleError::UnknownArea(actor.area_id));
            }
            if actor.inventory.len() > config.inventory_limit {
                return Err(invalid(format!(
                    "actor {} carries {} stacks (limit {})",
                    actor.id,
                    actor.inventory.len(),
                    config.inventory_limit
                )));
            }
        }
        Ok(())
    }
}

/// Visible head-count per area at the start of the day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    counts: BTreeMap<AreaId, usize>,
}

impl Occupancy {
    /// Visible actors standing in `area`.
    #[must_use]
    pub fn count(&self, area: AreaId) -> usize {
        self.counts.get(&area).copied().unwrap_or(0)
    }
}

fn invalid(reason: String) -> RoyaleError {
    RoyaleError::Validation { reason }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_qty() -> u32 { 1 }
fn default_hp() -> f64 { MAX_HP }
fn default_stamina() -> f64 { MAX_STAMINA }
