//! Perception Builder: one actor's bounded view of the world.
//!
//! The view is rebuilt for every actor-day and thrown away afterwards:
//!
//! 1. The current area is seen in full
//! 2. Co-located living actors are visible unless stealthed (the
//!    human-controlled actor included)
//! 3. Other areas reveal their details only if the actor has stood in them
//!    before; otherwise only their id and active flag are known. Movement
//!    scoring reads areas through the same [`summarize`] gate

use crate::memory::ActorMemory;
use crate::types::{AreaId, ThreatClass};
use crate::world::{Actor, Area, ItemStack, WorldSnapshot};

/// What an actor can tell about one area.
///
/// The optional fields are `None` for areas the actor has never stood in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaSummary<'w> {
    /// Area id.
    pub id: AreaId,
    /// Whether the area is still open.
    pub active: bool,
    /// Biome name.
    pub biome: Option<&'w str>,
    /// Danger classification.
    pub threat_class: Option<ThreatClass>,
    /// Scheduled closure.
    pub closes_on_day: Option<Option<u32>>,
    /// Forageable food.
    pub has_food: Option<bool>,
    /// Drinkable water.
    pub has_water: Option<bool>,
    /// Ground stacks lying around.
    pub ground_item_count: Option<usize>,
    /// Creatures roaming.
    pub creature_count: Option<usize>,
}

impl<'w> AreaSummary<'w> {
    fn known(area: &'w Area) -> Self {
        Self {
            id: area.id,
            active: area.active,
            biome: Some(area.biome.as_str()),
            threat_class: Some(area.threat_class),
            closes_on_day: Some(area.closes_on_day),
            has_food: Some(area.has_food),
            has_water: Some(area.has_water),
            ground_item_count: Some(area.ground_items.len()),
            creature_count: Some(area.creature_count()),
        }
    }

    fn unknown(id: AreaId, active: bool) -> Self {
        Self {
            id,
            active,
            biome: None,
            threat_class: None,
            closes_on_day: None,
            has_food: None,
            has_water: None,
            ground_item_count: None,
            creature_count: None,
        }
    }

    /// Whether the actor has details on this area.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.threat_class.is_some()
    }
}

/// Whether `observer` has details on `area`: it stands there now or has
/// stood there before.
#[must_use]
pub fn knows_area(observer: &Actor, memory: &ActorMemory, area: AreaId) -> bool {
    area == observer.area_id || memory.knows(area)
}

/// Summarize `area` as `observer` sees it.
#[must_use]
pub fn summarize<'w>(observer: &Actor, memory: &ActorMemory, area: &'w Area) -> AreaSummary<'w> {
    if knows_area(observer, memory, area.id) {
        AreaSummary::known(area)
    } else {
        AreaSummary::unknown(area.id, area.active)
    }
}

/// The actor's view for today.
#[derive(Debug, Clone)]
pub struct ObservedWorld<'w> {
    /// Where the actor stands; `None` only for a malformed snapshot.
    pub current: Option<&'w Area>,
    /// Visible actors sharing the current area, the observer excluded.
    pub colocated: Vec<&'w Actor>,
    /// One summary per adjacency entry, in adjacency order.
    pub neighbors: Vec<AreaSummary<'w>>,
}

impl<'w> ObservedWorld<'w> {
    /// Ground items visible in the current area.
    #[must_use]
    pub fn ground_items(&self) -> &'w [ItemStack] {
        self.current.map(|a| a.ground_items.as_slice()).unwrap_or(&[])
    }

    /// Whether the current area has drinkable water.
    #[must_use]
    pub fn has_water(&self) -> bool {
        self.current.is_some_and(|a| a.has_water)
    }
}

/// Assemble the view for `observer`, whose memory is passed separately
/// because it is checked out of the snapshot during the actor's turn.
#[must_use]
pub fn observe<'w>(
    world: &'w WorldSnapshot,
    observer: &Actor,
    memory: &ActorMemory,
) -> ObservedWorld<'w> {
    let here = observer.area_id;
    let current = world.area(here);

    let colocated = world
        .living_actors()
        .filter(|a| a.area_id == here && a.id != observer.id && !a.stealthed)
        .collect();

    let neighbors = world
        .neighbors(here)
        .iter()
        .map(|&id| match world.area(id) {
            Some(area) => summarize(observer, memory, area),
            None => AreaSummary::unknown(id, false),
        })
        .collect();

    ObservedWorld {
        current,
        colocated,
        neighbors,
    }
}
