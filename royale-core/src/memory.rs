//! Per-actor persistent memory.
//!
//! [`ActorMemory`] is owned by its actor and is the only state the decision
//! pass writes. It holds:
//!
//! - **traits**: computed once, never recomputed
//! - **visited**: every area the actor has stood in; never shrinks
//! - **recent areas**: a bounded ring of the latest distinct areas
//! - **day flags**: transient, wiped by [`ActorMemory::begin_day`]
//! - **empty-handed attempts**: staging-area scramble counter

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::types::{AreaId, Traits};

/// Transient flags that live for a single day's pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DayFlags {
    /// The posture stage committed to a collection today.
    pub committed_to_collect: bool,
    /// The posture stage decided the actor should run.
    pub wants_to_flee: bool,
}

/// Bounded ring of the most recently entered areas, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentAreas {
    ring: VecDeque<AreaId>,
}

impl RecentAreas {
    /// Record `area`, evicting the oldest entries beyond `capacity`.
    ///
    /// Re-entering the newest area is a no-op so that staying put does not
    /// flush the ring.
    pub fn push(&mut self, area: AreaId, capacity: usize) {
        if self.ring.back() == Some(&area) {
            return;
        }
        self.ring.push_back(area);
        while self.ring.len() > capacity {
            self.ring.pop_front();
        }
    }

    /// Whether `area` is in the ring.
    #[must_use]
    pub fn contains(&self, area: AreaId) -> bool {
        self.ring.contains(&area)
    }

    /// Remembered areas, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &AreaId> {
        self.ring.iter()
    }
}

/// Everything an actor remembers between days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActorMemory {
    /// Personality, filled in on the actor's first decision.
    pub traits: Option<Traits>,
    /// Areas the actor has stood in.
    pub visited: BTreeSet<AreaId>,
    /// The latest distinct areas entered.
    pub recent_areas: RecentAreas,
    /// Flags for the current day only.
    pub today: DayFlags,
    /// Consecutive days spent empty-handed at a looted staging area.
    pub empty_handed_attempts: u32,
}

impl ActorMemory {
    /// Create an empty memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every transient field. Runs for all actors before any decision.
    pub fn begin_day(&mut self) {
        self.today = DayFlags::default();
    }

    /// Mark `area` as visited and push it onto the recent ring.
    pub fn remember_area(&mut self, area: AreaId, recent_capacity: usize) {
        self.visited.insert(area);
        self.recent_areas.push(area, recent_capacity);
    }

    /// Whether the actor has ever stood in `area`.
    #[must_use]
    pub fn knows(&self, area: AreaId) -> bool {
        self.visited.contains(&area)
    }
}
