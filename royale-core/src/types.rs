//! Core type definitions shared by every decision stage.
//!
//! All types are serializable so a world snapshot can cross the executor
//! boundary as JSON.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Full health; hp percentages are measured against this.
pub const MAX_HP: f64 = 100.0;

/// Full stamina; also the default when a snapshot omits the field.
pub const MAX_STAMINA: f64 = 100.0;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Unique identifier for a combatant (NPC or the human-controlled actor).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub String);

impl ActorId {
    /// Create an actor id from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ActorId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Unique identifier for a map area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(pub u32);

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Home district of an actor. Same-district actors are reluctant to fight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct District(pub u8);

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered list of areas to walk through, excluding the starting area.
pub type Route = Vec<AreaId>;

// ---------------------------------------------------------------------------
// Area Classification
// ---------------------------------------------------------------------------

/// How dangerous an area is known to be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatClass {
    /// No standing hazards.
    Safe,
    /// Mild hazards.
    #[default]
    Neutral,
    /// Active hazards; scores treat this as the worst class.
    Threatening,
}

/// Ambient noise of an area, audible from anywhere on the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseLevel {
    /// Nothing to hear.
    #[default]
    Quiet,
    /// Some commotion.
    Noisy,
    /// Loud fighting or structures collapsing.
    HighlyNoisy,
}

// ---------------------------------------------------------------------------
// Actor Attributes
// ---------------------------------------------------------------------------

/// Physical attributes. Missing values default to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    /// Raw strength, compared against a target's in melee.
    pub force: i32,
    /// Agility, compared against a target's in melee.
    pub dexterity: i32,
    /// Awareness stat.
    pub perception: i32,
}

// ---------------------------------------------------------------------------
// Personality Traits
// ---------------------------------------------------------------------------

/// Fixed-at-creation personality scalars, each inside `(0, 1]`.
///
/// - **aggression** in `[0.25, 1.0)`: weights kill chance in combat scoring
/// - **greed** in `[0.15, 1.0)`: weights loot and exploration
/// - **caution** in `[0.20, 1.0)`: weights risk, threat and movement thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    /// Appetite for fighting.
    pub aggression: f64,
    /// Appetite for loot.
    pub greed: f64,
    /// Aversion to risk.
    pub caution: f64,
}

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// A totally-ordered score used to rank candidates (items, routes, targets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(pub OrderedFloat<f64>);

impl Score {
    /// Wrap a raw score.
    #[must_use]
    pub fn new(score: f64) -> Self {
        Self(OrderedFloat(score))
    }

    /// The raw score value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0.into_inner()
    }
}
