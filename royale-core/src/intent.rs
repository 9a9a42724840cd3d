//! Intents: the engine's only output.
//!
//! Each living actor contributes one posture intent and one movement intent
//! per day. Payloads are a tagged union so an intent cannot exist without
//! the fields its type requires; the fallible constructors reject payloads
//! that are well-typed but meaningless (an empty route, a self-attack).
//!
//! Serialized form: `{ "source": "npc_1", "type": "MOVE", "route": [3, 4] }`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoyaleError};
use crate::types::{ActorId, Route};

/// What an actor intends to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Attack a co-located actor.
    Attack {
        /// Who to hit.
        #[serde(rename = "targetId")]
        target_id: ActorId,
    },
    /// Brace against attacks.
    Defend,
    /// Idle.
    Nothing {
        /// Diagnostic only.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Drink from the area's water.
    Drink,
    /// Pick up a ground item.
    Collect {
        /// Index into the current area's ground item list.
        #[serde(rename = "itemIndex")]
        item_index: usize,
    },
    /// Walk a route, nearest area first.
    Move {
        /// Areas to traverse; the last one is the destination.
        route: Route,
    },
    /// Remain in the current area.
    Stay {
        /// Diagnostic only.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Lay a trap. Reserved: no decision rule produces it yet.
    SetTrap,
}

/// Payload-free discriminant of [`Action`], used for counting and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionKind {
    /// [`Action::Attack`].
    Attack,
    /// [`Action::Defend`].
    Defend,
    /// [`Action::Nothing`].
    Nothing,
    /// [`Action::Drink`].
    Drink,
    /// [`Action::Collect`].
    Collect,
    /// [`Action::Move`].
    Move,
    /// [`Action::Stay`].
    Stay,
    /// [`Action::SetTrap`].
    SetTrap,
}

impl ActionKind {
    /// Every kind, in wire order.
    pub const ALL: [Self; 8] = [
        Self::Attack,
        Self::Defend,
        Self::Nothing,
        Self::Drink,
        Self::Collect,
        Self::Move,
        Self::Stay,
        Self::SetTrap,
    ];

    /// Wire name, e.g. `"SET_TRAP"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attack => "ATTACK",
            Self::Defend => "DEFEND",
            Self::Nothing => "NOTHING",
            Self::Drink => "DRINK",
            Self::Collect => "COLLECT",
            Self::Move => "MOVE",
            Self::Stay => "STAY",
            Self::SetTrap => "SET_TRAP",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Action {
    /// The payload-free kind.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Attack { .. } => ActionKind::Attack,
            Self::Defend => ActionKind::Defend,
            Self::Nothing { .. } => ActionKind::Nothing,
            Self::Drink => ActionKind::Drink,
            Self::Collect { .. } => ActionKind::Collect,
            Self::Move { .. } => ActionKind::Move,
            Self::Stay { .. } => ActionKind::Stay,
            Self::SetTrap => ActionKind::SetTrap,
        }
    }

    /// Whether this belongs to the movement phase.
    #[must_use]
    pub fn is_movement(&self) -> bool {
        matches!(self, Self::Move { .. } | Self::Stay { .. })
    }

    /// Idle with a diagnostic reason.
    #[must_use]
    pub fn nothing(reason: impl Into<String>) -> Self {
        Self::Nothing {
            reason: Some(reason.into()),
        }
    }

    /// Stay with a diagnostic reason.
    #[must_use]
    pub fn stay(reason: impl Into<String>) -> Self {
        Self::Stay {
            reason: Some(reason.into()),
        }
    }
}

/// One actor's intent for the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// The acting actor.
    pub source: ActorId,
    /// What it does.
    #[serde(flatten)]
    pub action: Action,
}

impl Intent {
    /// Wrap an already-validated action.
    #[must_use]
    pub fn new(source: ActorId, action: Action) -> Self {
        Self { source, action }
    }

    /// An attack on `target`.
    ///
    /// # Errors
    /// Returns `RoyaleError::InvalidIntent` if an actor targets itself.
    pub fn attack(source: ActorId, target: ActorId) -> Result<Self> {
        if source == target {
            return Err(RoyaleError::InvalidIntent {
                reason: format!("{source} cannot attack itself"),
            });
        }
        Ok(Self::new(source, Action::Attack { target_id: target }))
    }

    /// A walk along `route`.
    ///
    /// # Errors
    /// Returns `RoyaleError::InvalidIntent` if the route is empty.
    pub fn move_along(source: ActorId, route: Route) -> Result<Self> {
        if route.is_empty() {
            return Err(RoyaleError::InvalidIntent {
                reason: format!("{source} was given an empty route"),
            });
        }
        Ok(Self::new(source, Action::Move { route }))
    }

    /// Pick up the ground item at `item_index`.
    #[must_use]
    pub fn collect(source: ActorId, item_index: usize) -> Self {
        Self::new(source, Action::Collect { item_index })
    }
}
