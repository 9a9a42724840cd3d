//! Item catalog boundary.
//!
//! The engine never owns item definitions; it asks an [`ItemCatalog`] for
//! them. [`StaticCatalog`] is a plain in-memory implementation that hosts
//! and tests can load from TOML or JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoyaleError};

/// Broad item category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Deals damage when used in an attack.
    Weapon,
    /// Eaten or drunk for its effects.
    Consumable,
    /// Raised to soak incoming damage.
    Shield,
    /// Laid in an area to catch others.
    Trap,
    /// Anything else.
    #[default]
    Misc,
}

/// Restorative effects applied when an item is consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemEffects {
    /// Stamina restored per use.
    pub stamina: f64,
    /// Health restored per use.
    pub hp: f64,
}

/// Definition of one item as served by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDef {
    /// Item category.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Damage per unit; 0 for items that cannot hurt anyone.
    pub damage: f64,
    /// Whether units of this item share one inventory slot.
    pub stackable: bool,
    /// Consumption effects.
    pub effects: ItemEffects,
    /// Number of uses before the item is spent.
    pub uses: u32,
    /// Base desirability used when ranking loot.
    pub value: f64,
}

impl ItemDef {
    /// Whether the item can be used to deal damage.
    #[must_use]
    pub fn deals_damage(&self) -> bool {
        self.damage > 0.0
    }

    /// Whether consuming the item restores stamina.
    #[must_use]
    pub fn restores_stamina(&self) -> bool {
        self.effects.stamina > 0.0
    }
}

/// Lookup service for item definitions.
pub trait ItemCatalog {
    /// Definition for `id`, or `None` for unknown items.
    fn item_def(&self, id: &str) -> Option<&ItemDef>;
}

/// An in-memory catalog keyed by item id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticCatalog {
    items: BTreeMap<String, ItemDef>,
}

impl StaticCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a definition, builder style.
    #[must_use]
    pub fn with_item(mut self, id: impl Into<String>, def: ItemDef) -> Self {
        self.items.insert(id.into(), def);
        self
    }

    /// Load a catalog from a TOML table of item definitions.
    ///
    /// # Errors
    /// Returns `RoyaleError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| RoyaleError::Config(e.to_string()))
    }

    /// Load a catalog from a JSON object of item definitions.
    ///
    /// # Errors
    /// Returns `RoyaleError::Serialization` if the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl ItemCatalog for StaticCatalog {
    fn item_def(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }
}
