//! Shared scoring helpers used by both decision phases.

use crate::catalog::ItemCatalog;
use crate::world::{Actor, Inventory, ItemStack};

/// hp% at or above which an actor counts as healthy.
pub const HEALTHY_HP_PCT: f64 = 70.0;

/// hp% below which an actor counts as badly wounded.
pub const WOUNDED_HP_PCT: f64 = 30.0;

/// Weapon damage at or above which a weapon counts as heavy.
pub const HEAVY_WEAPON_DAMAGE: f64 = 30.0;

/// Clamp into `[0, 1]`.
#[must_use]
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Damage of the strongest carried weapon; a stackable weapon counts its
/// whole stack. 0 when nothing carried can deal damage.
#[must_use]
pub fn best_weapon_damage(inventory: &Inventory, catalog: &dyn ItemCatalog) -> f64 {
    inventory
        .items
        .iter()
        .filter_map(|stack| {
            let def = catalog.item_def(&stack.id)?;
            if !def.deals_damage() {
                return None;
            }
            let units = if def.stackable { f64::from(stack.qty) } else { 1.0 };
            Some(def.damage * units)
        })
        .fold(0.0, f64::max)
}

/// Whether anything carried can deal damage.
#[must_use]
pub fn is_armed(inventory: &Inventory, catalog: &dyn ItemCatalog) -> bool {
    inventory
        .items
        .iter()
        .any(|stack| catalog.item_def(&stack.id).is_some_and(|d| d.deals_damage()))
}

/// Base value of a stack; unknown items are worthless.
#[must_use]
pub fn item_value(stack: &ItemStack, catalog: &dyn ItemCatalog) -> f64 {
    catalog.item_def(&stack.id).map_or(0.0, |d| d.value)
}

/// Stamina restored by a stack; 0 for non-restoratives.
#[must_use]
pub fn stamina_restore(stack: &ItemStack, catalog: &dyn ItemCatalog) -> f64 {
    catalog
        .item_def(&stack.id)
        .filter(|d| d.restores_stamina())
        .map_or(0.0, |d| d.effects.stamina)
}

/// Index of the largest value, the earliest one on ties.
#[must_use]
pub fn first_argmax(values: impl IntoIterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.into_iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// The parts of an actor's state that most scoring terms care about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Condition {
    /// Raw health.
    pub hp: f64,
    /// Health as a percentage.
    pub hp_pct: f64,
    /// Raw stamina.
    pub stamina: f64,
    /// Carries something that deals damage.
    pub armed: bool,
    /// Strongest carried weapon damage, 0 if unarmed.
    pub best_damage: f64,
}

impl Condition {
    /// Summarize `actor` using `catalog` for its weapons.
    #[must_use]
    pub fn of(actor: &Actor, catalog: &dyn ItemCatalog) -> Self {
        Self {
            hp: actor.hp,
            hp_pct: actor.hp_pct(),
            stamina: actor.stamina,
            armed: is_armed(&actor.inventory, catalog),
            best_damage: best_weapon_damage(&actor.inventory, catalog),
        }
    }

    /// hp% ≥ 70.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.hp_pct >= HEALTHY_HP_PCT
    }

    /// hp% < 30.
    #[must_use]
    pub fn is_wounded(&self) -> bool {
        self.hp_pct < WOUNDED_HP_PCT
    }

    /// Carries a weapon with damage ≥ 30.
    #[must_use]
    pub fn has_heavy_weapon(&self) -> bool {
        self.best_damage >= HEAVY_WEAPON_DAMAGE
    }
}
