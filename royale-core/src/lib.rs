//! # Royale Core Library
//!
//! Seeded, once-per-day decision engine for the non-player combatants of a
//! battle-royale survival game.
//!
//! Every living NPC gets one pass per in-game day:
//!
//! - **Perception**: a bounded, partially-known view of its surroundings
//! - **Posture**: one non-movement action (attack, defend, drink, collect, nothing)
//! - **Movement**: a bounded route search, area scoring and a softmax pick
//!
//! The pass emits a flat, ordered list of [`Intent`]s. Applying them is the
//! job of an external turn executor; this crate only writes to each actor's
//! own [`ActorMemory`].
//!
//! ## Determinism Contract
//!
//! All randomness is drawn from [`oracle::hash`], a pure function of
//! `(seed, day, salt)`. Identical snapshots, seeds and days always produce
//! identical intents and identical memory mutations.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod intent;
pub mod memory;
pub mod metrics;
pub mod movement;
pub mod oracle;
pub mod perception;
pub mod personality;
pub mod posture;
pub mod replay;
pub mod scoring;
pub mod types;
pub mod world;

pub use catalog::{ItemCatalog, ItemDef, StaticCatalog};
pub use config::RoyaleConfig;
pub use engine::{DayOutcome, DecisionEngine};
pub use error::RoyaleError;
pub use intent::{Action, Intent};
pub use memory::ActorMemory;
pub use types::*;
pub use world::{Actor, Area, WorldSnapshot};
