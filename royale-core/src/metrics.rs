//! Per-day counters and tracing span names.
//!
//! Every pass returns a [`DayMetrics`]. Counters are plain integers: a pass
//! is single-threaded and the metrics are owned by its outcome. Callers that
//! run many days fold them together with [`DayMetrics::merge`] and export the
//! result with [`DayMetrics::to_prometheus`].

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::intent::{ActionKind, Intent};

// ---------------------------------------------------------------------------
// Day Counters
// ---------------------------------------------------------------------------

/// What happened during one (or several merged) decision passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayMetrics {
    /// Passes folded into these counters.
    pub days: u64,
    /// Actors that took a turn.
    pub actors: u64,
    /// Emitted intents by type.
    pub intents: BTreeMap<ActionKind, u64>,
    /// Flee flags raised by the posture stage.
    pub flee_flags: u64,
    /// Collections produced by the staging rush.
    pub rush_collects: u64,
    /// Movements held back by the staging scramble.
    pub scramble_blocked: u64,
    /// Movements that skipped the threshold test.
    pub forced_moves: u64,
}

impl DayMetrics {
    /// Count one emitted intent.
    pub fn record_intent(&mut self, intent: &Intent) {
        *self.intents.entry(intent.action.kind()).or_insert(0) += 1;
    }

    /// Emitted intents of `kind`.
    #[must_use]
    pub fn count(&self, kind: ActionKind) -> u64 {
        self.intents.get(&kind).copied().unwrap_or(0)
    }

    /// Total emitted intents.
    #[must_use]
    pub fn total_intents(&self) -> u64 {
        self.intents.values().sum()
    }

    /// Fold another pass into this one.
    pub fn merge(&mut self, other: &Self) {
        self.days += other.days;
        self.actors += other.actors;
        for (kind, n) in &other.intents {
            *self.intents.entry(*kind).or_insert(0) += n;
        }
        self.flee_flags += other.flee_flags;
        self.rush_collects += other.rush_collects;
        self.scramble_blocked += other.scramble_blocked;
        self.forced_moves += other.forced_moves;
    }

    /// Format as Prometheus-compatible text.
    #[must_use]
    pub fn to_prometheus(&self) -> String {
        let mut out = format!(
            "# HELP royale_days_total Decision passes completed\n\
             # TYPE royale_days_total counter\n\
             royale_days_total {}\n\
             # HELP royale_actor_turns_total Actor turns processed\n\
             # TYPE royale_actor_turns_total counter\n\
             royale_actor_turns_total {}\n\
             # HELP royale_flee_flags_total Flee flags raised\n\
             # TYPE royale_flee_flags_total counter\n\
             royale_flee_flags_total {}\n\
             # HELP royale_rush_collects_total Staging rush collections\n\
             # TYPE royale_rush_collects_total counter\n\
             royale_rush_collects_total {}\n\
             # HELP royale_scramble_blocked_total Movements held by the staging scramble\n\
             # TYPE royale_scramble_blocked_total counter\n\
             royale_scramble_blocked_total {}\n\
             # HELP royale_forced_moves_total Movements that bypassed the threshold\n\
             # TYPE royale_forced_moves_total counter\n\
             royale_forced_moves_total {}\n\
             # HELP royale_intents_total Emitted intents by type\n\
             # TYPE royale_intents_total counter\n",
            self.days,
            self.actors,
            self.flee_flags,
            self.rush_collects,
            self.scramble_blocked,
            self.forced_moves,
        );
        for kind in ActionKind::ALL {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "royale_intents_total{{type=\"{kind}\"}} {}", self.count(kind));
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tracing Span Names
// ---------------------------------------------------------------------------

/// Span names used with `tracing` spans.
pub mod spans {
    /// One full decision pass.
    pub const DAY: &str = "royale::day";
    /// One actor's turn within a pass.
    pub const ACTOR: &str = "royale::actor";
    /// Replay verification.
    pub const REPLAY: &str = "royale::replay";
}
