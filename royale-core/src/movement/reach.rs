//! Bounded breadth-first reachability over the area graph.

use std::collections::{BTreeSet, VecDeque};

use crate::types::{AreaId, Route};
use crate::world::{Actor, WorldSnapshot};

/// An area the actor could end the day in, with the route to get there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reachable {
    /// Destination.
    pub area: AreaId,
    /// Number of steps, equal to `route.len()`.
    pub steps: usize,
    /// Areas to walk through, destination last. The start area is not included.
    pub route: Route,
}

/// Steps the actor can walk today: 3 when fit, 1 otherwise.
#[must_use]
pub fn step_budget(actor: &Actor) -> usize {
    if actor.hp > 30.0 && actor.stamina > 20.0 { 3 } else { 1 }
}

/// Every area reachable from `start` within `budget` steps.
///
/// Neighbors are expanded in adjacency order, so the first (shortest) route
/// found to an area wins. Areas that cannot be entered on `day + 1` are
/// pruned and never expanded through; unknown ids are skipped.
#[must_use]
pub fn reachable(world: &WorldSnapshot, start: AreaId, budget: usize, day: u32) -> Vec<Reachable> {
    let mut seen = BTreeSet::from([start]);
    let mut queue: VecDeque<(AreaId, Route)> = VecDeque::from([(start, Route::new())]);
    let mut found = Vec::new();

    while let Some((here, route)) = queue.pop_front() {
        if route.len() >= budget {
            continue;
        }
        for &next in world.neighbors(here) {
            if !seen.insert(next) {
                continue;
            }
            let enterable = world.area(next).is_some_and(|a| a.is_enterable(day + 1));
            if !enterable {
                continue;
            }
            let mut extended = route.clone();
            extended.push(next);
            found.push(Reachable {
                area: next,
                steps: extended.len(),
                route: extended.clone(),
            });
            queue.push_back((next, extended));
        }
    }
    found
}
