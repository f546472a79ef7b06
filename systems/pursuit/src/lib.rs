#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic pursuit system driving hunters down the distance field.

use mirewarren_core::{
    ActorKind, ActorView, CellCoord, Command, Direction, DistanceFieldView, Event, OccupancyView,
};

/// Pure system that reacts to clock events and proposes hunter steps.
///
/// Each hunter greedily descends the distance field: on every `TimeAdvanced`
/// event it proposes a step to the strictly closest traversable neighbour, or
/// holds position when no neighbour improves on its current distance. The
/// world remains the sole authority; a proposed step can still be rejected
/// there if the map changed since the field was last rebuilt.
#[derive(Debug, Default)]
pub struct Pursuit;

impl Pursuit {
    /// Consumes world events and immutable views to emit step commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        actor_view: &ActorView,
        occupancy_view: OccupancyView<'_>,
        distance_view: DistanceFieldView<'_>,
        corner_cut_allowed: bool,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for snapshot in actor_view.iter() {
            if snapshot.kind != ActorKind::Hunter {
                continue;
            }
            // Hunters cut off from every source hold position until the next
            // rebuild reconnects them.
            let Some(current) = distance_view.distance(snapshot.cell) else {
                continue;
            };
            if let Some(direction) =
                descend(snapshot.cell, current, occupancy_view, distance_view, corner_cut_allowed)
            {
                out.push(Command::StepActor {
                    actor: snapshot.id,
                    direction,
                });
            }
        }
    }
}

/// Picks the strictly improving neighbour with the lowest distance.
///
/// Ties resolve in the fixed direction order, which keeps replays stable
/// regardless of how the field was built.
fn descend(
    cell: CellCoord,
    current: u32,
    occupancy_view: OccupancyView<'_>,
    distance_view: DistanceFieldView<'_>,
    corner_cut_allowed: bool,
) -> Option<Direction> {
    let mut best: Option<(u32, Direction)> = None;
    for direction in Direction::ALL {
        let Some(target) = cell.neighbour_towards(direction) else {
            continue;
        };
        if !occupancy_view.is_traversable(target) {
            continue;
        }
        if direction.is_diagonal() && !corner_cut_allowed && is_corner_cut(cell, direction, occupancy_view)
        {
            continue;
        }
        let Some(candidate) = distance_view.distance(target) else {
            continue;
        };
        if candidate >= current {
            continue;
        }
        if best.map_or(true, |(best_distance, _)| candidate < best_distance) {
            best = Some((candidate, direction));
        }
    }
    best.map(|(_, direction)| direction)
}

fn is_corner_cut(cell: CellCoord, direction: Direction, occupancy_view: OccupancyView<'_>) -> bool {
    let Some((first, second)) = direction.flanking() else {
        return false;
    };
    let flank_open = |flank: Direction| {
        cell.neighbour_towards(flank)
            .is_some_and(|neighbour| occupancy_view.is_traversable(neighbour))
    };
    !flank_open(first) && !flank_open(second)
}
