#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Mirewarren.
//!
//! The world owns the grid index, the static neighbour graph, the mutable
//! occupancy map, the actors, the two hazard regions, and the distance field.
//! Adapters mutate it exclusively through [`apply`]; systems observe it
//! exclusively through [`query`]. Every mutation is deterministic: identical
//! command sequences produce identical event streams.

use std::time::Duration;

use mirewarren_core::{
    ActorId, ActorKind, CellCoord, CellId, Command, Event, HazardKind, HazardSeedError,
    OccupancyKind, SpawnError, StepError,
};

mod distance;
mod grid;
mod hazards;
mod neighbours;

pub use grid::GridIndex;
pub use hazards::HazardProfile;
pub use neighbours::NeighbourGraph;

use distance::{is_corner_cut, DistanceField, PropagationPolicy};
use hazards::HazardRegion;

const DEFAULT_GRID_COLUMNS: u32 = 24;
const DEFAULT_GRID_ROWS: u32 = 16;
const DEFAULT_CELL_LENGTH: f32 = 32.0;

/// Fixed simulated-time cadence between distance-field rebuilds.
///
/// The field is recomputed on this schedule rather than every frame; pursuit
/// reads a value that is at most one interval stale, which the original
/// gameplay tolerates by design.
pub const DISTANCE_REBUILD_INTERVAL: Duration = Duration::from_millis(500);

/// Fixed simulated-time cadence between hazard spread steps.
pub const HAZARD_SPREAD_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug)]
struct Actor {
    id: ActorId,
    kind: ActorKind,
    cell: CellCoord,
}

/// Represents the authoritative Mirewarren world state.
#[derive(Debug)]
pub struct World {
    grid: GridIndex,
    graph: NeighbourGraph,
    occupancy: Vec<OccupancyKind>,
    actors: Vec<Actor>,
    next_actor: u32,
    sinkhole: HazardRegion,
    corruption: HazardRegion,
    distance: DistanceField,
    policy: PropagationPolicy,
    hazard_accumulator: Duration,
    distance_accumulator: Duration,
}

impl World {
    /// Creates a new Mirewarren world with the default empty grid.
    #[must_use]
    pub fn new() -> Self {
        let grid = GridIndex::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, DEFAULT_CELL_LENGTH);
        let graph = NeighbourGraph::build(&grid);
        let occupancy = vec![OccupancyKind::Open; grid.cell_count()];
        Self {
            grid,
            graph,
            occupancy,
            actors: Vec::new(),
            next_actor: 0,
            sinkhole: HazardRegion::new(HazardProfile::sinkhole()),
            corruption: HazardRegion::new(HazardProfile::corruption()),
            distance: DistanceField::default(),
            policy: PropagationPolicy::default(),
            hazard_accumulator: Duration::ZERO,
            distance_accumulator: Duration::ZERO,
        }
    }

    fn reset_mutable_state(&mut self) {
        self.occupancy = vec![OccupancyKind::Open; self.grid.cell_count()];
        self.actors.clear();
        self.next_actor = 0;
        self.sinkhole.reset();
        self.corruption.reset();
        self.distance.clear();
        self.hazard_accumulator = Duration::ZERO;
        self.distance_accumulator = Duration::ZERO;
    }

    fn cell_is_traversable(&self, cell: CellId) -> bool {
        self.grid
            .index_of(cell)
            .and_then(|index| self.occupancy.get(index))
            .is_some_and(|kind| kind.is_traversable())
    }

    fn rebuild_distance_field(&mut self, out_events: &mut Vec<Event>) {
        let sources: Vec<CellId> = self
            .actors
            .iter()
            .filter(|actor| actor.kind == ActorKind::Player)
            .filter_map(|actor| self.grid.cell_at(actor.cell))
            .collect();

        let grid = &self.grid;
        let occupancy = &self.occupancy;
        self.distance
            .rebuild_with(&self.graph, &sources, self.policy, |cell| {
                grid.index_of(cell)
                    .and_then(|index| occupancy.get(index))
                    .is_some_and(|kind| kind.is_traversable())
            });

        let reachable = self
            .distance
            .distances()
            .iter()
            .filter(|&&value| value != mirewarren_core::UNREACHABLE)
            .count();
        out_events.push(Event::DistanceFieldRebuilt {
            reachable: u32::try_from(reachable).unwrap_or(u32::MAX),
        });
    }

    fn hazard_region_mut(&mut self, kind: HazardKind) -> &mut HazardRegion {
        match kind {
            HazardKind::Sinkhole => &mut self.sinkhole,
            HazardKind::Corruption => &mut self.corruption,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            columns,
            rows,
            cell_length,
        } => {
            world.grid = GridIndex::new(columns, rows, cell_length);
            world.graph = NeighbourGraph::build(&world.grid);
            world.reset_mutable_state();
            out_events.push(Event::GridConfigured { columns, rows });
        }
        // Owned by the generation system; the world treats it as a no-op so
        // adapters can funnel one command batch through both consumers.
        Command::GenerateLayout { .. } => {}
        Command::ApplyLayout { layout } => {
            world.reset_mutable_state();
            let mut obstacle_count: u32 = 0;
            for coord in layout.obstacles() {
                // Out-of-range entries are tolerated and skipped; the grid
                // edge is a normal case, not an error.
                let Some(cell) = world.grid.cell_at(*coord) else {
                    continue;
                };
                if let Some(index) = world.grid.index_of(cell) {
                    world.occupancy[index] = OccupancyKind::Obstacle;
                    obstacle_count = obstacle_count.saturating_add(1);
                }
            }
            out_events.push(Event::LayoutApplied { obstacle_count });
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });

            world.hazard_accumulator = world.hazard_accumulator.saturating_add(dt);
            world.distance_accumulator = world.distance_accumulator.saturating_add(dt);

            // Hazards first, distance second: the rebuilt field must see any
            // obstacle cells the regions converted this tick.
            while world.hazard_accumulator >= HAZARD_SPREAD_INTERVAL {
                world.hazard_accumulator -= HAZARD_SPREAD_INTERVAL;
                world
                    .sinkhole
                    .step(&world.graph, &world.grid, &mut world.occupancy, out_events);
                world
                    .corruption
                    .step(&world.graph, &world.grid, &mut world.occupancy, out_events);
            }

            let mut rebuild_due = false;
            while world.distance_accumulator >= DISTANCE_REBUILD_INTERVAL {
                world.distance_accumulator -= DISTANCE_REBUILD_INTERVAL;
                rebuild_due = true;
            }
            if rebuild_due {
                world.rebuild_distance_field(out_events);
            }
        }
        Command::SpawnActor { kind, cell } => match world.grid.cell_at(cell) {
            None => out_events.push(Event::ActorSpawnRejected {
                kind,
                cell,
                reason: SpawnError::OutOfBounds,
            }),
            Some(id) => {
                if !world.cell_is_traversable(id) {
                    out_events.push(Event::ActorSpawnRejected {
                        kind,
                        cell,
                        reason: SpawnError::Blocked,
                    });
                } else {
                    let actor = ActorId::new(world.next_actor);
                    world.next_actor = world.next_actor.saturating_add(1);
                    world.actors.push(Actor {
                        id: actor,
                        kind,
                        cell,
                    });
                    out_events.push(Event::ActorSpawned { actor, kind, cell });
                }
            }
        },
        Command::StepActor { actor, direction } => {
            let Some(actor_index) = world.actors.iter().position(|entry| entry.id == actor)
            else {
                out_events.push(Event::StepRejected {
                    actor,
                    direction,
                    reason: StepError::MissingActor,
                });
                return;
            };

            let from = world.actors[actor_index].cell;
            let from_id = world.grid.cell_at(from);
            let target = from_id.and_then(|id| world.graph.neighbour(id, direction));
            match (from_id, target) {
                (Some(from_id), Some(target)) => {
                    if !world.cell_is_traversable(target) {
                        out_events.push(Event::StepRejected {
                            actor,
                            direction,
                            reason: StepError::Blocked,
                        });
                    } else if direction.is_diagonal()
                        && !world.policy.allow_diagonal_corner_cut
                        && is_corner_cut(&world.graph, from_id, direction, &mut |cell| {
                            world.cell_is_traversable(cell)
                        })
                    {
                        out_events.push(Event::StepRejected {
                            actor,
                            direction,
                            reason: StepError::CornerCut,
                        });
                    } else if let Some(to) = world.grid.coord_of(target) {
                        world.actors[actor_index].cell = to;
                        out_events.push(Event::ActorAdvanced { actor, from, to });
                    }
                }
                _ => out_events.push(Event::StepRejected {
                    actor,
                    direction,
                    reason: StepError::OutOfBounds,
                }),
            }
        }
        Command::DestroyObstacle { cell } => {
            let index = world
                .grid
                .cell_at(cell)
                .and_then(|id| world.grid.index_of(id));
            if let Some(index) = index {
                // Only plain obstacles are destructible; hazard cells belong
                // to their spread engine and walls stay walls.
                if world.occupancy[index] == OccupancyKind::Obstacle {
                    world.occupancy[index] = OccupancyKind::Open;
                    out_events.push(Event::ObstacleDestroyed { cell });
                }
            }
        }
        Command::SeedHazard {
            kind,
            cell,
            rng_seed,
        } => match world.grid.cell_at(cell) {
            None => out_events.push(Event::HazardSeedRejected {
                kind,
                cell,
                reason: HazardSeedError::OutOfBounds,
            }),
            Some(id) => {
                if world.hazard_region_mut(kind).is_seeded() {
                    out_events.push(Event::HazardSeedRejected {
                        kind,
                        cell,
                        reason: HazardSeedError::AlreadySeeded,
                    });
                } else {
                    let index = world.grid.index_of(id);
                    match index {
                        Some(index) if world.occupancy[index] == OccupancyKind::Obstacle => {
                            world.occupancy[index] = kind.occupancy();
                            world.hazard_region_mut(kind).seed(id, rng_seed);
                            out_events.push(Event::HazardSeeded { kind, cell });
                        }
                        _ => out_events.push(Event::HazardSeedRejected {
                            kind,
                            cell,
                            reason: HazardSeedError::NotObstacle,
                        }),
                    }
                }
            }
        },
        Command::SetCornerCutPolicy { allowed } => {
            world.policy.allow_diagonal_corner_cut = allowed;
            out_events.push(Event::CornerCutPolicyChanged { allowed });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{DistanceField, GridIndex, NeighbourGraph, World};
    use mirewarren_core::{
        ActorSnapshot, ActorView, CellCoord, DistanceFieldView, HazardKind, OccupancyView,
        UNREACHABLE,
    };

    /// Provides read-only access to the world's grid index.
    #[must_use]
    pub fn grid(world: &World) -> &GridIndex {
        &world.grid
    }

    /// Provides read-only access to the static neighbour graph.
    #[must_use]
    pub fn neighbour_graph(world: &World) -> &NeighbourGraph {
        &world.graph
    }

    /// Exposes a read-only view of the dense occupancy map.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        OccupancyView::new(
            &world.occupancy,
            world.grid.columns(),
            world.grid.rows(),
        )
    }

    /// Exposes a read-only view of the last computed distance field.
    ///
    /// Before the first scheduled rebuild the view is empty and reports every
    /// cell as unreachable.
    #[must_use]
    pub fn distance_field_view(world: &World) -> DistanceFieldView<'_> {
        DistanceFieldView::new(
            world.distance.distances(),
            world.grid.columns(),
            world.grid.rows(),
        )
    }

    /// Captures a read-only view of the actors inhabiting the maze.
    #[must_use]
    pub fn actor_view(world: &World) -> ActorView {
        ActorView::from_snapshots(
            world
                .actors
                .iter()
                .map(|actor| ActorSnapshot {
                    id: actor.id,
                    kind: actor.kind,
                    cell: actor.cell,
                })
                .collect(),
        )
    }

    /// Reports whether diagonal corner cutting is currently permitted.
    #[must_use]
    pub fn corner_cut_allowed(world: &World) -> bool {
        world.policy.allow_diagonal_corner_cut
    }

    /// Read-only snapshot of one hazard region.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct HazardView {
        /// Hazard kind the snapshot describes.
        pub kind: HazardKind,
        /// Cells that may still spread, in creation order.
        pub active: Vec<CellCoord>,
        /// Cells that saturated and stopped spreading.
        pub saturated: Vec<CellCoord>,
    }

    /// Captures a read-only snapshot of the requested hazard region.
    #[must_use]
    pub fn hazard_view(world: &World, kind: HazardKind) -> HazardView {
        let region = match kind {
            HazardKind::Sinkhole => &world.sinkhole,
            HazardKind::Corruption => &world.corruption,
        };
        let coords = |cells: &[mirewarren_core::CellId]| {
            cells
                .iter()
                .filter_map(|cell| world.grid.coord_of(*cell))
                .collect()
        };
        HazardView {
            kind: region.kind(),
            active: coords(region.active_cells()),
            saturated: coords(region.saturated_cells()),
        }
    }

    /// Counts the cells reachable from the provided coordinate under the
    /// current occupancy and corner policy.
    ///
    /// This is the post-generation reachability probe: level orchestration
    /// runs it before gameplay starts and regenerates if the layout stranded
    /// the start cell.
    #[must_use]
    pub fn reachable_cell_count(world: &World, cell: CellCoord) -> u32 {
        let Some(source) = world.grid.cell_at(cell) else {
            return 0;
        };
        let mut field = DistanceField::default();
        field.rebuild_with(&world.graph, &[source], world.policy, |candidate| {
            world.cell_is_traversable(candidate)
        });
        let reachable = field
            .distances()
            .iter()
            .filter(|&&value| value != UNREACHABLE)
            .count();
        u32::try_from(reachable).unwrap_or(u32::MAX)
    }
}
