#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Mirewarren engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sentinel distance recorded for cells the propagation wave never reached.
pub const UNREACHABLE: u32 = u32::MAX;

/// Stream label used to derive the layout generation RNG from a base seed.
pub const RNG_STREAM_LAYOUT: &str = "mirewarren/layout";
/// Stream label used to derive the sinkhole spread RNG from a base seed.
pub const RNG_STREAM_SINKHOLE: &str = "mirewarren/hazard/sinkhole";
/// Stream label used to derive the corruption spread RNG from a base seed.
pub const RNG_STREAM_CORRUPTION: &str = "mirewarren/hazard/corruption";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the world's cell grid using the provided dimensions.
    ConfigureGrid {
        /// Number of cell columns laid out in the grid.
        columns: u32,
        /// Number of cell rows laid out in the grid.
        rows: u32,
        /// Side length of each square cell measured in world units.
        cell_length: f32,
    },
    /// Requests that the generation system produce an obstacle layout.
    ///
    /// The world ignores this command; the generation system consumes it and
    /// answers with [`Event::LayoutReady`].
    GenerateLayout {
        /// Parameters controlling the cellular-automaton pass.
        config: GenerationConfig,
    },
    /// Commits a generated obstacle layout into the world's occupancy map.
    ApplyLayout {
        /// Layout produced by the generation system.
        layout: ObstacleLayout,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new actor appear at the provided cell.
    SpawnActor {
        /// Role the actor plays in the simulation.
        kind: ActorKind,
        /// Cell the actor should occupy after spawning.
        cell: CellCoord,
    },
    /// Requests that an actor advance a single step in the given direction.
    StepActor {
        /// Identifier of the actor attempting to move.
        actor: ActorId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests removal of a plain obstacle, e.g. after a bomb or digging.
    DestroyObstacle {
        /// Cell whose obstacle should be removed.
        cell: CellCoord,
    },
    /// Plants the first active cell of a hazard region.
    SeedHazard {
        /// Hazard kind being seeded.
        kind: HazardKind,
        /// Obstacle cell converted into the seed hazard cell.
        cell: CellCoord,
        /// Opaque seed for the region's spread RNG, supplied by the caller so
        /// that an external save system can replay it verbatim.
        rng_seed: u64,
    },
    /// Switches the diagonal corner-cutting policy used by pathfinding and
    /// actor movement.
    SetCornerCutPolicy {
        /// `true` permits diagonal steps between two blocked orthogonal
        /// cells; `false` requires at least one flanking cell to be open.
        allowed: bool,
    },
}

/// Events broadcast by the world (and the generation system) after
/// processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the cell grid was reconfigured.
    GridConfigured {
        /// Number of cell columns in the new grid.
        columns: u32,
        /// Number of cell rows in the new grid.
        rows: u32,
    },
    /// Announces a freshly generated obstacle layout awaiting application.
    LayoutReady {
        /// Layout produced by the cellular-automaton pass.
        layout: ObstacleLayout,
    },
    /// Confirms that an obstacle layout was committed to the occupancy map.
    LayoutApplied {
        /// Number of obstacle cells stamped into the grid.
        obstacle_count: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an actor was created.
    ActorSpawned {
        /// Identifier assigned to the new actor.
        actor: ActorId,
        /// Role the actor plays in the simulation.
        kind: ActorKind,
        /// Cell the actor occupies after spawning.
        cell: CellCoord,
    },
    /// Reports that an actor spawn request was rejected.
    ActorSpawnRejected {
        /// Role requested for the actor.
        kind: ActorKind,
        /// Cell provided in the spawn request.
        cell: CellCoord,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Confirms that an actor moved between two cells.
    ActorAdvanced {
        /// Identifier of the actor that advanced.
        actor: ActorId,
        /// Cell the actor occupied before moving.
        from: CellCoord,
        /// Cell the actor occupies after completing the move.
        to: CellCoord,
    },
    /// Reports that a step request was rejected.
    StepRejected {
        /// Identifier of the actor that attempted to move.
        actor: ActorId,
        /// Direction provided in the step request.
        direction: Direction,
        /// Specific reason the step failed.
        reason: StepError,
    },
    /// Confirms that a plain obstacle was removed from the grid.
    ObstacleDestroyed {
        /// Cell that became open.
        cell: CellCoord,
    },
    /// Confirms that a hazard region received its seed cell.
    HazardSeeded {
        /// Hazard kind that was seeded.
        kind: HazardKind,
        /// Cell converted into the first active hazard cell.
        cell: CellCoord,
    },
    /// Reports that a hazard seeding request was rejected.
    HazardSeedRejected {
        /// Hazard kind provided in the request.
        kind: HazardKind,
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the seeding failed.
        reason: HazardSeedError,
    },
    /// Confirms that a hazard region converted an obstacle cell.
    HazardSpread {
        /// Hazard kind that grew.
        kind: HazardKind,
        /// Active cell the spread originated from.
        from: CellCoord,
        /// Obstacle cell converted into a new active hazard cell.
        to: CellCoord,
    },
    /// Announces that an active hazard cell saturated and stopped spreading.
    HazardSaturated {
        /// Hazard kind that owns the cell.
        kind: HazardKind,
        /// Cell that can no longer contribute spread candidates.
        cell: CellCoord,
    },
    /// Announces that the distance field was recomputed from its sources.
    DistanceFieldRebuilt {
        /// Number of cells that received a finite distance.
        reachable: u32,
    },
    /// Confirms that the diagonal corner-cutting policy changed.
    CornerCutPolicyChanged {
        /// Policy in effect after processing the command.
        allowed: bool,
    },
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Coordinate of the adjacent cell in the provided direction, if it does
    /// not underflow the coordinate space. Grid bounds are the caller's
    /// concern.
    #[must_use]
    pub fn neighbour_towards(self, direction: Direction) -> Option<CellCoord> {
        let (column_delta, row_delta) = direction.offset();
        let column = checked_offset(self.column, column_delta)?;
        let row = checked_offset(self.row, row_delta)?;
        Some(CellCoord::new(column, row))
    }

    /// Computes the Chebyshev distance between two cell coordinates, the
    /// natural metric of an 8-connected grid.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }
}

fn checked_offset(value: u32, delta: i64) -> Option<u32> {
    let shifted = i64::from(value).checked_add(delta)?;
    u32::try_from(shifted).ok()
}

/// Opaque stable handle identifying one grid cell.
///
/// Handles are flat row-major indices allocated by the grid index; they stay
/// valid for the lifetime of a grid configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(u32);

impl CellId {
    /// Creates a new cell handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Role an actor plays in the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// The player character; distance-field propagation seeds from players.
    Player,
    /// A pursuing NPC that follows the distance field toward the player.
    Hunter,
}

/// The eight movement directions of the cell grid.
///
/// The declaration order doubles as the stable tie-break order used by the
/// pursuit logic and by neighbour iteration: orthogonals first, then
/// diagonals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing column indices.
    East,
    /// Diagonal movement toward decreasing row and column indices.
    NorthWest,
    /// Diagonal movement toward decreasing row and increasing column indices.
    NorthEast,
    /// Diagonal movement toward increasing row and decreasing column indices.
    SouthWest,
    /// Diagonal movement toward increasing row and column indices.
    SouthEast,
}

impl Direction {
    /// All directions in stable tie-break order.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// Column and row deltas applied by a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::NorthWest => (-1, -1),
            Direction::NorthEast => (1, -1),
            Direction::SouthWest => (-1, 1),
            Direction::SouthEast => (1, 1),
        }
    }

    /// The direction pointing back along this one.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
            Direction::NorthWest => Direction::SouthEast,
            Direction::NorthEast => Direction::SouthWest,
            Direction::SouthWest => Direction::NorthEast,
            Direction::SouthEast => Direction::NorthWest,
        }
    }

    /// Reports whether the direction moves along both axes at once.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::NorthWest
                | Direction::NorthEast
                | Direction::SouthWest
                | Direction::SouthEast
        )
    }

    /// The two orthogonal directions a diagonal step passes between, or
    /// `None` for orthogonal directions.
    #[must_use]
    pub const fn flanking(self) -> Option<(Direction, Direction)> {
        match self {
            Direction::NorthWest => Some((Direction::North, Direction::West)),
            Direction::NorthEast => Some((Direction::North, Direction::East)),
            Direction::SouthWest => Some((Direction::South, Direction::West)),
            Direction::SouthEast => Some((Direction::South, Direction::East)),
            _ => None,
        }
    }

    /// Zero-based position of the direction within [`Direction::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::West => 2,
            Direction::East => 3,
            Direction::NorthWest => 4,
            Direction::NorthEast => 5,
            Direction::SouthWest => 6,
            Direction::SouthEast => 7,
        }
    }
}

/// What currently occupies a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccupancyKind {
    /// Nothing occupies the cell; actors may move through it.
    Open,
    /// A destructible obstacle fills the cell.
    Obstacle,
    /// A sinkhole hazard owns the cell; the pit blocks movement.
    Sinkhole,
    /// A corruption hazard owns the cell; movement is permitted but the
    /// gameplay layer applies damage over time.
    Corruption,
    /// The cell is reserved by level furniture and never becomes anything
    /// else.
    Reserved,
}

impl OccupancyKind {
    /// Derived traversable flag: whether the occupancy kind permits an actor
    /// to move into the cell.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        matches!(self, OccupancyKind::Open | OccupancyKind::Corruption)
    }

    /// Hazard kind owning the cell, if any.
    #[must_use]
    pub const fn hazard_kind(self) -> Option<HazardKind> {
        match self {
            OccupancyKind::Sinkhole => Some(HazardKind::Sinkhole),
            OccupancyKind::Corruption => Some(HazardKind::Corruption),
            _ => None,
        }
    }
}

/// The two mutually exclusive hazard families that spread across the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    /// Collapsing ground that swallows anything entering the cell.
    Sinkhole,
    /// Creeping blight that damages actors standing on it.
    Corruption,
}

impl HazardKind {
    /// Occupancy kind stamped onto cells owned by this hazard.
    #[must_use]
    pub const fn occupancy(self) -> OccupancyKind {
        match self {
            HazardKind::Sinkhole => OccupancyKind::Sinkhole,
            HazardKind::Corruption => OccupancyKind::Corruption,
        }
    }

    /// The other hazard kind, which may never share a cell with this one.
    #[must_use]
    pub const fn rival(self) -> HazardKind {
        match self {
            HazardKind::Sinkhole => HazardKind::Corruption,
            HazardKind::Corruption => HazardKind::Sinkhole,
        }
    }

    /// RNG stream label used to derive this kind's spread RNG.
    #[must_use]
    pub const fn rng_stream(self) -> &'static str {
        match self {
            HazardKind::Sinkhole => RNG_STREAM_SINKHOLE,
            HazardKind::Corruption => RNG_STREAM_CORRUPTION,
        }
    }
}

/// Pure survive/born rule applied by the cellular-automaton generator.
///
/// The rule is data rather than behaviour: two bitmasks record, per possible
/// neighbour-obstacle count (0..=8), whether an existing obstacle survives and
/// whether a new obstacle is born.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AutomatonRule {
    survival_mask: u16,
    birth_mask: u16,
}

impl AutomatonRule {
    /// Builds a rule from explicit survive and born neighbour counts.
    /// Counts above eight are ignored.
    #[must_use]
    pub fn new(survival_counts: &[u8], birth_counts: &[u8]) -> Self {
        Self {
            survival_mask: mask_from_counts(survival_counts),
            birth_mask: mask_from_counts(birth_counts),
        }
    }

    /// Cave-smoothing rule used for level generation: obstacles survive with
    /// four or more obstacle neighbours and are born with five or more.
    #[must_use]
    pub fn cave() -> Self {
        Self::new(&[4, 5, 6, 7, 8], &[5, 6, 7, 8])
    }

    /// Conway's Game of Life rule; exercised by tests to pin down the
    /// double-buffered commit semantics.
    #[must_use]
    pub fn game_of_life() -> Self {
        Self::new(&[2, 3], &[3])
    }

    /// Applies the rule to one cell given its current obstacle flag and the
    /// number of obstacle-occupied neighbours.
    #[must_use]
    pub const fn next(&self, current_obstacle: bool, obstacle_neighbours: u8) -> bool {
        let mask = if current_obstacle {
            self.survival_mask
        } else {
            self.birth_mask
        };
        (mask >> (obstacle_neighbours & 0x0f)) & 1 == 1
    }
}

fn mask_from_counts(counts: &[u8]) -> u16 {
    let mut mask = 0u16;
    for &count in counts {
        if count <= 8 {
            mask |= 1 << count;
        }
    }
    mask
}

/// Parameters controlling one cellular-automaton generation run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    seed: u64,
    fill_probability: f32,
    iterations: u32,
    rule: AutomatonRule,
}

impl GenerationConfig {
    /// Creates a new generation configuration.
    ///
    /// `fill_probability` is clamped into `0.0..=1.0` so that a sloppy caller
    /// cannot derail the Bernoulli seeding pass.
    #[must_use]
    pub fn new(seed: u64, fill_probability: f32, iterations: u32, rule: AutomatonRule) -> Self {
        Self {
            seed,
            fill_probability: fill_probability.clamp(0.0, 1.0),
            iterations,
            rule,
        }
    }

    /// Opaque base seed for the layout RNG stream.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Probability that a cell starts as an obstacle before iteration.
    #[must_use]
    pub const fn fill_probability(&self) -> f32 {
        self.fill_probability
    }

    /// Number of automaton passes applied after seeding.
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Survive/born rule applied on every pass.
    #[must_use]
    pub const fn rule(&self) -> AutomatonRule {
        self.rule
    }
}

/// Final obstacle placement produced by the generation system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleLayout {
    columns: u32,
    rows: u32,
    obstacles: Vec<CellCoord>,
}

impl ObstacleLayout {
    /// Creates a layout for a grid of the provided dimensions.
    #[must_use]
    pub fn new(columns: u32, rows: u32, obstacles: Vec<CellCoord>) -> Self {
        Self {
            columns,
            rows,
            obstacles,
        }
    }

    /// Number of columns the layout was generated for.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows the layout was generated for.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cells that hold an obstacle after generation.
    #[must_use]
    pub fn obstacles(&self) -> &[CellCoord] {
        &self.obstacles
    }
}

/// Reasons an actor spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnError {
    /// The requested cell lies outside the configured grid.
    OutOfBounds,
    /// The requested cell is not traversable.
    Blocked,
}

/// Reasons a step request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepError {
    /// No actor with the provided identifier exists.
    MissingActor,
    /// The step would leave the configured grid.
    OutOfBounds,
    /// The destination cell is not traversable.
    Blocked,
    /// The diagonal step would cut between two blocked orthogonal cells and
    /// the strict corner policy is active.
    CornerCut,
}

/// Reasons a hazard seeding request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardSeedError {
    /// The requested cell lies outside the configured grid.
    OutOfBounds,
    /// The requested cell does not hold a plain obstacle.
    NotObstacle,
    /// The hazard kind already received its seed cell.
    AlreadySeeded,
}

/// Immutable representation of a single actor's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorSnapshot {
    /// Unique identifier assigned to the actor.
    pub id: ActorId,
    /// Role the actor plays in the simulation.
    pub kind: ActorKind,
    /// Grid cell currently occupied by the actor.
    pub cell: CellCoord,
}

/// Read-only snapshot describing all actors within the maze.
#[derive(Clone, Debug, Default)]
pub struct ActorView {
    snapshots: Vec<ActorSnapshot>,
}

impl ActorView {
    /// Creates a new actor view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ActorSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured actor snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ActorSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ActorSnapshot> {
        self.snapshots
    }
}

/// Read-only view into the dense occupancy map.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    kinds: &'a [OccupancyKind],
    columns: u32,
    rows: u32,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided kind slice.
    #[must_use]
    pub fn new(kinds: &'a [OccupancyKind], columns: u32, rows: u32) -> Self {
        Self {
            kinds,
            columns,
            rows,
        }
    }

    /// Occupancy kind recorded for the provided cell, if it lies within the
    /// grid.
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> Option<OccupancyKind> {
        self.index(cell)
            .and_then(|index| self.kinds.get(index))
            .copied()
    }

    /// Reports whether the cell exists and currently permits movement.
    #[must_use]
    pub fn is_traversable(&self, cell: CellCoord) -> bool {
        self.kind(cell).is_some_and(OccupancyKind::is_traversable)
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = OccupancyKind> + 'a {
        self.kinds.iter().copied()
    }

    /// Provides the dimensions of the underlying occupancy map.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Read-only view into the dense distance field.
#[derive(Clone, Copy, Debug)]
pub struct DistanceFieldView<'a> {
    distances: &'a [u32],
    columns: u32,
    rows: u32,
}

impl<'a> DistanceFieldView<'a> {
    /// Captures a new distance view backed by the provided slice.
    #[must_use]
    pub fn new(distances: &'a [u32], columns: u32, rows: u32) -> Self {
        Self {
            distances,
            columns,
            rows,
        }
    }

    /// Shortest grid distance from the source set to the provided cell.
    ///
    /// Returns `None` for out-of-range cells and for cells the last
    /// propagation pass never reached.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }

        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        match self.distances.get(row * width + column).copied() {
            Some(UNREACHABLE) | None => None,
            Some(distance) => Some(distance),
        }
    }

    /// Number of cells the last propagation pass reached.
    #[must_use]
    pub fn reachable_count(&self) -> u32 {
        let count = self
            .distances
            .iter()
            .filter(|&&distance| distance != UNREACHABLE)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Provides the dimensions of the underlying field.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }
}
