//! Probabilistic hazard regions that grow outward across obstacle cells.
//!
//! One generic engine serves both hazard kinds; the only variation between
//! sinkholes and corruption is data, captured in [`HazardProfile`]. Each
//! region owns a seeded RNG so that the same seed replays the same spread
//! pattern, which is what lets an external save system persist hazard seeds
//! as opaque integers.

use mirewarren_core::{CellId, Event, HazardKind, OccupancyKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

use crate::grid::GridIndex;
use crate::neighbours::NeighbourGraph;

/// Data-only description of one hazard kind's spread behaviour.
#[derive(Clone, Copy, Debug)]
pub struct HazardProfile {
    kind: HazardKind,
    spread_chance: f64,
    saturation_threshold: u8,
}

impl HazardProfile {
    /// Spread profile of the sinkhole hazard.
    #[must_use]
    pub const fn sinkhole() -> Self {
        Self {
            kind: HazardKind::Sinkhole,
            spread_chance: 0.125,
            saturation_threshold: 2,
        }
    }

    /// Spread profile of the corruption hazard.
    #[must_use]
    pub const fn corruption() -> Self {
        Self {
            kind: HazardKind::Corruption,
            spread_chance: 0.125,
            saturation_threshold: 2,
        }
    }

    /// Hazard kind the profile belongs to.
    #[must_use]
    pub const fn kind(&self) -> HazardKind {
        self.kind
    }

    /// Per-neighbour conversion odds evaluated during a spread step.
    #[must_use]
    pub const fn spread_chance(&self) -> f64 {
        self.spread_chance
    }

    /// Same-kind neighbour count at which an active cell saturates.
    #[must_use]
    pub const fn saturation_threshold(&self) -> u8 {
        self.saturation_threshold
    }

    #[cfg(test)]
    pub(crate) const fn with_spread_chance(mut self, spread_chance: f64) -> Self {
        self.spread_chance = spread_chance;
        self
    }
}

/// One hazard kind's region of cells plus its spread machinery.
#[derive(Clone, Debug)]
pub(crate) struct HazardRegion {
    profile: HazardProfile,
    rng: Option<ChaCha8Rng>,
    active: Vec<CellId>,
    saturated: Vec<CellId>,
}

impl HazardRegion {
    pub(crate) fn new(profile: HazardProfile) -> Self {
        Self {
            profile,
            rng: None,
            active: Vec::new(),
            saturated: Vec::new(),
        }
    }

    pub(crate) fn kind(&self) -> HazardKind {
        self.profile.kind()
    }

    pub(crate) fn is_seeded(&self) -> bool {
        self.rng.is_some()
    }

    /// Cells that may still contribute spread candidates, in creation order.
    pub(crate) fn active_cells(&self) -> &[CellId] {
        &self.active
    }

    /// Cells that saturated and stopped spreading, in saturation order.
    pub(crate) fn saturated_cells(&self) -> &[CellId] {
        &self.saturated
    }

    /// Forgets every cell and the RNG, e.g. when a new layout is applied.
    pub(crate) fn reset(&mut self) {
        self.rng = None;
        self.active.clear();
        self.saturated.clear();
    }

    /// Installs the seed cell and derives the spread RNG from the provided
    /// opaque seed. The caller has already validated the cell and stamped
    /// the occupancy map.
    pub(crate) fn seed(&mut self, cell: CellId, rng_seed: u64) {
        let stream_seed = derive_stream_seed(rng_seed, self.profile.kind().rng_stream());
        self.rng = Some(ChaCha8Rng::seed_from_u64(stream_seed));
        self.active.push(cell);
    }

    /// Runs one spread step: at most one obstacle neighbour of the active set
    /// converts into a new active hazard cell, then saturation is swept.
    ///
    /// The step scans a snapshot of the active set taken at entry, so a cell
    /// created during the step never spawns further growth within the same
    /// step. A step with no eligible neighbour is a silent no-op.
    pub(crate) fn step(
        &mut self,
        graph: &NeighbourGraph,
        grid: &GridIndex,
        occupancy: &mut [OccupancyKind],
        out_events: &mut Vec<Event>,
    ) {
        let Some(rng) = self.rng.as_mut() else {
            return;
        };

        let kind = self.profile.kind();
        let snapshot: Vec<CellId> = self.active.clone();
        'spread: for &cell in &snapshot {
            for (_, neighbour) in graph.neighbours(cell) {
                let Some(index) = grid.index_of(neighbour) else {
                    continue;
                };
                // Only plain obstacles are eligible: walls stay walls and a
                // cell owned by the rival kind is invisible to this one.
                if occupancy[index] != OccupancyKind::Obstacle {
                    continue;
                }
                if !rng.gen_bool(self.profile.spread_chance()) {
                    continue;
                }

                occupancy[index] = kind.occupancy();
                self.active.push(neighbour);
                if let (Some(from), Some(to)) = (grid.coord_of(cell), grid.coord_of(neighbour)) {
                    out_events.push(Event::HazardSpread { kind, from, to });
                }
                break 'spread;
            }
        }

        self.sweep_saturation(graph, grid, occupancy, out_events);
    }

    /// Moves every active cell with enough same-kind hazard neighbours into
    /// the saturated set. Saturation is monotone: a saturated cell never
    /// becomes active again, and a hazard cell is never reverted.
    fn sweep_saturation(
        &mut self,
        graph: &NeighbourGraph,
        grid: &GridIndex,
        occupancy: &[OccupancyKind],
        out_events: &mut Vec<Event>,
    ) {
        let kind = self.profile.kind();
        let threshold = usize::from(self.profile.saturation_threshold());
        let mut still_active = Vec::with_capacity(self.active.len());

        for cell in self.active.drain(..) {
            let same_kind_neighbours = graph
                .neighbours(cell)
                .filter_map(|(_, neighbour)| grid.index_of(neighbour))
                .filter(|&index| occupancy[index].hazard_kind() == Some(kind))
                .count();
            if same_kind_neighbours >= threshold {
                self.saturated.push(cell);
                if let Some(coord) = grid.coord_of(cell) {
                    out_events.push(Event::HazardSaturated { kind, cell: coord });
                }
            } else {
                still_active.push(cell);
            }
        }

        self.active = still_active;
    }

}

fn derive_stream_seed(base: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirewarren_core::CellCoord;

    fn hazard_world(columns: u32, rows: u32) -> (GridIndex, NeighbourGraph, Vec<OccupancyKind>) {
        let grid = GridIndex::new(columns, rows, 32.0);
        let graph = NeighbourGraph::build(&grid);
        let occupancy = vec![OccupancyKind::Obstacle; grid.cell_count()];
        (grid, graph, occupancy)
    }

    fn seeded_region(
        grid: &GridIndex,
        occupancy: &mut [OccupancyKind],
        profile: HazardProfile,
        coord: CellCoord,
        rng_seed: u64,
    ) -> HazardRegion {
        let mut region = HazardRegion::new(profile);
        let cell = grid.cell_at(coord).expect("seed cell");
        let index = grid.index_of(cell).expect("seed index");
        occupancy[index] = profile.kind().occupancy();
        region.seed(cell, rng_seed);
        region
    }

    #[test]
    fn unseeded_region_never_steps() {
        let (grid, graph, mut occupancy) = hazard_world(3, 3);
        let mut region = HazardRegion::new(HazardProfile::sinkhole());
        let mut events = Vec::new();

        region.step(&graph, &grid, &mut occupancy, &mut events);

        assert!(events.is_empty());
        assert!(occupancy
            .iter()
            .all(|&kind| kind == OccupancyKind::Obstacle));
    }

    #[test]
    fn forced_spread_converts_exactly_one_cell_per_step() {
        let (grid, graph, mut occupancy) = hazard_world(5, 5);
        let profile = HazardProfile::sinkhole().with_spread_chance(1.0);
        let mut region =
            seeded_region(&grid, &mut occupancy, profile, CellCoord::new(2, 2), 77);
        let mut events = Vec::new();

        region.step(&graph, &grid, &mut occupancy, &mut events);

        let sinkholes = occupancy
            .iter()
            .filter(|&&kind| kind == OccupancyKind::Sinkhole)
            .count();
        assert_eq!(sinkholes, 2, "seed plus exactly one conversion");
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, Event::HazardSpread { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn seed_saturates_exactly_at_the_second_active_neighbour() {
        let (grid, graph, mut occupancy) = hazard_world(5, 5);
        let profile = HazardProfile::sinkhole().with_spread_chance(1.0);
        let seed_coord = CellCoord::new(2, 2);
        let mut region = seeded_region(&grid, &mut occupancy, profile, seed_coord, 9);
        let seed_cell = grid.cell_at(seed_coord).expect("seed cell");

        // First step: one neighbour converts; the seed has a single same-kind
        // neighbour and must remain active.
        let mut events = Vec::new();
        region.step(&graph, &grid, &mut occupancy, &mut events);
        assert!(region.active_cells().contains(&seed_cell));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::HazardSaturated { cell, .. } if *cell == seed_coord)));

        // Second step: forced odds convert another neighbour of the seed
        // (the seed is scanned first), so the seed now has two same-kind
        // neighbours and must saturate in the same sweep.
        let mut events = Vec::new();
        region.step(&graph, &grid, &mut occupancy, &mut events);
        assert!(!region.active_cells().contains(&seed_cell));
        assert!(region.saturated_cells().contains(&seed_cell));
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::HazardSaturated { cell, .. } if *cell == seed_coord)));
    }

    #[test]
    fn saturated_cells_never_reactivate() {
        let (grid, graph, mut occupancy) = hazard_world(4, 4);
        let profile = HazardProfile::corruption().with_spread_chance(1.0);
        let seed_coord = CellCoord::new(1, 1);
        let mut region = seeded_region(&grid, &mut occupancy, profile, seed_coord, 4);
        let seed_cell = grid.cell_at(seed_coord).expect("seed cell");

        let mut events = Vec::new();
        for _ in 0..12 {
            region.step(&graph, &grid, &mut occupancy, &mut events);
        }

        assert!(region.saturated_cells().contains(&seed_cell));
        let saturated_snapshot: Vec<CellId> = region.saturated_cells().to_vec();
        region.step(&graph, &grid, &mut occupancy, &mut events);
        for cell in &saturated_snapshot {
            assert!(region.saturated_cells().contains(cell));
            assert!(!region.active_cells().contains(cell));
        }
    }

    #[test]
    fn spread_ignores_rival_hazard_and_open_cells() {
        let (grid, graph, mut occupancy) = hazard_world(3, 1);
        // Layout: corruption | sinkhole seed | open.
        let rival = grid.cell_at(CellCoord::new(0, 0)).expect("rival cell");
        let rival_index = grid.index_of(rival).expect("rival index");
        occupancy[rival_index] = OccupancyKind::Corruption;
        let open = grid.cell_at(CellCoord::new(2, 0)).expect("open cell");
        let open_index = grid.index_of(open).expect("open index");
        occupancy[open_index] = OccupancyKind::Open;

        let profile = HazardProfile::sinkhole().with_spread_chance(1.0);
        let mut region =
            seeded_region(&grid, &mut occupancy, profile, CellCoord::new(1, 0), 5);

        let mut events = Vec::new();
        region.step(&graph, &grid, &mut occupancy, &mut events);

        assert_eq!(occupancy[rival_index], OccupancyKind::Corruption);
        assert_eq!(occupancy[open_index], OccupancyKind::Open);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::HazardSpread { .. })));
    }

    #[test]
    fn same_seed_replays_the_same_spread_pattern() {
        let run = |seed: u64| {
            let (grid, graph, mut occupancy) = hazard_world(6, 6);
            let mut region = seeded_region(
                &grid,
                &mut occupancy,
                HazardProfile::sinkhole(),
                CellCoord::new(3, 3),
                seed,
            );
            let mut events = Vec::new();
            for _ in 0..40 {
                region.step(&graph, &grid, &mut occupancy, &mut events);
            }
            (occupancy, events)
        };

        assert_eq!(run(1234), run(1234));
        let (left, _) = run(1234);
        let (right, _) = run(4321);
        // Different seeds almost surely diverge over forty steps.
        assert_ne!(left, right);
    }
}
