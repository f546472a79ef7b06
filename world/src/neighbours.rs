//! Static 8-directional neighbour graph shared by every propagation
//! algorithm.

use mirewarren_core::{CellId, Direction};

use crate::grid::GridIndex;

/// Flat adjacency table recording, per cell, the handle of each of the eight
/// directional neighbours that exist within the grid bounds.
///
/// Edges are purely geometric: occupancy never removes an edge. The
/// generation, distance-field, and hazard-spread algorithms all read this one
/// table and apply their own traversability predicates on top, which is what
/// lets them share a single build.
#[derive(Clone, Debug)]
pub struct NeighbourGraph {
    table: Vec<[Option<CellId>; 8]>,
}

impl NeighbourGraph {
    /// Builds the adjacency table for every cell of the provided grid.
    #[must_use]
    pub fn build(grid: &GridIndex) -> Self {
        let mut table = Vec::with_capacity(grid.cell_count());
        for (_, coord) in grid.iter() {
            let mut row = [None; 8];
            for direction in Direction::ALL {
                row[direction.index()] = coord
                    .neighbour_towards(direction)
                    .and_then(|neighbour| grid.cell_at(neighbour));
            }
            table.push(row);
        }
        Self { table }
    }

    /// Neighbour of `cell` in the provided direction, absent at grid edges.
    #[must_use]
    pub fn neighbour(&self, cell: CellId, direction: Direction) -> Option<CellId> {
        let index = usize::try_from(cell.get()).ok()?;
        self.table.get(index)?[direction.index()]
    }

    /// Iterates all present neighbours of `cell` in stable direction order.
    pub fn neighbours(&self, cell: CellId) -> impl Iterator<Item = (Direction, CellId)> + '_ {
        let row = usize::try_from(cell.get())
            .ok()
            .and_then(|index| self.table.get(index).copied())
            .unwrap_or([None; 8]);
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| row[direction.index()].map(|id| (direction, id)))
    }

    /// Number of cells the table was built for.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.table.len()
    }
}
