//! Grid index mapping 2D coordinates to stable cell handles and back.

use mirewarren_core::{CellCoord, CellId};

/// Fixed cell grid owning the world dimensions and cell side length.
///
/// Handles are flat row-major indices, so the mapping between coordinates and
/// handles is pure arithmetic. Out-of-range lookups answer `None`; grid edges
/// are a normal, frequent case for every downstream algorithm.
#[derive(Clone, Debug)]
pub struct GridIndex {
    columns: u32,
    rows: u32,
    cell_length: f32,
}

impl GridIndex {
    /// Creates a grid index for the provided dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, cell_length: f32) -> Self {
        Self {
            columns,
            rows,
            cell_length,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square cell expressed in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Total number of cells addressed by the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(0)
    }

    /// Handle of the cell at the provided coordinate, if it lies within the
    /// grid.
    #[must_use]
    pub fn cell_at(&self, coord: CellCoord) -> Option<CellId> {
        if coord.column() < self.columns && coord.row() < self.rows {
            let id = coord.row().checked_mul(self.columns)?.checked_add(coord.column())?;
            Some(CellId::new(id))
        } else {
            None
        }
    }

    /// Coordinate of the cell identified by the provided handle, if the
    /// handle belongs to this grid.
    #[must_use]
    pub fn coord_of(&self, cell: CellId) -> Option<CellCoord> {
        if self.columns == 0 {
            return None;
        }
        let id = cell.get();
        let row = id / self.columns;
        let column = id % self.columns;
        if row < self.rows {
            Some(CellCoord::new(column, row))
        } else {
            None
        }
    }

    /// Flat index backing the provided handle, if it belongs to this grid.
    #[must_use]
    pub(crate) fn index_of(&self, cell: CellId) -> Option<usize> {
        if self.coord_of(cell).is_some() {
            usize::try_from(cell.get()).ok()
        } else {
            None
        }
    }

    /// Iterates every cell of the grid in row-major handle order.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, CellCoord)> + '_ {
        let columns = self.columns;
        let count = u32::try_from(self.cell_count()).unwrap_or(0);
        (0..count).map(move |id| {
            let coord = CellCoord::new(id % columns.max(1), id / columns.max(1));
            (CellId::new(id), coord)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_and_handles_round_trip() {
        let grid = GridIndex::new(5, 4, 32.0);
        for (cell, coord) in grid.iter() {
            assert_eq!(grid.cell_at(coord), Some(cell));
            assert_eq!(grid.coord_of(cell), Some(coord));
        }
        assert_eq!(grid.cell_count(), 20);
    }

    #[test]
    fn out_of_range_lookups_answer_none() {
        let grid = GridIndex::new(5, 4, 32.0);
        assert_eq!(grid.cell_at(CellCoord::new(5, 0)), None);
        assert_eq!(grid.cell_at(CellCoord::new(0, 4)), None);
        assert_eq!(grid.coord_of(CellId::new(20)), None);
    }

    #[test]
    fn empty_grid_has_no_cells() {
        let grid = GridIndex::new(0, 7, 32.0);
        assert_eq!(grid.cell_count(), 0);
        assert_eq!(grid.cell_at(CellCoord::new(0, 0)), None);
        assert_eq!(grid.coord_of(CellId::new(0)), None);
    }
}
