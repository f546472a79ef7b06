//! Multi-source distance-field propagation across traversable cells.
//!
//! The field is recomputed from scratch on every scheduled rebuild rather
//! than repaired incrementally: obstacle occupancy can change arbitrarily
//! between rebuilds (bombs, digging, hazard growth), and dependency tracking
//! would cost more than a full pass at the grid sizes involved.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use mirewarren_core::{CellId, Direction, UNREACHABLE};

use crate::neighbours::NeighbourGraph;

/// Diagonal movement policy shared by the distance field and actor stepping.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PropagationPolicy {
    /// Whether a diagonal edge may be used when both flanking orthogonal
    /// cells are blocked.
    pub(crate) allow_diagonal_corner_cut: bool,
}

impl Default for PropagationPolicy {
    fn default() -> Self {
        // Preserved behaviour of the original engine; see DESIGN.md.
        Self {
            allow_diagonal_corner_cut: true,
        }
    }
}

/// Reports whether taking `direction` out of `cell` would squeeze between
/// two blocked orthogonal cells.
pub(crate) fn is_corner_cut<F>(
    graph: &NeighbourGraph,
    cell: CellId,
    direction: Direction,
    is_traversable: &mut F,
) -> bool
where
    F: FnMut(CellId) -> bool,
{
    let Some((first, second)) = direction.flanking() else {
        return false;
    };
    let flank_open = |flank: Direction, is_traversable: &mut F| {
        graph
            .neighbour(cell, flank)
            .map_or(false, |neighbour| is_traversable(neighbour))
    };
    !flank_open(first, is_traversable) && !flank_open(second, is_traversable)
}

/// Dense shortest-distance grid seeded from the active source set.
///
/// Distances default to [`UNREACHABLE`] so callers can distinguish blocked
/// or disconnected cells from traversable ones. Storage mirrors the grid's
/// row-major handle order.
#[derive(Clone, Debug, Default)]
pub(crate) struct DistanceField {
    distances: Vec<u32>,
}

impl DistanceField {
    /// Recomputes the distances from the provided source handles.
    ///
    /// All sources seed at distance zero. Cells are expanded at most once and
    /// finalize in non-decreasing distance order; ties resolve in insertion
    /// order, which degenerates to breadth-first level order because every
    /// edge weighs one. Non-traversable cells are never pushed and keep the
    /// sentinel.
    pub(crate) fn rebuild_with<F>(
        &mut self,
        graph: &NeighbourGraph,
        sources: &[CellId],
        policy: PropagationPolicy,
        is_traversable: F,
    ) where
        F: FnMut(CellId) -> bool,
    {
        self.rebuild_observed(graph, sources, policy, is_traversable, |_, _| {});
    }

    fn rebuild_observed<F, O>(
        &mut self,
        graph: &NeighbourGraph,
        sources: &[CellId],
        policy: PropagationPolicy,
        mut is_traversable: F,
        mut on_finalized: O,
    ) where
        F: FnMut(CellId) -> bool,
        O: FnMut(CellId, u32),
    {
        let cell_count = graph.cell_count();
        if self.distances.len() != cell_count {
            self.distances = vec![UNREACHABLE; cell_count];
        } else {
            self.distances.fill(UNREACHABLE);
        }

        let mut finalized = vec![false; cell_count];
        let mut queue: BinaryHeap<Reverse<(u32, u64, u32)>> = BinaryHeap::new();
        let mut insertion_order: u64 = 0;

        for &source in sources {
            let Some(index) = self.slot(source) else {
                continue;
            };
            if !is_traversable(source) || self.distances[index] == 0 {
                continue;
            }
            self.distances[index] = 0;
            queue.push(Reverse((0, insertion_order, source.get())));
            insertion_order += 1;
        }

        while let Some(Reverse((distance, _, raw))) = queue.pop() {
            let cell = CellId::new(raw);
            let Some(index) = self.slot(cell) else {
                continue;
            };
            if finalized[index] {
                continue;
            }
            finalized[index] = true;
            on_finalized(cell, distance);

            let next_distance = distance.saturating_add(1);
            for (direction, neighbour) in graph.neighbours(cell) {
                if !is_traversable(neighbour) {
                    continue;
                }
                if direction.is_diagonal()
                    && !policy.allow_diagonal_corner_cut
                    && is_corner_cut(graph, cell, direction, &mut is_traversable)
                {
                    continue;
                }
                let Some(neighbour_index) = self.slot(neighbour) else {
                    continue;
                };
                if self.distances[neighbour_index] <= next_distance {
                    continue;
                }
                self.distances[neighbour_index] = next_distance;
                queue.push(Reverse((next_distance, insertion_order, neighbour.get())));
                insertion_order += 1;
            }
        }
    }

    /// Drops every recorded distance, e.g. when the grid is reconfigured.
    pub(crate) fn clear(&mut self) {
        self.distances.clear();
    }

    /// Dense distances stored in row-major handle order.
    pub(crate) fn distances(&self) -> &[u32] {
        &self.distances
    }

    fn slot(&self, cell: CellId) -> Option<usize> {
        let index = usize::try_from(cell.get()).ok()?;
        if index < self.distances.len() {
            Some(index)
        } else {
            None
        }
    }

    #[cfg(test)]
    fn rebuild_traced<F>(
        &mut self,
        graph: &NeighbourGraph,
        sources: &[CellId],
        policy: PropagationPolicy,
        is_traversable: F,
    ) -> Vec<(CellId, u32)>
    where
        F: FnMut(CellId) -> bool,
    {
        let mut trace = Vec::new();
        self.rebuild_observed(graph, sources, policy, is_traversable, |cell, distance| {
            trace.push((cell, distance));
        });
        trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridIndex;
    use mirewarren_core::CellCoord;
    use std::collections::HashSet;

    fn open_grid(columns: u32, rows: u32) -> (GridIndex, NeighbourGraph) {
        let grid = GridIndex::new(columns, rows, 32.0);
        let graph = NeighbourGraph::build(&grid);
        (grid, graph)
    }

    fn blocked_set(grid: &GridIndex, cells: &[CellCoord]) -> HashSet<u32> {
        cells
            .iter()
            .filter_map(|coord| grid.cell_at(*coord))
            .map(|cell| cell.get())
            .collect()
    }

    #[test]
    fn empty_five_by_five_field_matches_chebyshev_layering() {
        let (grid, graph) = open_grid(5, 5);
        let source_coord = CellCoord::new(2, 2);
        let source = grid.cell_at(source_coord).expect("source cell");
        let mut field = DistanceField::default();

        field.rebuild_with(&graph, &[source], PropagationPolicy::default(), |_| true);

        for (cell, coord) in grid.iter() {
            let index = usize::try_from(cell.get()).expect("index");
            let expected = coord.chebyshev_distance(source_coord);
            assert_eq!(
                field.distances()[index],
                expected,
                "wrong distance at {coord:?}"
            );
        }

        // The distance-1 ring contains the four orthogonal cells and the
        // diagonals, because diagonal neighbours are direct graph edges.
        for coord in [
            CellCoord::new(1, 2),
            CellCoord::new(3, 2),
            CellCoord::new(2, 1),
            CellCoord::new(2, 3),
            CellCoord::new(1, 1),
        ] {
            let cell = grid.cell_at(coord).expect("ring cell");
            let index = usize::try_from(cell.get()).expect("index");
            assert_eq!(field.distances()[index], 1);
        }
    }

    #[test]
    fn reachable_cells_satisfy_the_bfs_recurrence() {
        let (grid, graph) = open_grid(7, 6);
        let blocked = blocked_set(
            &grid,
            &[
                CellCoord::new(2, 0),
                CellCoord::new(2, 1),
                CellCoord::new(2, 2),
                CellCoord::new(2, 3),
                CellCoord::new(4, 5),
                CellCoord::new(5, 2),
            ],
        );
        let source = grid.cell_at(CellCoord::new(0, 0)).expect("source cell");
        let mut field = DistanceField::default();

        field.rebuild_with(&graph, &[source], PropagationPolicy::default(), |cell| {
            !blocked.contains(&cell.get())
        });

        for (cell, _) in grid.iter() {
            let index = usize::try_from(cell.get()).expect("index");
            let distance = field.distances()[index];
            if blocked.contains(&cell.get()) {
                assert_eq!(distance, UNREACHABLE);
                continue;
            }
            if distance == 0 {
                assert_eq!(cell, source);
                continue;
            }
            if distance == UNREACHABLE {
                continue;
            }

            let best_neighbour = graph
                .neighbours(cell)
                .filter(|(_, n)| !blocked.contains(&n.get()))
                .map(|(_, n)| field.distances()[usize::try_from(n.get()).expect("index")])
                .min()
                .expect("reachable cell has a neighbour");
            assert_eq!(distance, best_neighbour + 1);
        }
    }

    #[test]
    fn cells_finalize_in_non_decreasing_distance_order() {
        let (grid, graph) = open_grid(6, 6);
        let blocked = blocked_set(
            &grid,
            &[
                CellCoord::new(1, 1),
                CellCoord::new(1, 2),
                CellCoord::new(3, 3),
                CellCoord::new(4, 0),
            ],
        );
        let sources = [
            grid.cell_at(CellCoord::new(0, 0)).expect("source"),
            grid.cell_at(CellCoord::new(5, 5)).expect("source"),
        ];
        let mut field = DistanceField::default();

        let trace = field.rebuild_traced(&graph, &sources, PropagationPolicy::default(), |cell| {
            !blocked.contains(&cell.get())
        });

        assert!(!trace.is_empty());
        for window in trace.windows(2) {
            assert!(
                window[0].1 <= window[1].1,
                "finalization regressed: {window:?}"
            );
        }
    }

    #[test]
    fn multiple_sources_all_seed_at_zero() {
        let (grid, graph) = open_grid(5, 1);
        let sources = [
            grid.cell_at(CellCoord::new(0, 0)).expect("source"),
            grid.cell_at(CellCoord::new(4, 0)).expect("source"),
        ];
        let mut field = DistanceField::default();

        field.rebuild_with(&graph, &sources, PropagationPolicy::default(), |_| true);

        let distance_at = |column: u32| {
            let cell = grid.cell_at(CellCoord::new(column, 0)).expect("cell");
            field.distances()[usize::try_from(cell.get()).expect("index")]
        };
        assert_eq!(distance_at(0), 0);
        assert_eq!(distance_at(4), 0);
        assert_eq!(distance_at(1), 1);
        assert_eq!(distance_at(3), 1);
        assert_eq!(distance_at(2), 2);
    }

    #[test]
    fn zero_sources_leave_every_cell_unreachable() {
        let (_, graph) = open_grid(4, 4);
        let mut field = DistanceField::default();

        field.rebuild_with(&graph, &[], PropagationPolicy::default(), |_| true);

        assert!(field
            .distances()
            .iter()
            .all(|&distance| distance == UNREACHABLE));
    }

    #[test]
    fn walls_partition_the_field() {
        let (grid, graph) = open_grid(5, 3);
        let wall: Vec<CellCoord> = (0..3).map(|row| CellCoord::new(2, row)).collect();
        let blocked = blocked_set(&grid, &wall);
        let source = grid.cell_at(CellCoord::new(0, 1)).expect("source");
        let mut field = DistanceField::default();

        field.rebuild_with(&graph, &[source], PropagationPolicy::default(), |cell| {
            !blocked.contains(&cell.get())
        });

        for row in 0..3 {
            for column in 3..5 {
                let cell = grid.cell_at(CellCoord::new(column, row)).expect("cell");
                let index = usize::try_from(cell.get()).expect("index");
                assert_eq!(field.distances()[index], UNREACHABLE);
            }
        }
    }

    #[test]
    fn corner_cut_policy_gates_diagonals_between_blocked_flanks() {
        let (grid, graph) = open_grid(3, 3);
        let blocked = blocked_set(&grid, &[CellCoord::new(1, 0), CellCoord::new(0, 1)]);
        let source = grid.cell_at(CellCoord::new(0, 0)).expect("source");
        let diagonal = grid.cell_at(CellCoord::new(1, 1)).expect("diagonal");
        let mut field = DistanceField::default();

        let permissive = PropagationPolicy {
            allow_diagonal_corner_cut: true,
        };
        field.rebuild_with(&graph, &[source], permissive, |cell| {
            !blocked.contains(&cell.get())
        });
        let index = usize::try_from(diagonal.get()).expect("index");
        assert_eq!(field.distances()[index], 1);

        let strict = PropagationPolicy {
            allow_diagonal_corner_cut: false,
        };
        field.rebuild_with(&graph, &[source], strict, |cell| {
            !blocked.contains(&cell.get())
        });
        assert_eq!(field.distances()[index], UNREACHABLE);
        let reachable = field
            .distances()
            .iter()
            .filter(|&&distance| distance != UNREACHABLE)
            .count();
        assert_eq!(reachable, 1, "only the source survives the strict policy");
    }
}
