//! ASCII frame rendering for the headless session.

use mirewarren_core::{
    ActorKind, ActorView, CellCoord, DistanceFieldView, OccupancyKind, OccupancyView,
};

/// Renders one frame of the maze as newline-separated rows.
///
/// Actors draw over terrain; a player standing on corrupted ground still
/// shows as the player.
pub(crate) fn frame(occupancy: OccupancyView<'_>, actors: &ActorView) -> String {
    let (columns, rows) = occupancy.dimensions();
    let mut out = String::with_capacity((columns as usize + 1) * rows as usize);
    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            out.push(glyph(occupancy, actors, cell));
        }
        out.push('\n');
    }
    out
}

/// Renders the distance field as one glyph per cell.
///
/// Digits and lowercase letters encode distances zero through thirty-five,
/// `+` stands in for anything farther, and `-` marks cells the last rebuild
/// never reached (blocked or disconnected).
pub(crate) fn overlay(distances: DistanceFieldView<'_>) -> String {
    let (columns, rows) = distances.dimensions();
    let mut out = String::with_capacity((columns as usize + 1) * rows as usize);
    for row in 0..rows {
        for column in 0..columns {
            out.push(distance_glyph(distances.distance(CellCoord::new(column, row))));
        }
        out.push('\n');
    }
    out
}

fn distance_glyph(distance: Option<u32>) -> char {
    match distance {
        None => '-',
        Some(value) => char::from_digit(value, 36).unwrap_or('+'),
    }
}

fn glyph(occupancy: OccupancyView<'_>, actors: &ActorView, cell: CellCoord) -> char {
    let mut actor_glyph = None;
    for snapshot in actors.iter() {
        if snapshot.cell != cell {
            continue;
        }
        match snapshot.kind {
            // The player wins the cell even when a hunter shares it.
            ActorKind::Player => return '@',
            ActorKind::Hunter => actor_glyph = Some('h'),
        }
    }
    if let Some(glyph) = actor_glyph {
        return glyph;
    }
    match occupancy.kind(cell) {
        Some(OccupancyKind::Open) | None => '.',
        Some(OccupancyKind::Obstacle) => '#',
        Some(OccupancyKind::Sinkhole) => 'O',
        Some(OccupancyKind::Corruption) => '~',
        Some(OccupancyKind::Reserved) => '+',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirewarren_core::{ActorId, ActorSnapshot};

    #[test]
    fn frames_draw_terrain_and_actors() {
        let kinds = [
            OccupancyKind::Open,
            OccupancyKind::Obstacle,
            OccupancyKind::Sinkhole,
            OccupancyKind::Corruption,
        ];
        let occupancy = OccupancyView::new(&kinds, 2, 2);
        let actors = ActorView::from_snapshots(vec![
            ActorSnapshot {
                id: ActorId::new(0),
                kind: ActorKind::Player,
                cell: CellCoord::new(0, 0),
            },
            ActorSnapshot {
                id: ActorId::new(1),
                kind: ActorKind::Hunter,
                cell: CellCoord::new(1, 1),
            },
        ]);

        assert_eq!(frame(occupancy, &actors), "@#\nOh\n");
    }

    #[test]
    fn players_draw_over_hunters_on_shared_cells() {
        let kinds = [OccupancyKind::Open];
        let occupancy = OccupancyView::new(&kinds, 1, 1);
        let actors = ActorView::from_snapshots(vec![
            ActorSnapshot {
                id: ActorId::new(0),
                kind: ActorKind::Hunter,
                cell: CellCoord::new(0, 0),
            },
            ActorSnapshot {
                id: ActorId::new(1),
                kind: ActorKind::Player,
                cell: CellCoord::new(0, 0),
            },
        ]);

        assert_eq!(frame(occupancy, &actors), "@\n");
    }

    #[test]
    fn overlays_encode_distances_as_glyphs() {
        let distances = [0, 1, mirewarren_core::UNREACHABLE, 12];
        let view = DistanceFieldView::new(&distances, 2, 2);
        assert_eq!(overlay(view), "01\n-c\n");
    }

    #[test]
    fn distant_cells_clamp_to_a_single_glyph() {
        let distances = [35, 36];
        let view = DistanceFieldView::new(&distances, 2, 1);
        assert_eq!(overlay(view), "z+\n");
    }

    #[test]
    fn empty_fields_overlay_as_unreachable() {
        let view = DistanceFieldView::new(&[], 2, 2);
        assert_eq!(overlay(view), "--\n--\n");
    }
}
