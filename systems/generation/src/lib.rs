#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic cellular-automaton layout generation system.

use mirewarren_core::{
    CellCoord, Command, Event, GenerationConfig, ObstacleLayout, RNG_STREAM_LAYOUT,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Pure system that turns `GenerateLayout` commands into [`Event::LayoutReady`]
/// announcements.
///
/// The system never touches the world; the produced layout only takes effect
/// once an adapter feeds it back as `Command::ApplyLayout`. Grid dimensions
/// come from the caller because a layout is always generated for the grid the
/// world currently holds.
#[derive(Debug, Default)]
pub struct LayoutGeneration {
    current: Vec<bool>,
    next: Vec<bool>,
}

impl LayoutGeneration {
    /// Consumes `GenerateLayout` commands and emits one layout per request.
    pub fn handle(
        &mut self,
        commands: &[Command],
        columns: u32,
        rows: u32,
        out_events: &mut Vec<Event>,
    ) {
        for command in commands {
            if let Command::GenerateLayout { config } = command {
                let layout = self.generate(columns, rows, *config);
                out_events.push(Event::LayoutReady { layout });
            }
        }
    }

    fn generate(&mut self, columns: u32, rows: u32, config: GenerationConfig) -> ObstacleLayout {
        let cell_count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        if cell_count == 0 {
            return ObstacleLayout::new(columns, rows, Vec::new());
        }

        self.current.clear();
        self.current.resize(cell_count, false);
        self.next.clear();
        self.next.resize(cell_count, false);

        let mut rng =
            ChaCha8Rng::seed_from_u64(derive_labeled_seed(config.seed(), RNG_STREAM_LAYOUT));
        let fill = f64::from(config.fill_probability());
        for flag in &mut self.current {
            *flag = rng.gen_bool(fill);
        }

        for _ in 0..config.iterations() {
            step_rule(&self.current, &mut self.next, columns, rows, &config);
            std::mem::swap(&mut self.current, &mut self.next);
        }

        let mut obstacles = Vec::new();
        for (index, flag) in self.current.iter().enumerate() {
            if *flag {
                let id = u32::try_from(index).unwrap_or(u32::MAX);
                obstacles.push(CellCoord::new(id % columns, id / columns));
            }
        }
        ObstacleLayout::new(columns, rows, obstacles)
    }
}

/// Applies one automaton pass over the whole grid.
///
/// Reads only `current` and writes only `next`, so every cell within one pass
/// observes the same generation. Neighbours beyond the grid edge count as
/// open, which biases the cave rule toward eroding the border.
fn step_rule(current: &[bool], next: &mut [bool], columns: u32, rows: u32, config: &GenerationConfig) {
    for row in 0..rows {
        for column in 0..columns {
            let index = usize::try_from(u64::from(row) * u64::from(columns) + u64::from(column))
                .unwrap_or(0);
            let count = obstacle_neighbours(current, columns, rows, column, row);
            next[index] = config.rule().next(current[index], count);
        }
    }
}

fn obstacle_neighbours(current: &[bool], columns: u32, rows: u32, column: u32, row: u32) -> u8 {
    let mut count = 0u8;
    for delta_row in -1i64..=1 {
        for delta_column in -1i64..=1 {
            if delta_row == 0 && delta_column == 0 {
                continue;
            }
            let neighbour_column = i64::from(column) + delta_column;
            let neighbour_row = i64::from(row) + delta_row;
            if neighbour_column < 0
                || neighbour_row < 0
                || neighbour_column >= i64::from(columns)
                || neighbour_row >= i64::from(rows)
            {
                continue;
            }
            let index = usize::try_from(neighbour_row * i64::from(columns) + neighbour_column)
                .unwrap_or(0);
            if current.get(index).copied().unwrap_or(false) {
                count = count.saturating_add(1);
            }
        }
    }
    count
}

fn derive_labeled_seed(base: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}
