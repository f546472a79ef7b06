#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Mirewarren session.
//!
//! The binary wires the full command loop together: it generates a cave
//! layout, applies it, spawns one player and a pack of hunters, optionally
//! seeds both hazard kinds, then advances the clock while feeding pursuit
//! proposals back into the world.

mod render;

use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use mirewarren_core::{
    ActorKind, AutomatonRule, CellCoord, Command, Event, GenerationConfig, HazardKind,
    OccupancyKind,
};
use mirewarren_system_generation::LayoutGeneration;
use mirewarren_system_pursuit::Pursuit;
use mirewarren_world::{apply, query, World};

const TICK_DT: Duration = Duration::from_millis(250);
const MAX_GENERATION_ATTEMPTS: u64 = 8;

/// Command-line arguments accepted by the Mirewarren binary.
#[derive(Debug, Parser)]
#[command(name = "mirewarren", about = "Headless maze-survival simulation")]
struct Args {
    /// Number of grid columns.
    #[arg(long, default_value_t = 24)]
    columns: u32,
    /// Number of grid rows.
    #[arg(long, default_value_t = 16)]
    rows: u32,
    /// Base seed for every derived RNG stream.
    #[arg(long, default_value_t = 0x6d69_7265)]
    seed: u64,
    /// Probability that a cell starts as an obstacle before smoothing.
    #[arg(long, default_value_t = 0.45)]
    fill: f32,
    /// Number of cave-smoothing passes.
    #[arg(long, default_value_t = 4)]
    iterations: u32,
    /// Number of hunters chasing the player.
    #[arg(long, default_value_t = 3)]
    hunters: u32,
    /// Number of clock ticks to simulate.
    #[arg(long, default_value_t = 120)]
    ticks: u32,
    /// Forbid diagonal steps that squeeze between two blocked cells.
    #[arg(long)]
    strict_corners: bool,
    /// Seed one sinkhole and one corruption region into the layout.
    #[arg(long)]
    hazards: bool,
    /// Print the distance-field debug overlay next to the final frame.
    #[arg(long)]
    overlay: bool,
}

fn main() -> anyhow::Result<()> {
    run(Args::parse())
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.columns == 0 || args.rows == 0 {
        bail!("grid dimensions must be positive, got {}x{}", args.columns, args.rows);
    }

    let mut world = World::new();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ConfigureGrid {
            columns: args.columns,
            rows: args.rows,
            cell_length: 32.0,
        },
        &mut events,
    );
    if args.strict_corners {
        apply(
            &mut world,
            Command::SetCornerCutPolicy { allowed: false },
            &mut events,
        );
    }

    let start = generate_connected_layout(&mut world, &args)?;
    apply(
        &mut world,
        Command::SpawnActor {
            kind: ActorKind::Player,
            cell: start,
        },
        &mut events,
    );
    spawn_hunters(&mut world, &args, start, &mut events);
    if args.hazards {
        seed_hazards(&mut world, &args, &mut events);
    }

    println!(
        "{}",
        render::frame(query::occupancy_view(&world), &query::actor_view(&world))
    );

    let mut pursuit = Pursuit::default();
    let mut proposals = Vec::new();
    let mut steps = 0u32;
    let mut spreads = 0u32;
    let mut rebuilds = 0u32;
    let mut caught_after = None;

    for tick in 0..args.ticks {
        let mut tick_events = Vec::new();
        apply(&mut world, Command::Tick { dt: TICK_DT }, &mut tick_events);

        proposals.clear();
        pursuit.handle(
            &tick_events,
            &query::actor_view(&world),
            query::occupancy_view(&world),
            query::distance_field_view(&world),
            query::corner_cut_allowed(&world),
            &mut proposals,
        );
        for command in proposals.drain(..) {
            apply(&mut world, command, &mut tick_events);
        }

        for event in &tick_events {
            match event {
                Event::ActorAdvanced { .. } => steps += 1,
                Event::HazardSpread { .. } => spreads += 1,
                Event::DistanceFieldRebuilt { .. } => rebuilds += 1,
                _ => {}
            }
        }

        if player_is_caught(&world) {
            caught_after = Some(tick + 1);
            break;
        }
    }

    println!(
        "{}",
        render::frame(query::occupancy_view(&world), &query::actor_view(&world))
    );
    if args.overlay {
        println!("{}", render::overlay(query::distance_field_view(&world)));
    }
    println!("steps: {steps}, hazard spreads: {spreads}, field rebuilds: {rebuilds}");
    match caught_after {
        Some(tick) => println!("the player was caught after {tick} ticks"),
        None => println!("the player survived {} ticks", args.ticks),
    }
    Ok(())
}

/// Generates layouts until one keeps a majority of its open cells connected
/// to the start cell, bumping the seed on every retry.
fn generate_connected_layout(world: &mut World, args: &Args) -> anyhow::Result<CellCoord> {
    let mut generation = LayoutGeneration::default();
    for attempt in 0..MAX_GENERATION_ATTEMPTS {
        let config = GenerationConfig::new(
            args.seed.wrapping_add(attempt),
            args.fill,
            args.iterations,
            AutomatonRule::cave(),
        );
        let mut attempt_events = Vec::new();
        generation.handle(
            &[Command::GenerateLayout { config }],
            args.columns,
            args.rows,
            &mut attempt_events,
        );
        let Some(Event::LayoutReady { layout }) = attempt_events.pop() else {
            bail!("the generation system produced no layout");
        };
        apply(world, Command::ApplyLayout { layout }, &mut attempt_events);

        let occupancy = query::occupancy_view(world);
        let open_count = occupancy
            .iter()
            .filter(|kind| kind.is_traversable())
            .count();
        let Some(start) = first_traversable(world) else {
            continue;
        };
        let reachable = u64::from(query::reachable_cell_count(world, start));
        if reachable * 2 >= open_count as u64 {
            return Ok(start);
        }
    }
    bail!(
        "no connected layout within {MAX_GENERATION_ATTEMPTS} attempts; try a lower --fill or more --iterations"
    )
}

fn first_traversable(world: &World) -> Option<CellCoord> {
    let occupancy = query::occupancy_view(world);
    let (columns, rows) = occupancy.dimensions();
    (0..rows)
        .flat_map(|row| (0..columns).map(move |column| CellCoord::new(column, row)))
        .find(|cell| occupancy.is_traversable(*cell))
}

/// Spawns hunters on traversable cells scanned from the far corner, keeping
/// them away from the player's start.
fn spawn_hunters(world: &mut World, args: &Args, start: CellCoord, events: &mut Vec<Event>) {
    let (columns, rows) = query::occupancy_view(world).dimensions();
    let mut placed = 0u32;
    for row in (0..rows).rev() {
        for column in (0..columns).rev() {
            if placed >= args.hunters {
                return;
            }
            let cell = CellCoord::new(column, row);
            if cell == start || !query::occupancy_view(world).is_traversable(cell) {
                continue;
            }
            apply(
                world,
                Command::SpawnActor {
                    kind: ActorKind::Hunter,
                    cell,
                },
                events,
            );
            placed += 1;
        }
    }
}

/// Seeds a sinkhole on the first obstacle and a corruption region on the
/// last one, when the layout produced any obstacles at all.
fn seed_hazards(world: &mut World, args: &Args, events: &mut Vec<Event>) {
    let occupancy = query::occupancy_view(world);
    let (columns, rows) = occupancy.dimensions();
    let obstacles: Vec<CellCoord> = (0..rows)
        .flat_map(|row| (0..columns).map(move |column| CellCoord::new(column, row)))
        .filter(|cell| occupancy.kind(*cell) == Some(OccupancyKind::Obstacle))
        .collect();
    if let Some(first) = obstacles.first().copied() {
        apply(
            world,
            Command::SeedHazard {
                kind: HazardKind::Sinkhole,
                cell: first,
                rng_seed: args.seed,
            },
            events,
        );
    }
    if let Some(last) = obstacles.last().copied() {
        apply(
            world,
            Command::SeedHazard {
                kind: HazardKind::Corruption,
                cell: last,
                rng_seed: args.seed.wrapping_add(1),
            },
            events,
        );
    }
}

fn player_is_caught(world: &World) -> bool {
    let actors = query::actor_view(world);
    let player_cells: Vec<CellCoord> = actors
        .iter()
        .filter(|snapshot| snapshot.kind == ActorKind::Player)
        .map(|snapshot| snapshot.cell)
        .collect();
    let caught = actors
        .iter()
        .any(|snapshot| snapshot.kind == ActorKind::Hunter && player_cells.contains(&snapshot.cell));
    caught
}
