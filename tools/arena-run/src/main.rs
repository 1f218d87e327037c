//! arena-run: headless round runner and map checker.
//!
//! Usage:
//!   arena-run run --map arena.txt --config round.json --seed 7 --ticks 3600
//!   arena-run check --map arena.txt

use std::path::PathBuf;
use std::process;

use tankwar_core::commands::{PlayerIntent, TickIntents};
use tankwar_core::config::RoundConfig;
use tankwar_core::enums::Direction;
use tankwar_core::state::RoundSnapshot;
use tankwar_map::{default_arena, TileGrid, TileKind};
use tankwar_sim::RoundEngine;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "arena-run: Tank War headless round runner\n\
         \n\
         Commands:\n\
         \n\
         run       Simulate a round with scripted players and print the final snapshot as JSON\n\
         \n\
           --map <path>       Map text file (default: built-in arena)\n\
           --config <path>    Round config JSON (default: stock settings)\n\
           --seed <N>         Override the config seed\n\
           --ticks <N>        Tick limit (default: 3600, one minute)\n\
           --every <N>        Also print every Nth snapshot as a JSON line\n\
         \n\
         check     Parse a map and print a summary\n\
         \n\
           --map <path>       Map text file (default: built-in arena)\n\
         \n\
         Examples:\n\
         \n\
           arena-run run --seed 7 --ticks 7200\n\
           arena-run check --map maps/duel.txt\n"
    );
}

fn parse_flag<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(&args[i + 1]);
        }
    }
    None
}

fn parse_number(args: &[String], flag: &str) -> Option<u64> {
    let raw = parse_flag(args, flag)?;
    match raw.parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            eprintln!("Error: {flag} expects a number, got {raw}");
            process::exit(1);
        }
    }
}

fn load_grid(args: &[String]) -> TileGrid {
    match parse_flag(args, "--map").map(PathBuf::from) {
        Some(path) => match TileGrid::load(&path) {
            Ok(grid) => grid,
            Err(e) => {
                eprintln!("Error loading map {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => default_arena(),
    }
}

fn load_config(args: &[String]) -> RoundConfig {
    let mut config = match parse_flag(args, "--config").map(PathBuf::from) {
        Some(path) => match RoundConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => RoundConfig::default(),
    };
    if let Some(seed) = parse_number(args, "--seed") {
        config.seed = seed;
    }
    config
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let grid = load_grid(args);
    let config = load_config(args);
    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    let ticks = parse_number(args, "--ticks").unwrap_or(3600);
    let every = parse_number(args, "--every").unwrap_or(0);

    let mut engine = RoundEngine::new_round(&grid, config);
    let mut snapshot = engine.snapshot();

    for tick in 0..ticks {
        snapshot = engine.advance_tick(&scripted_intents(tick));
        if every > 0 && tick % every == 0 {
            print_json(&snapshot, false);
        }
        if snapshot.outcome.is_terminal() {
            break;
        }
    }

    log::info!(
        "Stopped at tick {}: {:?}, scores P1={} P2={}",
        snapshot.time.tick,
        snapshot.outcome,
        snapshot.scores.p1,
        snapshot.scores.p2
    );
    print_json(&snapshot, true);
}

/// Both players sweep through the four directions and fire on a fixed beat.
fn scripted_intents(tick: u64) -> TickIntents {
    let heading = |period: u64, offset: usize| {
        Direction::ALL[((tick / period) as usize + offset) % Direction::ALL.len()]
    };
    TickIntents {
        p1: PlayerIntent {
            direction: Some(heading(45, 0)),
            fire: tick % 20 == 0,
        },
        p2: PlayerIntent {
            direction: Some(heading(55, 2)),
            fire: tick % 25 == 0,
        },
    }
}

fn print_json(snapshot: &RoundSnapshot, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(snapshot)
    } else {
        serde_json::to_string(snapshot)
    };
    match json {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error serializing snapshot: {e}");
            process::exit(1);
        }
    }
}

// --- Check command ---

fn cmd_check(args: &[String]) {
    let grid = load_grid(args);
    let config = RoundConfig::default();

    let count = |kind: TileKind| grid.cells().filter(|(_, k)| *k == kind).count();
    let spawn_tiles = grid
        .cells()
        .filter(|(coord, kind)| {
            *kind == TileKind::Empty
                && (config.spawn_row_min..=config.spawn_row_max).contains(&coord.row)
        })
        .count();
    let [p1, p2] = grid.player_spawns();

    eprintln!("Map: {}x{} tiles", grid.width(), grid.height());
    eprintln!(
        "Bricks: {}, iron: {}, bushes: {}, hazard cores: {}",
        count(TileKind::BreakableWall),
        count(TileKind::IndestructibleWall),
        count(TileKind::Bush),
        count(TileKind::HazardCore)
    );
    eprintln!("Enemy spawn tiles: {spawn_tiles}");
    eprintln!(
        "Player spawns: P1 ({}, {}), P2 ({}, {})",
        p1.col, p1.row, p2.col, p2.row
    );

    for (id, spawn) in [("P1", p1), ("P2", p2)] {
        if grid.get(spawn) != Some(TileKind::Empty) {
            log::warn!("{id} spawn ({}, {}) is not an empty tile", spawn.col, spawn.row);
        }
    }
    if spawn_tiles == 0 {
        log::warn!("No enemy spawn tiles; enemies will never spawn on this map");
    }
}
