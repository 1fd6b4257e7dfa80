use anyhow::{Result, bail};
use clap::Parser;
use lbrnt_core::{
    Dir, GenerationConfig, GenerationError, LocationCatalog, MazeConfig, Session, snapshot,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
    /// Placement rounds per location type; small values make exhaustion reachable
    #[arg(long, default_value_t = 2_000)]
    max_placement_rounds: usize,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p]
}

fn between(rng: &mut ChaCha8Rng, low: i32, high: i32) -> i32 {
    low + (rng.next_u64() % (high - low + 1) as u64) as i32
}

fn check_invariants(session: &Session) -> Result<()> {
    let maze = session.maze();
    if !maze.is_fully_connected() {
        bail!("maze is not fully connected");
    }
    for pos in maze.positions() {
        for dir in Dir::ALL {
            match maze.neighbor(pos, dir) {
                Some(next) if maze.has_wall(pos, dir) != maze.has_wall(next, dir.opposite()) => {
                    bail!("one-sided wall {dir} at {pos:?}");
                }
                None if !maze.has_wall(pos, dir) => bail!("open border wall {dir} at {pos:?}"),
                _ => {}
            }
        }
    }
    let mut claimed = Vec::new();
    for location in session.locations() {
        let mut exits = 0;
        for &cell in location.cells() {
            if claimed.contains(&cell) {
                bail!("cell {cell:?} claimed twice");
            }
            claimed.push(cell);
            for dir in Dir::ALL {
                if let Some(next) = maze.neighbor(cell, dir)
                    && !location.contains(next)
                    && !maze.has_wall(cell, dir)
                {
                    exits += 1;
                }
            }
        }
        if exits != 1 {
            bail!("{} has {exits} exits", location.kind());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} runs...", args.seed, args.runs);
    let catalog = LocationCatalog::standard();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut exhausted = 0;

    for run in 0..args.runs {
        let config = GenerationConfig {
            maze: MazeConfig {
                width: between(&mut rng, 1, 24),
                height: between(&mut rng, 1, 24),
                openness: between(&mut rng, -10, 110),
            },
            seed: rng.next_u64() | 1,
            max_placement_rounds: args.max_placement_rounds,
            ..GenerationConfig::default()
        };

        let mut session = match Session::generate(&config, &catalog) {
            Ok(session) => session,
            Err(GenerationError::PlacementExhausted { .. }) => {
                exhausted += 1;
                continue;
            }
            Err(err) => bail!("run {run} with {config:?} failed: {err}"),
        };
        check_invariants(&session)?;

        for index in 0..between(&mut rng, 0, 4) {
            session.add_player(&format!("p{index}"))?;
        }
        for _ in 0..32 {
            if session.players().is_empty() {
                break;
            }
            let who = rng.next_u64() as usize % session.players().len();
            let name = session.players()[who].name.clone();
            session.move_player(&name, choose(&mut rng, &Dir::ALL))?;
            let pos = session.players()[who].pos;
            assert!(session.maze().in_bounds(pos), "Invariant failed: player left the grid");
        }

        let restored = snapshot::decode(&snapshot::encode(&session), &catalog)?;
        assert!(restored == session, "Invariant failed: snapshot round trip on run {run}");
    }

    println!(
        "Fuzzing completed successfully ({} runs, {} hit the placement cap).",
        args.runs, exhausted
    );
    Ok(())
}
