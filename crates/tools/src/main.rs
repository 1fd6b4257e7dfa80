mod config;
mod svg;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use lbrnt_core::{Dir, Event, LocationCatalog, Session, snapshot};
use serde::Serialize;
use tracing::{Level, info};

use crate::config::GenerateFlags;

#[derive(Parser)]
#[command(author, version, about = "Seeded maze generator with enclosed locations", long_about = None)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a new maze with its locations and write the snapshot
    Generate {
        #[arg(long, allow_negative_numbers = true, required_unless_present = "config")]
        width: Option<i32>,
        #[arg(long, allow_negative_numbers = true, required_unless_present = "config")]
        height: Option<i32>,
        /// Chance in percent that a spanning-tree wall is also removed [default: 50]
        #[arg(long, allow_negative_numbers = true)]
        openness: Option<i32>,
        /// 0 picks a random seed [default: 0]
        #[arg(long)]
        seed: Option<u64>,
        /// Placement rounds per location type before giving up [default: 10000]
        #[arg(long)]
        max_placement_rounds: Option<usize>,
        /// TOML file with generation settings; explicit flags win
        #[arg(long)]
        config: Option<PathBuf>,
        /// Snapshot file to write
        #[arg(long)]
        out: PathBuf,
    },
    /// Drop a new player on a random cell
    AddPlayer {
        #[arg(long)]
        state: PathBuf,
        #[arg(long)]
        name: String,
    },
    /// Move a player one cell (up, right, down, left)
    Move {
        #[arg(long)]
        state: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        dir: Dir,
    },
    /// Render a snapshot as SVG
    ExportSvg {
        #[arg(long)]
        state: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a summary of a snapshot
    Describe {
        #[arg(long)]
        state: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct Summary {
    width: usize,
    height: usize,
    seed: u64,
    counter: u64,
    fingerprint: String,
    locations: Vec<LocationSummary>,
    players: Vec<PlayerSummary>,
}

#[derive(Serialize)]
struct LocationSummary {
    kind: &'static str,
    cells: Vec<[i32; 2]>,
}

#[derive(Serialize)]
struct PlayerSummary {
    name: String,
    x: i32,
    y: i32,
    color: String,
}

impl Summary {
    fn of(session: &Session) -> Self {
        let maze = session.maze();
        Self {
            width: maze.width(),
            height: maze.height(),
            seed: session.rng().seed(),
            counter: session.rng().counter(),
            fingerprint: format!("{:016x}", session.fingerprint()),
            locations: session
                .locations()
                .iter()
                .map(|location| LocationSummary {
                    kind: location.kind().keyword(),
                    cells: location.cells().iter().map(|cell| [cell.x, cell.y]).collect(),
                })
                .collect(),
            players: session
                .players()
                .iter()
                .map(|player| PlayerSummary {
                    name: player.name.clone(),
                    x: player.pos.x,
                    y: player.pos.y,
                    color: player.color.clone(),
                })
                .collect(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog = LocationCatalog::standard();
    match cli.command {
        Command::Generate {
            width,
            height,
            openness,
            seed,
            max_placement_rounds,
            config: config_path,
            out,
        } => {
            let file = config_path.as_deref().map(config::load_file).transpose()?;
            let flags = GenerateFlags { width, height, openness, seed, max_placement_rounds };
            let settings = config::resolve(file, &flags);
            let session = Session::generate(&settings, &catalog)
                .context("failed to generate the maze")?;
            save(&session, &out)?;
            info!(path = %out.display(), seed = session.rng().seed(), "snapshot written");
        }
        Command::AddPlayer { state, name } => {
            let mut session = load(&state, &catalog)?;
            let events = session.add_player(&name)?;
            save(&session, &state)?;
            print_events(&events, &catalog);
        }
        Command::Move { state, name, dir } => {
            let mut session = load(&state, &catalog)?;
            let events = session.move_player(&name, dir)?;
            save(&session, &state)?;
            print_events(&events, &catalog);
        }
        Command::ExportSvg { state, out } => export_svg(&state, &out, &catalog)?,
        Command::Describe { state, json } => {
            let session = load(&state, &catalog)?;
            let summary = Summary::of(&session);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
    }
    Ok(())
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn load(path: &Path, catalog: &LocationCatalog) -> Result<Session> {
    snapshot::load(path, catalog).with_context(|| format!("failed to load {}", path.display()))
}

fn save(session: &Session, path: &Path) -> Result<()> {
    snapshot::save_atomic(session, path).with_context(|| format!("failed to save {}", path.display()))
}

fn export_svg(state: &Path, out: &Path, catalog: &LocationCatalog) -> Result<()> {
    let session = load(state, catalog)?;
    snapshot::write_atomic(out, &svg::render(&session, catalog))
        .with_context(|| format!("failed to write {}", out.display()))?;
    info!(path = %out.display(), "svg written");
    Ok(())
}

fn print_events(events: &[Event], catalog: &LocationCatalog) {
    for event in events {
        println!("{}", event.narrate(catalog));
    }
}

fn print_summary(summary: &Summary) {
    println!("Maze: {}x{}", summary.width, summary.height);
    println!("Seed: {} (counter {})", summary.seed, summary.counter);
    println!("Fingerprint: {}", summary.fingerprint);
    for location in &summary.locations {
        let cells: Vec<String> =
            location.cells.iter().map(|[x, y]| format!("({x},{y})")).collect();
        println!("Location {}: {}", location.kind, cells.join(" "));
    }
    for player in &summary.players {
        println!("Player {} at ({},{}) {}", player.name, player.x, player.y, player.color);
    }
}
