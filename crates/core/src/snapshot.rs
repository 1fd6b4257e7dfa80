//! Plain-text session snapshots.
//!
//! A snapshot is a whitespace-separated token stream made of tagged records:
//!
//! ```text
//! [RNG]
//! <seed> <counter>
//! [MAZE]
//! <width> <height>
//! <one row of <width> hex wall masks per line, <height> lines>
//! [PLAYER]
//! <name> <x> <y> <color>
//! [LOCATION]
//! <KEYWORD>
//! <cell count>
//! <x> <y>
//! ```
//!
//! `[RNG]` and `[MAZE]` are required. Players and locations repeat. Unknown
//! tags are skipped; their payload is not.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::mem;
use std::path::{Path, PathBuf};
use std::str::{FromStr, SplitWhitespace};

use thiserror::Error;
use tracing::debug;

use crate::locations::{Location, LocationCatalog};
use crate::maze::Maze;
use crate::rng::RandomSource;
use crate::session::{Player, Session};
use crate::types::{Dir, Pos};

const RNG_TAG: &str = "[RNG]";
const MAZE_TAG: &str = "[MAZE]";
const PLAYER_TAG: &str = "[PLAYER]";
const LOCATION_TAG: &str = "[LOCATION]";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("malformed record tag '{0}'")]
    MalformedTag(String),
    #[error("malformed {record} record: {message}")]
    Malformed { record: &'static str, message: String },
    #[error("snapshot has no {0} record")]
    MissingRecord(&'static str),
    #[error("unknown location type '{0}'")]
    UnknownLocationType(String),
}

/// Canonical text for a session. Decoding the result yields an equal session.
pub fn encode(session: &Session) -> String {
    let mut out = String::new();
    let rng = session.rng();
    let maze = session.maze();

    let _ = writeln!(out, "{RNG_TAG}\n{} {}", rng.seed(), rng.counter());
    let _ = writeln!(out, "{MAZE_TAG}\n{} {}", maze.width(), maze.height());
    for row in maze_rows(maze) {
        out.push_str(&row);
        out.push('\n');
    }
    for player in session.players() {
        let _ = writeln!(
            out,
            "{PLAYER_TAG}\n{} {} {} {}",
            player.name, player.pos.x, player.pos.y, player.color
        );
    }
    for location in session.locations() {
        let kind = location.kind().keyword();
        let _ = writeln!(out, "{LOCATION_TAG}\n{kind}\n{}", location.cells().len());
        for cell in location.cells() {
            let _ = writeln!(out, "{} {}", cell.x, cell.y);
        }
    }
    out
}

/// One string per row, one lowercase hex digit per cell wall mask.
pub fn maze_rows(maze: &Maze) -> Vec<String> {
    let mut rows = Vec::with_capacity(maze.height());
    let mut row = String::with_capacity(maze.width());
    for pos in maze.positions() {
        let _ = write!(row, "{:x}", maze.walls(pos));
        if pos.x as usize + 1 == maze.width() {
            rows.push(mem::take(&mut row));
        }
    }
    rows
}

pub fn decode(text: &str, catalog: &LocationCatalog) -> Result<Session, SnapshotError> {
    let mut tokens = Tokens { inner: text.split_whitespace() };
    let mut rng = None;
    let mut maze = None;
    let mut players: Vec<Player> = Vec::new();
    let mut locations: Vec<Location> = Vec::new();

    while let Some(tag) = tokens.inner.next() {
        if tag.len() < 2 || !tag.starts_with('[') || !tag.ends_with(']') {
            return Err(SnapshotError::MalformedTag(tag.to_string()));
        }
        match tag {
            RNG_TAG => {
                let seed = tokens.number(RNG_TAG, "seed")?;
                let counter = tokens.number(RNG_TAG, "counter")?;
                if rng.replace(RandomSource::from_state(seed, counter)).is_some() {
                    return Err(malformed(RNG_TAG, "record appears twice"));
                }
            }
            MAZE_TAG => {
                if maze.replace(decode_maze(&mut tokens)?).is_some() {
                    return Err(malformed(MAZE_TAG, "record appears twice"));
                }
            }
            PLAYER_TAG => players.push(Player {
                name: tokens.word(PLAYER_TAG, "name")?.to_string(),
                pos: Pos::new(tokens.number(PLAYER_TAG, "x")?, tokens.number(PLAYER_TAG, "y")?),
                color: tokens.word(PLAYER_TAG, "color")?.to_string(),
            }),
            LOCATION_TAG => locations.push(decode_location(&mut tokens, catalog)?),
            other => debug!(tag = other, "skipping unknown snapshot record"),
        }
    }

    let rng = rng.ok_or(SnapshotError::MissingRecord(RNG_TAG))?;
    let mut maze = maze.ok_or(SnapshotError::MissingRecord(MAZE_TAG))?;

    let mut names = BTreeSet::new();
    for player in &players {
        if !maze.in_bounds(player.pos) {
            let message = format!("'{}' stands outside the maze", player.name);
            return Err(malformed(PLAYER_TAG, message));
        }
        if !names.insert(player.name.as_str()) {
            return Err(malformed(PLAYER_TAG, format!("'{}' appears twice", player.name)));
        }
    }

    let mut claimed = BTreeSet::new();
    for location in &locations {
        for &cell in location.cells() {
            if !maze.in_bounds(cell) {
                let message = format!("cell {} {} is outside the maze", cell.x, cell.y);
                return Err(malformed(LOCATION_TAG, message));
            }
            if !claimed.insert(cell) {
                let message = format!("cell {} {} is claimed twice", cell.x, cell.y);
                return Err(malformed(LOCATION_TAG, message));
            }
            maze.tag(cell, location.kind());
        }
    }

    Ok(Session::from_parts(rng, maze, players, locations))
}

/// Writes through a sibling temp file and renames it into place, so readers
/// never see a half-written snapshot.
pub fn save_atomic(session: &Session, path: &Path) -> Result<(), SnapshotError> {
    write_atomic(path, &encode(session))?;
    Ok(())
}

/// Replaces `path` with `contents` or leaves it untouched. The `<path>.tmp`
/// sibling is removed whether or not the write succeeds.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(path);
    let result = fs::write(&tmp, contents).and_then(|()| fs::rename(&tmp, path));
    if result.is_err() {
        // Cleanup errors are dropped; the write or rename error is returned.
        let _ = fs::remove_file(&tmp);
    }
    result
}

pub fn load(path: &Path, catalog: &LocationCatalog) -> Result<Session, SnapshotError> {
    let text = fs::read_to_string(path)?;
    decode(&text, catalog)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut raw = path.as_os_str().to_owned();
    raw.push(".tmp");
    PathBuf::from(raw)
}

fn decode_maze(tokens: &mut Tokens<'_>) -> Result<Maze, SnapshotError> {
    let width: usize = tokens.number(MAZE_TAG, "width")?;
    let height: usize = tokens.number(MAZE_TAG, "height")?;
    Maze::checked_cell_count(width, height).map_err(|err| malformed(MAZE_TAG, err.to_string()))?;

    // Rows are read before the grid is allocated, so its size is bounded by the input.
    let mut rows = Vec::new();
    for y in 0..height {
        let row = tokens.word(MAZE_TAG, "row")?;
        let cells = row.chars().count();
        if cells != width {
            return Err(malformed(MAZE_TAG, format!("row {y} has {cells} cells, expected {width}")));
        }
        rows.push(row);
    }

    let mut maze = Maze::new(width, height).map_err(|err| malformed(MAZE_TAG, err.to_string()))?;
    for (y, row) in rows.into_iter().enumerate() {
        for (x, digit) in row.chars().enumerate() {
            let walls = digit.to_digit(16).ok_or_else(|| {
                malformed(MAZE_TAG, format!("'{digit}' in row {y} is not a hex digit"))
            })?;
            maze.set_walls_raw(Pos::new(x as i32, y as i32), walls as u8);
        }
    }
    for pos in maze.positions() {
        for dir in [Dir::Right, Dir::Down] {
            let Some(next) = maze.neighbor(pos, dir) else {
                continue;
            };
            if maze.has_wall(pos, dir) != maze.has_wall(next, dir.opposite()) {
                return Err(malformed(
                    MAZE_TAG,
                    format!("wall {dir} of cell {} {} disagrees with its neighbour", pos.x, pos.y),
                ));
            }
        }
    }
    Ok(maze)
}

fn decode_location(
    tokens: &mut Tokens<'_>,
    catalog: &LocationCatalog,
) -> Result<Location, SnapshotError> {
    let keyword = tokens.word(LOCATION_TAG, "type")?;
    let kind = catalog
        .resolve(keyword)
        .ok_or_else(|| SnapshotError::UnknownLocationType(keyword.to_string()))?;
    let count: usize = tokens.number(LOCATION_TAG, "cell count")?;
    if count == 0 {
        return Err(malformed(LOCATION_TAG, "a location needs at least one cell"));
    }
    let mut cells = Vec::with_capacity(count);
    for _ in 0..count {
        let x = tokens.number(LOCATION_TAG, "x")?;
        let y = tokens.number(LOCATION_TAG, "y")?;
        cells.push(Pos::new(x, y));
    }
    Ok(Location::new(kind, cells))
}

fn malformed(record: &'static str, message: impl Into<String>) -> SnapshotError {
    SnapshotError::Malformed { record, message: message.into() }
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn word(&mut self, record: &'static str, field: &str) -> Result<&'a str, SnapshotError> {
        self.inner.next().ok_or_else(|| malformed(record, format!("missing {field}")))
    }

    fn number<T: FromStr>(&mut self, record: &'static str, field: &str) -> Result<T, SnapshotError> {
        let raw = self.word(record, field)?;
        raw.parse().map_err(|_| malformed(record, format!("{field} '{raw}' is not a valid number")))
    }
}
